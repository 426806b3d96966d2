use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("destination slot {slot} out of range (table has {slots} slot(s))")]
    SlotOutOfRange { slot: u16, slots: usize },
}

pub type MobilityResult<T> = Result<T, MobilityError>;
