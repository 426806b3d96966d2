use ep_core::{AgentId, EpError};
use ep_disease::DiseaseError;
use ep_mobility::MobilityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] EpError),

    #[error("{what} length {got} does not match pop_size {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("cannot seed {0}: no such agent")]
    AgentNotFound(AgentId),

    #[error("infection phase failed: {0}")]
    Disease(#[from] DiseaseError),

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),
}

pub type SimResult<T> = Result<T, SimError>;
