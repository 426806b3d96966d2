use ep_mobility::MobilityError;
use ep_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiseaseError {
    #[error("neighbourhood query failed: {0}")]
    Spatial(#[from] SpatialError),

    #[error("isolation routing failed: {0}")]
    Mobility(#[from] MobilityError),
}

pub type DiseaseResult<T> = Result<T, DiseaseError>;
