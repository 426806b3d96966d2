//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `ep-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// A neighbourhood query named something other than `healthy` or
    /// `infected`.
    #[error("invalid neighbourhood query kind {0:?} (expected \"healthy\" or \"infected\")")]
    InvalidQueryKind(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
