//! Framework error type.
//!
//! Sub-crates define their own error enums (`SpatialError`, `MobilityError`,
//! `DiseaseError`, …) and wrap `EpError` where configuration problems can
//! surface.

use thiserror::Error;

/// The top-level error type for `ep-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum EpError {
    /// Invalid or missing required parameter, raised before engine construction.
    #[error("configuration error: {0}")]
    Config(String),
}

impl EpError {
    /// Shorthand for building a [`EpError::Config`] from anything displayable.
    pub fn config(msg: impl Into<String>) -> Self {
        EpError::Config(msg.into())
    }
}

/// Shorthand result type for all `ep-*` crates.
pub type EpResult<T> = Result<T, EpError>;
