//! Error types.

use thiserror::Error;

use crate::shapes::ShapeId;

/// Errors raised by interactive objects and their figure.
///
/// Most configuration problems are not errors: they are logged and the
/// default is used instead.
#[derive(Debug, Error)]
pub enum DrapoError {
    /// No plotting region is available to attach an object to.
    #[error("no surface available")]
    NoSurface,
    #[error("unknown interactive object: {0}")]
    UnknownShape(ShapeId),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl From<serde_json::Error> for DrapoError {
    fn from(err: serde_json::Error) -> Self {
        DrapoError::InvalidOptions(err.to_string())
    }
}

/// Result type for fallible operations.
pub type DrapoResult<T> = Result<T, DrapoError>;
