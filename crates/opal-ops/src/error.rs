//! Error types for op kernels.

use thiserror::Error;

/// Error type for op construction and validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpsError {
    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Two parallel arrays have different lengths.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// The op has no defined inverse for these parameters.
    #[error("not invertible: {0}")]
    NotInvertible(String),
}

/// Result type for op kernels.
pub type OpsResult<T> = Result<T, OpsError>;
