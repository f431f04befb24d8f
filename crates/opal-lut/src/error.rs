//! LUT error types.

use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur while building or writing baked LUTs.
#[derive(Debug, Error)]
pub enum LutError {
    /// Invalid LUT size or mismatched sample count.
    #[error("invalid LUT size: {0}")]
    InvalidSize(String),

    /// The format cannot hold this kind of LUT.
    #[error("format '{format}' does not support {kind} LUTs")]
    Unsupported {
        /// Format name
        format: &'static str,
        /// "1D" or "3D"
        kind: &'static str,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
