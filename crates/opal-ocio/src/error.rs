//! Error types for graph resolution, compilation and baking.
//!
//! Every public operation in this crate returns [`OcioResult`]. Variants map
//! one-to-one onto the failure kinds callers branch on:
//! - [`OcioError::Validation`] - a value broke an invariant when it was set
//! - [`OcioError::ColorSpace`] - a space is missing, unset or has no path to the reference
//! - [`OcioError::LookParsing`] - a look string or look definition is malformed
//! - [`OcioError::UnsupportedInversion`] - an op has no inverse for its parameters
//! - [`OcioError::ProcessorCompilation`] - a node has no evaluator
//! - [`OcioError::UnknownFormat`] / [`OcioError::InvalidParameter`] - baker and query misuse

use opal_ops::OpsError;
use thiserror::Error;

/// Result type for opal-ocio operations.
pub type OcioResult<T> = Result<T, OcioError>;

/// Errors raised by config resolution, processor compilation and baking.
#[derive(Debug, Error)]
pub enum OcioError {
    /// A value failed validation when it was constructed or set.
    #[error("validation error: {0}")]
    Validation(String),

    /// A color space could not be found or resolved.
    #[error("color space '{name}': {reason}")]
    ColorSpace {
        /// Requested name.
        name: String,
        /// What went wrong.
        reason: String,
    },

    /// A look string or look definition is invalid.
    #[error("looks '{looks}': {reason}")]
    LookParsing {
        /// The look string or look name involved.
        looks: String,
        /// What went wrong.
        reason: String,
    },

    /// An op was asked to run backwards but has no inverse.
    #[error("cannot invert {op}: {reason}")]
    UnsupportedInversion {
        /// Op kind.
        op: &'static str,
        /// Why the inverse does not exist.
        reason: String,
    },

    /// A transform node could not be turned into an op.
    #[error("processor compilation failed: {reason}")]
    ProcessorCompilation {
        /// What went wrong.
        reason: String,
    },

    /// No LUT format is registered under this name.
    #[error("unknown LUT format: '{format}'")]
    UnknownFormat {
        /// Requested format name.
        format: String,
    },

    /// A parameter is missing or out of range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What went wrong.
        reason: String,
    },

    /// LUT serialization error.
    #[error("LUT error: {0}")]
    Lut(#[from] opal_lut::LutError),

    /// I/O error while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OcioError {
    pub(crate) fn colorspace(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ColorSpace {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn look_parsing(looks: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LookParsing {
            looks: looks.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Maps an op error raised while inverting `op` at compile time.
    pub(crate) fn from_inversion(op: &'static str, err: OpsError) -> Self {
        match err {
            OpsError::NotInvertible(reason) => Self::UnsupportedInversion { op, reason },
            other => Self::from(other),
        }
    }
}

impl From<OpsError> for OcioError {
    fn from(err: OpsError) -> Self {
        Self::Validation(err.to_string())
    }
}
