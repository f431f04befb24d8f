//! # opal-ops
//!
//! Per-pixel kernels for the ops an opal processor is compiled into.
//!
//! Every kernel works on a single `[f32; 3]` or `[f32; 4]` pixel and keeps
//! its parameters in `f64`. Buffers, SIMD batching and direction handling
//! live in `opal-ocio`.
//!
//! # Modules
//!
//! - [`exponent`] - per-channel power with clamp, mirror or pass-through negatives
//! - [`cdl`] - ASC CDL slope/offset/power/saturation
//! - [`range`] - affine remap with optional clamping
//! - [`allocation`] - uniform and log2 LUT sample spacing
//! - [`log`] - log/antilog with affine lin-side and log-side parameters
//! - [`fixed_function`] - RGB/HSV and CIE chromaticity conversions
//! - [`exposure_contrast`] - exposure, contrast and gamma around a pivot
//! - [`grading_rgb_curve`] - B-spline RGB curves with numeric inversion
//!
//! # Example
//!
//! ```rust
//! use opal_ops::cdl::{Cdl, CdlStyle};
//!
//! let cdl = Cdl {
//!     slope: [1.2, 1.0, 0.9],
//!     ..Cdl::identity()
//! };
//! let out = cdl.apply(CdlStyle::NoClamp, [0.5, 0.5, 0.5]);
//! assert!(out[0] > out[2]);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod allocation;
pub mod cdl;
pub mod exponent;
pub mod exposure_contrast;
pub mod fixed_function;
pub mod grading_rgb_curve;
pub mod log;
pub mod range;

pub use error::{OpsError, OpsResult};
