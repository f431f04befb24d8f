//! # opal-math
//!
//! Math primitives shared by the opal color pipeline crates.
//!
//! - [`Matrix44`] - 4x4 affine RGBA matrix with offset, backed by `glam` for
//!   inversion and composition
//! - [`simd`] - 4-lane `wide` kernels used by the vectorized CPU path
//!
//! # Convention
//!
//! Matrices are stored **row-major** and act on **column vectors**:
//!
//! ```text
//! out = M * in + offset
//! ```
//!
//! # Usage
//!
//! ```rust
//! use opal_math::Matrix44;
//!
//! let scale = Matrix44::scale([2.0, 2.0, 2.0, 1.0]);
//! let inv = scale.inverse().unwrap();
//! assert!(scale.then(&inv).is_identity(1e-12));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod matrix;
pub mod simd;

pub use matrix::Matrix44;
