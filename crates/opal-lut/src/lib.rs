//! # opal-lut
//!
//! Baked LUT containers and the text serializers used by the opal baker.
//!
//! The containers hold samples that were already evaluated through a color
//! pipeline; this crate never interpolates or evaluates color math. Each
//! format module only turns a [`BakedLut`] into text.
//!
//! # Containers
//!
//! - [`Shaper`] / [`ShaperChannel`] - per-channel pre-LUT rows
//! - [`Lut1D`] - per-channel curve entries
//! - [`Lut3D`] - RGB cube, red-fastest
//!
//! # Formats
//!
//! | Name | Extension | 1D | 3D | Shaper |
//! |------|-----------|----|----|--------|
//! | `flame` | `3dl` | | x | |
//! | `lustre` | `3dl` | | x | |
//! | `cinespace` | `csp` | x | x | x |
//! | `houdini` | `lut` | x | x | |
//! | `iridas_itx` | `itx` | | x | |
//! | `resolve_cube` | `cube` | x | x | |
//! | `spi1d` | `spi1d` | x | | |
//! | `spi3d` | `spi3d` | | x | |
//!
//! # Usage
//!
//! ```rust
//! use opal_lut::{BakedLut, Lut3D, LutData, LutFormat};
//!
//! let lut = BakedLut {
//!     shaper: None,
//!     data: LutData::ThreeD(Lut3D::identity(2)),
//!     metadata: None,
//! };
//! let mut out = Vec::new();
//! LutFormat::ResolveCube.write(&mut out, &lut).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("LUT_3D_SIZE 2\n"));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod baked;
mod error;
mod format;
pub mod csp;
pub mod cube;
pub mod houdini;
pub mod iridas_itx;
pub mod spi;
pub mod threedl;

pub use baked::{BakedLut, Lut1D, Lut3D, LutData, Shaper, ShaperChannel};
pub use error::{LutError, LutResult};
pub use format::{LutFormat, LutKind};
