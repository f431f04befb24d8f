//! Format registry for baked LUT output.

use std::io::Write;

use tracing::debug;

use crate::csp::write_csp_to;
use crate::cube::write_cube_to;
use crate::houdini::write_houdini_to;
use crate::iridas_itx::write_itx_to;
use crate::spi::{write_spi1d_to, write_spi3d_to};
use crate::threedl::{ThreeDlFlavor, write_3dl_to};
use crate::{BakedLut, LutData, LutError, LutResult};

/// Table dimensionality requested from a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LutKind {
    /// Per-channel curves.
    OneD,
    /// RGB cube.
    ThreeD,
}

impl LutKind {
    /// Parses `"1D"` / `"3D"` (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "1D" => Some(LutKind::OneD),
            "3D" => Some(LutKind::ThreeD),
            _ => None,
        }
    }

    /// `"1D"` or `"3D"`.
    pub fn name(self) -> &'static str {
        match self {
            LutKind::OneD => "1D",
            LutKind::ThreeD => "3D",
        }
    }
}

/// Supported output dialects, in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LutFormat {
    /// Autodesk Flame `.3dl`.
    Flame,
    /// Autodesk Lustre `.3dl`.
    Lustre,
    /// Rising Sun Research Cinespace `.csp`.
    Cinespace,
    /// SideFX Houdini `.lut`.
    Houdini,
    /// Iridas `.itx`.
    IridasItx,
    /// DaVinci Resolve `.cube`.
    ResolveCube,
    /// Imageworks `.spi1d`.
    Spi1d,
    /// Imageworks `.spi3d`.
    Spi3d,
}

impl LutFormat {
    /// All formats, in registry order.
    pub const ALL: [LutFormat; 8] = [
        LutFormat::Flame,
        LutFormat::Lustre,
        LutFormat::Cinespace,
        LutFormat::Houdini,
        LutFormat::IridasItx,
        LutFormat::ResolveCube,
        LutFormat::Spi1d,
        LutFormat::Spi3d,
    ];

    /// Registry name.
    pub fn name(self) -> &'static str {
        match self {
            LutFormat::Flame => "flame",
            LutFormat::Lustre => "lustre",
            LutFormat::Cinespace => "cinespace",
            LutFormat::Houdini => "houdini",
            LutFormat::IridasItx => "iridas_itx",
            LutFormat::ResolveCube => "resolve_cube",
            LutFormat::Spi1d => "spi1d",
            LutFormat::Spi3d => "spi3d",
        }
    }

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            LutFormat::Flame | LutFormat::Lustre => "3dl",
            LutFormat::Cinespace => "csp",
            LutFormat::Houdini => "lut",
            LutFormat::IridasItx => "itx",
            LutFormat::ResolveCube => "cube",
            LutFormat::Spi1d => "spi1d",
            LutFormat::Spi3d => "spi3d",
        }
    }

    /// Looks a format up by registry name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Format at registry `index`.
    pub fn by_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether the format can hold a LUT of `kind`.
    pub fn supports(self, kind: LutKind) -> bool {
        match kind {
            LutKind::OneD => matches!(
                self,
                LutFormat::Cinespace | LutFormat::Houdini | LutFormat::ResolveCube | LutFormat::Spi1d
            ),
            LutKind::ThreeD => self != LutFormat::Spi1d,
        }
    }

    /// Whether the format carries a shaper ahead of the table.
    pub fn uses_shaper(self) -> bool {
        self == LutFormat::Cinespace
    }

    /// Cube edge length used when none is requested.
    pub fn default_cube_size(self) -> usize {
        match self {
            LutFormat::Flame => 17,
            LutFormat::Lustre => 33,
            _ => 32,
        }
    }

    /// Serializes `lut` in this format.
    pub fn write<W: Write>(self, w: &mut W, lut: &BakedLut) -> LutResult<()> {
        let kind = match lut.data {
            LutData::OneD(_) => LutKind::OneD,
            LutData::ThreeD(_) => LutKind::ThreeD,
        };
        if !self.supports(kind) {
            return Err(LutError::Unsupported {
                format: self.name(),
                kind: kind.name(),
            });
        }
        debug!(format = self.name(), kind = kind.name(), "writing baked LUT");
        match self {
            LutFormat::Flame => write_3dl_to(w, lut, ThreeDlFlavor::Flame),
            LutFormat::Lustre => write_3dl_to(w, lut, ThreeDlFlavor::Lustre),
            LutFormat::Cinespace => write_csp_to(w, lut),
            LutFormat::Houdini => write_houdini_to(w, lut),
            LutFormat::IridasItx => write_itx_to(w, lut),
            LutFormat::ResolveCube => write_cube_to(w, lut),
            LutFormat::Spi1d => write_spi1d_to(w, lut),
            LutFormat::Spi3d => write_spi3d_to(w, lut),
        }
    }
}
