//! Resolve `.cube` writer.
//!
//! ```text
//! # metadata line
//!
//! LUT_1D_SIZE n | LUT_3D_SIZE n
//! r g b
//! ...
//! ```
//!
//! 3D data is written red-fastest.

use std::io::Write;

use crate::{BakedLut, LutData, LutResult};

/// Writes metadata as `# ` comment lines followed by a blank line.
pub(crate) fn write_comment_header<W: Write>(w: &mut W, lut: &BakedLut) -> LutResult<()> {
    let meta = lut.metadata_lines();
    if !meta.is_empty() {
        for line in meta {
            writeln!(w, "# {line}")?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Writes a baked LUT as Resolve `.cube` text.
pub fn write_cube_to<W: Write>(w: &mut W, lut: &BakedLut) -> LutResult<()> {
    write_comment_header(w, lut)?;
    match &lut.data {
        LutData::OneD(lut1d) => {
            writeln!(w, "LUT_1D_SIZE {}", lut1d.len())?;
            for [r, g, b] in &lut1d.entries {
                writeln!(w, "{r:.6} {g:.6} {b:.6}")?;
            }
        }
        LutData::ThreeD(lut3d) => {
            writeln!(w, "LUT_3D_SIZE {}", lut3d.size)?;
            for [r, g, b] in &lut3d.data {
                writeln!(w, "{r:.6} {g:.6} {b:.6}")?;
            }
        }
    }
    Ok(())
}
