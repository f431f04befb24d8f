//! Iridas `.itx` writer.
//!
//! Same body as a 3D `.cube` file; the dialect only carries cubes.

use std::io::Write;

use crate::cube::write_comment_header;
use crate::{BakedLut, LutData, LutError, LutResult};

/// Writes a baked 3D LUT as Iridas `.itx` text.
pub fn write_itx_to<W: Write>(w: &mut W, lut: &BakedLut) -> LutResult<()> {
    let LutData::ThreeD(lut3d) = &lut.data else {
        return Err(LutError::Unsupported {
            format: "iridas_itx",
            kind: "1D",
        });
    };
    write_comment_header(w, lut)?;
    writeln!(w, "LUT_3D_SIZE {}", lut3d.size)?;
    for [r, g, b] in &lut3d.data {
        writeln!(w, "{r:.6} {g:.6} {b:.6}")?;
    }
    Ok(())
}
