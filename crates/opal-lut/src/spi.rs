//! Sony Pictures Imageworks `.spi1d` / `.spi3d` writers.
//!
//! # spi1d
//!
//! ```text
//! Version 1
//! From 0.000000 1.000000
//! Length N
//! Components 3
//! {
//!     r g b
//! }
//! ```
//!
//! # spi3d
//!
//! ```text
//! SPILUT 1.0
//! 3 3
//! N N N
//! i j k r g b
//! ```

use std::io::Write;

use crate::{BakedLut, LutData, LutError, LutResult};

/// Writes a baked 1D LUT as `.spi1d`.
pub fn write_spi1d_to<W: Write>(w: &mut W, lut: &BakedLut) -> LutResult<()> {
    let LutData::OneD(lut1d) = &lut.data else {
        return Err(LutError::Unsupported {
            format: "spi1d",
            kind: "3D",
        });
    };
    writeln!(w, "Version 1")?;
    writeln!(w, "From 0.000000 1.000000")?;
    writeln!(w, "Length {}", lut1d.len())?;
    writeln!(w, "Components 3")?;
    writeln!(w, "{{")?;
    for [r, g, b] in &lut1d.entries {
        writeln!(w, "    {r:.6} {g:.6} {b:.6}")?;
    }
    writeln!(w, "}}")?;
    Ok(())
}

/// Writes a baked 3D LUT as `.spi3d`, one indexed sample per line.
pub fn write_spi3d_to<W: Write>(w: &mut W, lut: &BakedLut) -> LutResult<()> {
    let LutData::ThreeD(lut3d) = &lut.data else {
        return Err(LutError::Unsupported {
            format: "spi3d",
            kind: "1D",
        });
    };
    let n = lut3d.size;
    writeln!(w, "SPILUT 1.0")?;
    writeln!(w, "3 3")?;
    writeln!(w, "{n} {n} {n}")?;
    for b in 0..n {
        for g in 0..n {
            for r in 0..n {
                let [vr, vg, vb] = lut3d.get(r, g, b);
                writeln!(w, "{r} {g} {b} {vr:.6} {vg:.6} {vb:.6}")?;
            }
        }
    }
    Ok(())
}
