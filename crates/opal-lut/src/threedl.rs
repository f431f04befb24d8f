//! Autodesk `.3dl` writers (Flame and Lustre flavors).
//!
//! Both flavors store integers: a header row of input code values on a
//! 10-bit scale, then one `r g b` line per grid point on a 12-bit scale,
//! blue changing fastest.
//!
//! ```text
//! 3DMESH              <- lustre only
//! Mesh 5 12           <- lustre only
//! 0 32 64 ... 1023
//! 0 0 0
//! 0 0 128
//! ...
//! LUT8                <- lustre only
//! gamma 1.0           <- lustre only
//! ```

use std::io::Write;

use crate::{BakedLut, Lut3D, LutData, LutError, LutResult};

const INPUT_MAX: f32 = 1023.0;
const OUTPUT_MAX: f32 = 4095.0;

/// Which `.3dl` flavor to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreeDlFlavor {
    /// Bare header row and data.
    Flame,
    /// Adds the `3DMESH` header and `LUT8` trailer.
    Lustre,
}

impl ThreeDlFlavor {
    fn name(self) -> &'static str {
        match self {
            ThreeDlFlavor::Flame => "flame",
            ThreeDlFlavor::Lustre => "lustre",
        }
    }
}

/// Writes a baked 3D LUT as `.3dl` text.
pub fn write_3dl_to<W: Write>(w: &mut W, lut: &BakedLut, flavor: ThreeDlFlavor) -> LutResult<()> {
    let LutData::ThreeD(lut3d) = &lut.data else {
        return Err(LutError::Unsupported {
            format: flavor.name(),
            kind: "1D",
        });
    };
    let n = lut3d.size;

    if flavor == ThreeDlFlavor::Lustre {
        writeln!(w, "3DMESH")?;
        writeln!(w, "Mesh {} 12", mesh_bits(n))?;
    }

    let header = (0..n)
        .map(|i| quantize(i as f32 / (n - 1) as f32, INPUT_MAX).to_string())
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(w, "{header}")?;

    write_blue_fastest(w, lut3d)?;

    if flavor == ThreeDlFlavor::Lustre {
        writeln!(w)?;
        writeln!(w, "LUT8")?;
        writeln!(w, "gamma 1.0")?;
    }
    Ok(())
}

fn write_blue_fastest<W: Write>(w: &mut W, lut3d: &Lut3D) -> LutResult<()> {
    let n = lut3d.size;
    for r in 0..n {
        for g in 0..n {
            for b in 0..n {
                let [vr, vg, vb] = lut3d.get(r, g, b);
                writeln!(
                    w,
                    "{} {} {}",
                    quantize(vr, OUTPUT_MAX),
                    quantize(vg, OUTPUT_MAX),
                    quantize(vb, OUTPUT_MAX)
                )?;
            }
        }
    }
    Ok(())
}

/// Number of bits in the mesh edge: `2^k + 1` points.
fn mesh_bits(size: usize) -> u32 {
    (size.saturating_sub(1)).max(1).ilog2()
}

fn quantize(v: f32, max: f32) -> i32 {
    (v.clamp(0.0, 1.0) * max).round() as i32
}
