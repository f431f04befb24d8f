//! Houdini `.lut` writer.
//!
//! 1D tables use `Type C` with one block per channel; cubes use `Type 3D`
//! and a single block of red-fastest triples.

use std::io::Write;

use crate::{BakedLut, LutData, LutResult};

/// Writes a baked LUT as Houdini text.
pub fn write_houdini_to<W: Write>(w: &mut W, lut: &BakedLut) -> LutResult<()> {
    let (kind, length) = match &lut.data {
        LutData::OneD(lut1d) => ("C", lut1d.len()),
        LutData::ThreeD(lut3d) => ("3D", lut3d.size),
    };
    writeln!(w, "Version\t\t3")?;
    writeln!(w, "Format\t\tany")?;
    writeln!(w, "Type\t\t{kind}")?;
    writeln!(w, "From\t\t0.000000 1.000000")?;
    writeln!(w, "To\t\t0.000000 1.000000")?;
    writeln!(w, "Black\t\t0.000000")?;
    writeln!(w, "White\t\t1.000000")?;
    writeln!(w, "Length\t\t{length}")?;
    writeln!(w, "LUT:")?;

    match &lut.data {
        LutData::OneD(lut1d) => {
            for (label, c) in [("R", 0), ("G", 1), ("B", 2)] {
                writeln!(w, "{label} {{")?;
                for entry in &lut1d.entries {
                    writeln!(w, "\t{:.6}", entry[c])?;
                }
                writeln!(w, "}}")?;
            }
        }
        LutData::ThreeD(lut3d) => {
            writeln!(w, " {{")?;
            for [r, g, b] in &lut3d.data {
                writeln!(w, "\t{r:.6} {g:.6} {b:.6}")?;
            }
            writeln!(w, " }}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lut1D, Lut3D};

    #[test]
    fn one_d_channel_blocks() {
        let lut = BakedLut {
            shaper: None,
            data: LutData::OneD(Lut1D::new(vec![[0.0, 0.1, 0.2], [1.0, 0.9, 0.8]]).unwrap()),
            metadata: None,
        };
        let mut out = Vec::new();
        write_houdini_to(&mut out, &lut).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Type\t\tC\n"));
        assert!(text.contains("Length\t\t2\n"));
        assert!(text.contains("G {\n\t0.100000\n\t0.900000\n}\n"));
    }

    #[test]
    fn three_d_block() {
        let lut = BakedLut {
            shaper: None,
            data: LutData::ThreeD(Lut3D::identity(2)),
            metadata: None,
        };
        let mut out = Vec::new();
        write_houdini_to(&mut out, &lut).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Type\t\t3D\n"));
        assert!(text.contains("LUT:\n {\n\t0.000000 0.000000 0.000000\n\t1.000000 0.000000 0.000000\n"));
        assert!(text.ends_with("\t1.000000 1.000000 1.000000\n }\n"));
    }
}
