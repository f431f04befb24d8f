//! Cinespace (CSP) writer.
//!
//! CSP is the only dialect here that carries a per-channel shaper, which lets
//! wide-range inputs (log-encoded, HDR linear) be sampled evenly.
//!
//! # Format Structure
//!
//! ```text
//! CSPLUTV100
//! 1D or 3D
//!
//! BEGIN METADATA
//! <metadata>
//! END METADATA
//!
//! <shaper_r_count>
//! <input_samples_r>
//! <output_samples_r>
//! <shaper_g_count>
//! ...
//!
//! <lut_size> (1D) or <size_r> <size_g> <size_b> (3D)
//! <r g b>
//! ...
//!
//! ```

use std::io::Write;

use crate::{BakedLut, LutData, LutResult, ShaperChannel};

/// Writes a baked LUT as Cinespace text.
///
/// Without a shaper, each channel gets a two-point `[0, 1]` identity block.
pub fn write_csp_to<W: Write>(w: &mut W, lut: &BakedLut) -> LutResult<()> {
    writeln!(w, "CSPLUTV100")?;
    writeln!(w, "{}", lut.data.kind())?;
    writeln!(w)?;

    let meta = lut.metadata_lines();
    if !meta.is_empty() {
        writeln!(w, "BEGIN METADATA")?;
        for line in meta {
            writeln!(w, "{line}")?;
        }
        writeln!(w, "END METADATA")?;
        writeln!(w)?;
    }

    let identity = ShaperChannel::identity();
    match &lut.shaper {
        Some(shaper) => {
            for channel in shaper.channels() {
                write_channel(w, channel)?;
            }
        }
        None => {
            for _ in 0..3 {
                write_channel(w, &identity)?;
            }
        }
    }
    writeln!(w)?;

    match &lut.data {
        LutData::OneD(lut1d) => {
            writeln!(w, "{}", lut1d.len())?;
            for [r, g, b] in &lut1d.entries {
                writeln!(w, "{r:.6} {g:.6} {b:.6}")?;
            }
        }
        LutData::ThreeD(lut3d) => {
            let n = lut3d.size;
            writeln!(w, "{n} {n} {n}")?;
            for [r, g, b] in &lut3d.data {
                writeln!(w, "{r:.6} {g:.6} {b:.6}")?;
            }
        }
    }
    writeln!(w)?;
    Ok(())
}

fn write_channel<W: Write>(w: &mut W, channel: &ShaperChannel) -> LutResult<()> {
    writeln!(w, "{}", channel.len())?;
    writeln!(w, "{}", join_fixed(&channel.input))?;
    writeln!(w, "{}", join_fixed(&channel.output))?;
    Ok(())
}

fn join_fixed(values: &[f32]) -> String {
    values
        .iter()
        .map(|v| format!("{v:.6}"))
        .collect::<Vec<_>>()
        .join(" ")
}
