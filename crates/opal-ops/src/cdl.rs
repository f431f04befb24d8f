//! ASC CDL (Color Decision List): slope, offset, power, then saturation.
//!
//! ```text
//! out = (in * slope + offset) ^ power
//! out = luma + (out - luma) * saturation      (Rec.709 weights)
//! ```
//!
//! The `AscCdl` style clamps to `[0, 1]` around the power as ASC CDL v1.2
//! requires; `NoClamp` mirrors negatives instead.

use crate::{OpsError, OpsResult};

/// Clamping behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CdlStyle {
    /// ASC CDL v1.2 clamping.
    #[default]
    AscCdl,
    /// Extended range, negatives mirrored through the power.
    NoClamp,
}

/// CDL parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cdl {
    /// Per-channel slope.
    pub slope: [f64; 3],
    /// Per-channel offset.
    pub offset: [f64; 3],
    /// Per-channel power.
    pub power: [f64; 3],
    /// Saturation, 1 for none.
    pub saturation: f64,
}

impl Default for Cdl {
    fn default() -> Self {
        Self::identity()
    }
}

const LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

impl Cdl {
    /// No-op CDL.
    pub fn identity() -> Self {
        Self {
            slope: [1.0; 3],
            offset: [0.0; 3],
            power: [1.0; 3],
            saturation: 1.0,
        }
    }

    /// True when the CDL changes nothing (for the `NoClamp` style).
    pub fn is_identity(&self) -> bool {
        self.slope == [1.0; 3]
            && self.offset == [0.0; 3]
            && self.power == [1.0; 3]
            && (self.saturation - 1.0).abs() < 1e-9
    }

    /// Checks that the inverse exists: non-zero slope, power and saturation.
    pub fn check_invertible(&self) -> OpsResult<()> {
        if self.slope.iter().any(|s| s.abs() < 1e-10) {
            return Err(OpsError::NotInvertible("CDL slope is zero".into()));
        }
        if self.power.iter().any(|p| p.abs() < 1e-10) {
            return Err(OpsError::NotInvertible("CDL power is zero".into()));
        }
        if self.saturation.abs() < 1e-10 {
            return Err(OpsError::NotInvertible("CDL saturation is zero".into()));
        }
        Ok(())
    }

    /// Applies the forward CDL.
    pub fn apply(&self, style: CdlStyle, rgb: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0; 3];
        for c in 0..3 {
            let v = rgb[c] * self.slope[c] as f32 + self.offset[c] as f32;
            let p = self.power[c] as f32;
            out[c] = match style {
                CdlStyle::AscCdl => v.clamp(0.0, 1.0).powf(p),
                CdlStyle::NoClamp => signed_pow(v, p),
            };
        }
        let out = saturate(out, self.saturation as f32);
        match style {
            CdlStyle::AscCdl => out.map(|v| v.clamp(0.0, 1.0)),
            CdlStyle::NoClamp => out,
        }
    }

    /// Applies the inverse CDL. Call [`Cdl::check_invertible`] first.
    pub fn apply_inverse(&self, style: CdlStyle, rgb: [f32; 3]) -> [f32; 3] {
        let rgb = match style {
            CdlStyle::AscCdl => rgb.map(|v| v.clamp(0.0, 1.0)),
            CdlStyle::NoClamp => rgb,
        };
        let rgb = saturate(rgb, 1.0 / self.saturation as f32);
        let mut out = [0.0; 3];
        for c in 0..3 {
            let inv_p = 1.0 / self.power[c] as f32;
            let v = match style {
                CdlStyle::AscCdl => rgb[c].clamp(0.0, 1.0).powf(inv_p),
                CdlStyle::NoClamp => signed_pow(rgb[c], inv_p),
            };
            out[c] = (v - self.offset[c] as f32) / self.slope[c] as f32;
        }
        out
    }
}

#[inline]
fn signed_pow(v: f32, p: f32) -> f32 {
    if v < 0.0 { -(-v).powf(p) } else { v.powf(p) }
}

#[inline]
fn saturate(rgb: [f32; 3], sat: f32) -> [f32; 3] {
    if sat == 1.0 {
        return rgb;
    }
    let luma = rgb[0] * LUMA[0] + rgb[1] * LUMA[1] + rgb[2] * LUMA[2];
    rgb.map(|v| luma + (v - luma) * sat)
}
