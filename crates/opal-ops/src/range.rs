//! Range - linear remap with optional clamping.
//!
//! A range maps `[min_in, max_in]` onto `[min_out, max_out]`. Either bound
//! pair may be unset; with only one pair set the remap is a pure offset.
//!
//! # Example
//!
//! ```rust
//! use opal_ops::range::{Range, RangeStyle};
//!
//! let range = Range::new(0.0, 1.0, 0.1, 0.9);
//! let mut px = [0.0, 0.5, 2.0];
//! range.apply(RangeStyle::Clamp, &mut px);
//! assert!((px[0] - 0.1).abs() < 1e-6);
//! assert!((px[2] - 0.9).abs() < 1e-6);
//! ```

use crate::{OpsError, OpsResult};

/// Clamping behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum RangeStyle {
    /// Clamp to the output bounds that are set.
    #[default]
    Clamp,
    /// Remap only.
    NoClamp,
}

/// Range bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Range {
    /// Lower input bound.
    pub min_in: Option<f64>,
    /// Upper input bound.
    pub max_in: Option<f64>,
    /// Lower output bound.
    pub min_out: Option<f64>,
    /// Upper output bound.
    pub max_out: Option<f64>,
}

impl Range {
    /// Full remap from `[min_in, max_in]` to `[min_out, max_out]`.
    pub fn new(min_in: f64, max_in: f64, min_out: f64, max_out: f64) -> Self {
        Self {
            min_in: Some(min_in),
            max_in: Some(max_in),
            min_out: Some(min_out),
            max_out: Some(max_out),
        }
    }

    /// Checks that bounds come in in/out pairs and the input span is not empty.
    pub fn validate(&self) -> OpsResult<()> {
        if self.min_in.is_some() != self.min_out.is_some() {
            return Err(OpsError::InvalidParameter(
                "range min_in and min_out must both be set or both unset".into(),
            ));
        }
        if self.max_in.is_some() != self.max_out.is_some() {
            return Err(OpsError::InvalidParameter(
                "range max_in and max_out must both be set or both unset".into(),
            ));
        }
        if let (Some(lo), Some(hi)) = (self.min_in, self.max_in) {
            if (hi - lo).abs() < 1e-12 {
                return Err(OpsError::InvalidParameter(format!(
                    "range input span [{lo}, {hi}] is empty"
                )));
            }
        }
        Ok(())
    }

    /// Multiplier of the remap.
    pub fn scale(&self) -> f64 {
        match (self.min_in, self.max_in, self.min_out, self.max_out) {
            (Some(a), Some(b), Some(c), Some(d)) if (b - a).abs() >= 1e-12 => (d - c) / (b - a),
            _ => 1.0,
        }
    }

    /// Offset of the remap.
    pub fn offset(&self) -> f64 {
        match (self.min_in, self.min_out, self.max_in, self.max_out) {
            (Some(lo_in), Some(lo_out), _, _) => lo_out - lo_in * self.scale(),
            (_, _, Some(hi_in), Some(hi_out)) => hi_out - hi_in * self.scale(),
            _ => 0.0,
        }
    }

    /// True when the remap and any clamping leave every value unchanged.
    pub fn is_identity(&self, style: RangeStyle) -> bool {
        let remap_identity = (self.scale() - 1.0).abs() < 1e-12 && self.offset().abs() < 1e-12;
        match style {
            RangeStyle::NoClamp => remap_identity,
            RangeStyle::Clamp => remap_identity && self.min_out.is_none() && self.max_out.is_none(),
        }
    }

    /// Swapped range. Fails when the output span is empty.
    pub fn inverse(&self) -> OpsResult<Self> {
        if let (Some(lo), Some(hi)) = (self.min_out, self.max_out) {
            if (hi - lo).abs() < 1e-12 {
                return Err(OpsError::NotInvertible(format!(
                    "range output span [{lo}, {hi}] is degenerate"
                )));
            }
        }
        Ok(Self {
            min_in: self.min_out,
            max_in: self.max_out,
            min_out: self.min_in,
            max_out: self.max_in,
        })
    }

    /// Precomputes the `f32` evaluation parameters.
    pub fn params(&self, style: RangeStyle) -> RangeParams {
        let (lower, upper) = match style {
            RangeStyle::Clamp => match (self.min_out, self.max_out) {
                // a flipped output range clamps to its sorted bounds
                (Some(lo), Some(hi)) => (lo.min(hi) as f32, lo.max(hi) as f32),
                (lo, hi) => (
                    lo.map_or(f32::NEG_INFINITY, |v| v as f32),
                    hi.map_or(f32::INFINITY, |v| v as f32),
                ),
            },
            RangeStyle::NoClamp => (f32::NEG_INFINITY, f32::INFINITY),
        };
        RangeParams {
            scale: self.scale() as f32,
            offset: self.offset() as f32,
            lower,
            upper,
            clamps: style == RangeStyle::Clamp
                && (self.min_out.is_some() || self.max_out.is_some()),
        }
    }

    /// Applies the range to RGB in place.
    pub fn apply(&self, style: RangeStyle, rgb: &mut [f32; 3]) {
        self.params(style).apply(rgb);
    }
}

/// Evaluation-ready range: `clamp(x * scale + offset, lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeParams {
    /// Multiplier.
    pub scale: f32,
    /// Offset.
    pub offset: f32,
    /// Lower clamp, `-inf` when unset.
    pub lower: f32,
    /// Upper clamp, `+inf` when unset.
    pub upper: f32,
    /// Whether clamping is active; NaN maps to `lower` when it is.
    /// Unbounded ranges never clamp.
    pub clamps: bool,
}

impl RangeParams {
    /// Applies to RGB in place.
    #[inline]
    pub fn apply(&self, rgb: &mut [f32; 3]) {
        for c in rgb.iter_mut() {
            let v = *c * self.scale + self.offset;
            *c = if !self.clamps {
                v
            } else if v.is_nan() {
                self.lower
            } else {
                v.max(self.lower).min(self.upper)
            };
        }
    }
}
