//! Per-channel power function with configurable negative handling.

use crate::{OpsError, OpsResult};

/// How negative inputs are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum NegativeStyle {
    /// Negative values clamp to 0 before the power.
    #[default]
    Clamp,
    /// `sign(x) * pow(|x|, e)`.
    Mirror,
    /// Negative values pass through unchanged.
    PassThru,
}

/// Exponent on R, G, B and A.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentOp {
    /// Exponents in RGBA order.
    pub value: [f64; 4],
    /// Negative handling.
    pub negative_style: NegativeStyle,
}

impl ExponentOp {
    /// Creates an exponent with the default clamping style.
    pub fn new(value: [f64; 4]) -> Self {
        Self {
            value,
            negative_style: NegativeStyle::Clamp,
        }
    }

    /// Sets the negative style.
    pub fn with_negative_style(mut self, style: NegativeStyle) -> Self {
        self.negative_style = style;
        self
    }

    /// True when every exponent is 1 and negatives pass through unchanged.
    pub fn is_identity(&self) -> bool {
        self.negative_style != NegativeStyle::Clamp
            && self.value.iter().all(|e| (e - 1.0).abs() < 1e-9)
    }

    /// Reciprocal exponents. Fails when any component is 0.
    pub fn inverse(&self) -> OpsResult<Self> {
        if let Some(i) = self.value.iter().position(|e| e.abs() < 1e-15) {
            return Err(OpsError::NotInvertible(format!(
                "exponent component {i} is zero"
            )));
        }
        Ok(Self {
            value: self.value.map(|e| 1.0 / e),
            negative_style: self.negative_style,
        })
    }

    /// Exponents as `f32`.
    pub fn value_f32(&self) -> [f32; 4] {
        self.value.map(|e| e as f32)
    }
}

impl Default for ExponentOp {
    fn default() -> Self {
        Self::new([1.0; 4])
    }
}

#[inline]
fn pow_clamp(x: f32, e: f32) -> f32 {
    x.max(0.0).powf(e)
}

#[inline]
fn pow_mirror(x: f32, e: f32) -> f32 {
    if x < 0.0 { -(-x).powf(e) } else { x.powf(e) }
}

#[inline]
fn pow_passthru(x: f32, e: f32) -> f32 {
    if x > 0.0 { x.powf(e) } else { x }
}

/// Applies the exponent to an RGBA pixel in place.
#[inline]
pub fn apply_exponent(value: &[f32; 4], style: NegativeStyle, rgba: &mut [f32; 4]) {
    let f = match style {
        NegativeStyle::Clamp => pow_clamp,
        NegativeStyle::Mirror => pow_mirror,
        NegativeStyle::PassThru => pow_passthru,
    };
    for (c, e) in rgba.iter_mut().zip(value) {
        *c = f(*c, *e);
    }
}
