//! Allocation - the encoding used to spread LUT samples over a range.
//!
//! - Uniform: linear remap from `[min, max]` to `[0, 1]`
//! - Lg2: `log2(x + offset)`, then the same linear remap
//!
//! The forward direction encodes a value into `[0, 1]`; the inverse decodes
//! a normalized coordinate back into the source domain. Bakers use the
//! inverse to place shaper and cube samples.

use crate::{OpsError, OpsResult};

/// Allocation encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Allocation {
    /// Linear remap.
    #[default]
    Uniform,
    /// Log2 then linear remap. Default range is `[-10, 6]` stops.
    Lg2,
}

/// Allocation with its vars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationOp {
    /// Encoding.
    pub allocation: Allocation,
    /// Source minimum (in stops for Lg2).
    pub min: f64,
    /// Source maximum (in stops for Lg2).
    pub max: f64,
    /// Added before `log2`; ignored for Uniform.
    pub offset: f64,
}

impl AllocationOp {
    /// Uniform over `[0, 1]`.
    pub fn uniform() -> Self {
        Self {
            allocation: Allocation::Uniform,
            min: 0.0,
            max: 1.0,
            offset: 0.0,
        }
    }

    /// Lg2 over `[-10, 6]` with no offset.
    pub fn lg2() -> Self {
        Self {
            allocation: Allocation::Lg2,
            min: -10.0,
            max: 6.0,
            offset: 0.0,
        }
    }

    /// Builds from `allocation` and `vars`: empty for the defaults,
    /// `[min, max]`, or `[min, max, offset]`.
    pub fn from_vars(allocation: Allocation, vars: &[f64]) -> OpsResult<Self> {
        let mut op = match allocation {
            Allocation::Uniform => Self::uniform(),
            Allocation::Lg2 => Self::lg2(),
        };
        match vars {
            [] => {}
            [min, max] => {
                op.min = *min;
                op.max = *max;
            }
            [min, max, offset] => {
                op.min = *min;
                op.max = *max;
                op.offset = *offset;
            }
            _ => {
                return Err(OpsError::InvalidParameter(format!(
                    "allocation vars must hold 2 or 3 values, got {}",
                    vars.len()
                )));
            }
        }
        if !(op.max - op.min).is_normal() {
            return Err(OpsError::InvalidParameter(format!(
                "allocation range [{}, {}] is empty",
                op.min, op.max
            )));
        }
        Ok(op)
    }

    /// The vars in `[min, max, offset]` form.
    pub fn vars(&self) -> [f64; 3] {
        [self.min, self.max, self.offset]
    }

    /// True for a uniform `[0, 1]` allocation.
    pub fn is_identity(&self) -> bool {
        self.allocation == Allocation::Uniform
            && self.min.abs() < 1e-9
            && (self.max - 1.0).abs() < 1e-9
    }

    /// Encodes one value into `[0, 1]`.
    #[inline]
    pub fn encode(&self, x: f64) -> f64 {
        let v = match self.allocation {
            Allocation::Uniform => x,
            Allocation::Lg2 => (x + self.offset).max(f64::MIN_POSITIVE).log2(),
        };
        (v - self.min) / (self.max - self.min)
    }

    /// Decodes a normalized coordinate back into the source domain.
    #[inline]
    pub fn decode(&self, t: f64) -> f64 {
        let v = t * (self.max - self.min) + self.min;
        match self.allocation {
            Allocation::Uniform => v,
            Allocation::Lg2 => v.exp2() - self.offset,
        }
    }
}

impl Default for AllocationOp {
    fn default() -> Self {
        Self::uniform()
    }
}

/// Encodes RGB in place.
#[inline]
pub fn apply_allocation_fwd(op: &AllocationOp, rgb: &mut [f32; 3]) {
    let min = op.min as f32;
    let scale = 1.0 / (op.max - op.min) as f32;
    for c in rgb.iter_mut() {
        let v = match op.allocation {
            Allocation::Uniform => *c,
            Allocation::Lg2 => (*c + op.offset as f32).max(f32::MIN_POSITIVE).log2(),
        };
        *c = (v - min) * scale;
    }
}

/// Decodes RGB in place.
#[inline]
pub fn apply_allocation_inv(op: &AllocationOp, rgb: &mut [f32; 3]) {
    let min = op.min as f32;
    let span = (op.max - op.min) as f32;
    for c in rgb.iter_mut() {
        let v = *c * span + min;
        *c = match op.allocation {
            Allocation::Uniform => v,
            Allocation::Lg2 => v.exp2() - op.offset as f32,
        };
    }
}
