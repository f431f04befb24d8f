//! Log and antilog with affine parameters on both sides.
//!
//! Forward (lin to log), per channel:
//!
//! ```text
//! out = log_slope * log_base(lin_slope * in + lin_offset) + log_offset
//! ```
//!
//! The inverse (log to lin) undoes each step:
//!
//! ```text
//! out = (base^((in - log_offset) / log_slope) - lin_offset) / lin_slope
//! ```
//!
//! A plain log is the affine form with unit slopes and zero offsets. The
//! log argument is clamped to the smallest positive `f32`, so forward
//! evaluation of non-positive values is finite. Alpha is never touched.

use crate::{OpsError, OpsResult};

/// Smallest argument passed to `log2`.
const MIN_ARG: f32 = f32::MIN_POSITIVE;

/// Log parameters for R, G and B.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogOp {
    /// Log base.
    pub base: f64,
    /// Multiplier applied to the log.
    pub log_slope: [f64; 3],
    /// Added after the log.
    pub log_offset: [f64; 3],
    /// Multiplier applied to the input before the log.
    pub lin_slope: [f64; 3],
    /// Added to the input before the log.
    pub lin_offset: [f64; 3],
}

impl LogOp {
    /// Plain `log_base(x)`.
    pub fn new(base: f64) -> Self {
        Self {
            base,
            log_slope: [1.0; 3],
            log_offset: [0.0; 3],
            lin_slope: [1.0; 3],
            lin_offset: [0.0; 3],
        }
    }

    /// Checks that both directions are defined.
    ///
    /// The base must be positive, finite and not 1; both slopes must be
    /// finite and non-zero on every channel.
    pub fn validate(&self) -> OpsResult<()> {
        if !(self.base.is_finite() && self.base > 0.0) || (self.base - 1.0).abs() < 1e-12 {
            return Err(OpsError::InvalidParameter(format!(
                "log base {} must be positive and not 1",
                self.base
            )));
        }
        for c in 0..3 {
            for (what, v) in [("log_slope", self.log_slope[c]), ("lin_slope", self.lin_slope[c])] {
                if !v.is_finite() || v.abs() < 1e-12 {
                    return Err(OpsError::InvalidParameter(format!(
                        "log {what} component {c} is {v}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Precomputes the `f32` evaluation parameters.
    pub fn params(&self) -> LogParams {
        let log2_base = self.base.log2();
        LogParams {
            k: self.log_slope.map(|s| (s / log2_base) as f32),
            kb: self.log_offset.map(|v| v as f32),
            m: self.lin_slope.map(|v| v as f32),
            b: self.lin_offset.map(|v| v as f32),
        }
    }
}

impl Default for LogOp {
    fn default() -> Self {
        Self::new(2.0)
    }
}

/// Evaluation-ready log parameters. `k` already folds in `1 / log2(base)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogParams {
    /// Log-side slope over `log2(base)`.
    pub k: [f32; 3],
    /// Log-side offset.
    pub kb: [f32; 3],
    /// Lin-side slope.
    pub m: [f32; 3],
    /// Lin-side offset.
    pub b: [f32; 3],
}

impl LogParams {
    /// Lin to log on RGB in place.
    #[inline]
    pub fn apply_fwd(&self, rgb: &mut [f32; 3]) {
        for (c, v) in rgb.iter_mut().enumerate() {
            let arg = (*v * self.m[c] + self.b[c]).max(MIN_ARG);
            *v = arg.log2() * self.k[c] + self.kb[c];
        }
    }

    /// Log to lin on RGB in place.
    #[inline]
    pub fn apply_inv(&self, rgb: &mut [f32; 3]) {
        for (c, v) in rgb.iter_mut().enumerate() {
            let lin = ((*v - self.kb[c]) / self.k[c]).exp2();
            *v = (lin - self.b[c]) / self.m[c];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const EPSILON: f32 = 1e-5;

    #[test]
    fn plain_logs() {
        let mut rgb = [10.0, 100.0, 1.0];
        LogOp::new(10.0).params().apply_fwd(&mut rgb);
        assert_abs_diff_eq!(rgb[0], 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(rgb[1], 2.0, epsilon = EPSILON);
        assert_abs_diff_eq!(rgb[2], 0.0, epsilon = EPSILON);

        let mut rgb = [-3.0, 0.0, 3.0];
        LogOp::default().params().apply_inv(&mut rgb);
        assert_relative_eq!(rgb[0], 0.125, max_relative = EPSILON);
        assert_relative_eq!(rgb[1], 1.0, max_relative = EPSILON);
        assert_relative_eq!(rgb[2], 8.0, max_relative = EPSILON);
    }

    #[test]
    fn affine_round_trip() {
        // a Cineon-like encoding per channel
        let op = LogOp {
            base: 10.0,
            log_slope: [0.2, 0.25, 0.3],
            log_offset: [0.6, 0.5, 0.4],
            lin_slope: [1.0, 0.9, 1.1],
            lin_offset: [0.01, 0.02, 0.005],
        };
        op.validate().unwrap();
        let p = op.params();
        let input = [0.0, 0.18, 4.0];
        let mut rgb = input;
        p.apply_fwd(&mut rgb);
        // log10(0.01) * 0.2 + 0.6
        assert_abs_diff_eq!(rgb[0], 0.2, epsilon = EPSILON);
        p.apply_inv(&mut rgb);
        for c in 0..3 {
            assert_relative_eq!(rgb[c], input[c], epsilon = EPSILON, max_relative = 1e-4);
        }
    }

    #[test]
    fn non_positive_arguments_stay_finite() {
        let mut rgb = [-1.0, 0.0, f32::MIN_POSITIVE];
        LogOp::new(2.0).params().apply_fwd(&mut rgb);
        assert!(rgb.iter().all(|v| v.is_finite()), "got {rgb:?}");
        assert_eq!(rgb[0], rgb[1]);
    }

    #[test]
    fn degenerate_parameters_rejected() {
        assert!(LogOp::new(1.0).validate().is_err());
        assert!(LogOp::new(0.0).validate().is_err());
        assert!(LogOp::new(-2.0).validate().is_err());
        let err = LogOp {
            lin_slope: [1.0, 0.0, 1.0],
            ..LogOp::default()
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("lin_slope component 1"), "got: {err}");
    }
}
