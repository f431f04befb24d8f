//! User-editable RGB curves on quadratic B-splines.
//!
//! A curve set holds red, green, blue and master curves. Each curve is built
//! from control points in four steps:
//!
//! 1. **Slopes**: estimated from neighbouring secants unless the user gave any
//! 2. **Fit**: one quadratic per interval, or two joined at a split knot
//! 3. **Adjust**: a split with a negative middle slope is flattened and refit
//! 4. **Evaluate**: `(A*t + B)*t + C` inside, boundary tangent outside
//!
//! Inversion samples the curve into a running-maximum envelope and bisects
//! inside the matching cell, so it is defined for non-monotonic curves too
//! (see [`eval_curve_rev`]).
//!
//! # Example
//!
//! ```
//! use opal_ops::grading_rgb_curve::*;
//!
//! let mut curves = GradingRgbCurves::default();
//! curves.set_curve(
//!     RgbCurveChannel::Master,
//!     GradingBSplineCurve::from_xy(&[0.0, 0.1, 0.5, 0.55, 1.0, 1.0])?,
//! );
//! let pr = GradingRgbCurvePreRender::new(&curves);
//!
//! let mut rgb = [0.18_f32, 0.18, 0.18];
//! apply_grading_rgb_curve(GradingStyle::Log, false, &pr, true, &mut rgb);
//! assert!(rgb[0] > 0.18);
//! # Ok::<(), opal_ops::OpsError>(())
//! ```

mod apply;
mod eval;
mod prerender;
mod slopes;
mod spline;
mod types;

pub use apply::{
    GradingStyle, apply_grading_rgb_curve, apply_rgb_curves_fwd, apply_rgb_curves_rev,
    lin_to_log, log_to_lin,
};
pub use eval::{ENVELOPE_SAMPLES, eval_curve, eval_curve_rev};
pub use prerender::GradingRgbCurvePreRender;
pub use slopes::{MIN_END_SLOPE, estimate_rgb_slopes};
pub use spline::{SplineData, fit_rgb_spline};
pub use types::{
    ControlPoint, GradingBSplineCurve, GradingRgbCurves, NUM_RGB_CURVES, RgbCurveChannel,
};

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn golden_curves() -> GradingRgbCurves {
        let c = |xy: &[f32]| GradingBSplineCurve::from_xy(xy).unwrap();
        GradingRgbCurves::new(
            c(&[0.0, 0.0, 0.4, 0.2, 0.5, 0.7, 0.6, 1.5, 1.0, 2.1]),
            c(&[-0.1, -0.5, 0.5, 0.2, 1.5, 1.1]),
            c(&[0.0, 0.0, 1.0, 1.0]),
            c(&[0.0, -0.2, 0.3, 0.7, 1.2, 1.5, 2.5, 2.2]),
        )
    }

    #[test]
    fn golden_log_forward() {
        let pr = GradingRgbCurvePreRender::new(&golden_curves());
        assert!(pr.get(RgbCurveChannel::Blue).is_empty(), "blue is an identity");

        let mut rgb = [0.48_f32, 0.18, 0.18];
        apply_grading_rgb_curve(GradingStyle::Log, false, &pr, true, &mut rgb);

        let expected = [1.010323_f32, -0.770639, 0.398450];
        for c in 0..3 {
            assert!(
                (rgb[c] - expected[c]).abs() < EPSILON,
                "channel {c}: got {}, want {}",
                rgb[c],
                expected[c]
            );
        }
    }

    #[test]
    fn golden_log_inverse() {
        let pr = GradingRgbCurvePreRender::new(&golden_curves());
        let mut rgb = [1.010323_f32, -0.770639, 0.398450];
        apply_grading_rgb_curve(GradingStyle::Log, false, &pr, false, &mut rgb);

        let expected = [0.48_f32, 0.18, 0.18];
        for c in 0..3 {
            assert!(
                (rgb[c] - expected[c]).abs() < 1e-4,
                "channel {c}: got {}, want {}",
                rgb[c],
                expected[c]
            );
        }
    }

    #[test]
    fn default_curves_bypass_every_style() {
        for style in [GradingStyle::Log, GradingStyle::Linear, GradingStyle::Video] {
            let pr = GradingRgbCurvePreRender::new(&GradingRgbCurves::default_for(style));
            let mut rgb = [-0.3, 0.18, 4.0];
            apply_grading_rgb_curve(style, false, &pr, true, &mut rgb);
            assert_eq!(rgb, [-0.3, 0.18, 4.0], "{style:?}");
        }
    }
}
