//! Fitted splines for a curve set, ready for per-pixel evaluation.

use tracing::trace;

use super::spline::{SplineData, fit_rgb_spline};
use super::types::{GradingRgbCurves, NUM_RGB_CURVES, RgbCurveChannel};

/// Splines for R, G, B and master. Identity curves stay empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradingRgbCurvePreRender {
    splines: [SplineData; NUM_RGB_CURVES],
    local_bypass: bool,
}

impl GradingRgbCurvePreRender {
    /// Fits every non-identity curve of `curves`.
    pub fn new(curves: &GradingRgbCurves) -> Self {
        let mut splines: [SplineData; NUM_RGB_CURVES] = Default::default();
        let mut local_bypass = true;

        for (slot, curve) in splines.iter_mut().zip(curves.curves()) {
            if curve.is_identity() {
                continue;
            }
            local_bypass = false;
            *slot = fit_rgb_spline(curve.points(), curve.slopes());
        }
        trace!(
            segments = ?splines.each_ref().map(SplineData::num_segments),
            local_bypass,
            "fitted rgb curves"
        );

        Self { splines, local_bypass }
    }

    /// Spline for `channel`.
    #[inline]
    pub fn get(&self, channel: RgbCurveChannel) -> &SplineData {
        &self.splines[channel as usize]
    }

    /// True when every curve is an identity.
    #[inline]
    pub fn is_bypass(&self) -> bool {
        self.local_bypass
    }
}

#[cfg(test)]
mod tests {
    use super::super::types::GradingBSplineCurve;
    use super::*;

    #[test]
    fn identity_set_is_bypass() {
        let pr = GradingRgbCurvePreRender::new(&GradingRgbCurves::default());
        assert!(pr.is_bypass());
        assert!(pr.get(RgbCurveChannel::Master).is_empty());
    }

    #[test]
    fn only_edited_curves_are_fitted() {
        let mut curves = GradingRgbCurves::default();
        curves.set_curve(
            RgbCurveChannel::Green,
            GradingBSplineCurve::from_xy(&[0.0, 0.1, 1.0, 0.9]).unwrap(),
        );
        let pr = GradingRgbCurvePreRender::new(&curves);
        assert!(!pr.is_bypass());
        assert!(pr.get(RgbCurveChannel::Red).is_empty());
        assert!(!pr.get(RgbCurveChannel::Green).is_empty());
    }
}
