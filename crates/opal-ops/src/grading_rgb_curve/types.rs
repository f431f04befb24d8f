//! Curve data model: control points, validated B-spline curves, RGBM sets.

use crate::{OpsError, OpsResult};

use super::apply::GradingStyle;

/// A control point on a curve.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlPoint {
    /// Input value.
    pub x: f32,
    /// Output value.
    pub y: f32,
}

impl ControlPoint {
    /// Creates a control point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Curve slot in a [`GradingRgbCurves`] set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum RgbCurveChannel {
    /// Red channel.
    Red = 0,
    /// Green channel.
    Green = 1,
    /// Blue channel.
    Blue = 2,
    /// Master, applied to all three after the per-channel curves.
    Master = 3,
}

/// Number of curves in a set.
pub const NUM_RGB_CURVES: usize = 4;

/// Control points plus optional per-point slopes, where 0 means "estimate".
///
/// Invariant: at least 2 points, x strictly increasing, and one slope per
/// point. Every constructor and setter checks it.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingBSplineCurve {
    points: Vec<ControlPoint>,
    slopes: Vec<f32>,
}

impl GradingBSplineCurve {
    /// Creates a curve with estimated slopes.
    pub fn new(points: Vec<ControlPoint>) -> OpsResult<Self> {
        let slopes = vec![0.0; points.len()];
        Self::with_slopes(points, slopes)
    }

    /// Creates a curve from a flat `[x0, y0, x1, y1, ...]` list.
    pub fn from_xy(values: &[f32]) -> OpsResult<Self> {
        if values.len() % 2 != 0 {
            return Err(OpsError::InvalidParameter(format!(
                "curve coordinates must come in x/y pairs, got {} values",
                values.len()
            )));
        }
        let points = values
            .chunks_exact(2)
            .map(|p| ControlPoint::new(p[0], p[1]))
            .collect();
        Self::new(points)
    }

    /// Creates a curve with explicit slopes.
    pub fn with_slopes(points: Vec<ControlPoint>, slopes: Vec<f32>) -> OpsResult<Self> {
        validate(&points, &slopes)?;
        Ok(Self { points, slopes })
    }

    /// Default curve for a style: `[(0,0),(0.5,0.5),(1,1)]`, or
    /// `[(-7,-7),(0,0),(7,7)]` for linear.
    pub fn default_for(style: GradingStyle) -> Self {
        let points = match style {
            GradingStyle::Log | GradingStyle::Video => vec![
                ControlPoint::new(0.0, 0.0),
                ControlPoint::new(0.5, 0.5),
                ControlPoint::new(1.0, 1.0),
            ],
            GradingStyle::Linear => vec![
                ControlPoint::new(-7.0, -7.0),
                ControlPoint::new(0.0, 0.0),
                ControlPoint::new(7.0, 7.0),
            ],
        };
        Self {
            slopes: vec![0.0; points.len()],
            points,
        }
    }

    /// Control points.
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Slopes, 0 where estimated.
    pub fn slopes(&self) -> &[f32] {
        &self.slopes
    }

    /// Replaces point `index`. The curve is unchanged on error.
    pub fn set_point(&mut self, index: usize, point: ControlPoint) -> OpsResult<()> {
        if index >= self.points.len() {
            return Err(OpsError::InvalidParameter(format!(
                "control point index {index} out of range (curve has {})",
                self.points.len()
            )));
        }
        let mut points = self.points.clone();
        points[index] = point;
        validate(&points, &self.slopes)?;
        self.points = points;
        Ok(())
    }

    /// Replaces all points, resetting slopes to "estimate".
    pub fn set_points(&mut self, points: Vec<ControlPoint>) -> OpsResult<()> {
        let slopes = vec![0.0; points.len()];
        validate(&points, &slopes)?;
        self.points = points;
        self.slopes = slopes;
        Ok(())
    }

    /// Replaces the slopes.
    pub fn set_slopes(&mut self, slopes: Vec<f32>) -> OpsResult<()> {
        validate(&self.points, &slopes)?;
        self.slopes = slopes;
        Ok(())
    }

    /// True when no slope was given by the user.
    pub fn slopes_are_default(&self) -> bool {
        self.slopes.iter().all(|&s| s == 0.0)
    }

    /// True when every point lies on `y = x` and slopes are estimated.
    pub fn is_identity(&self) -> bool {
        self.slopes_are_default() && self.points.iter().all(|p| (p.x - p.y).abs() < 1e-6)
    }
}

fn validate(points: &[ControlPoint], slopes: &[f32]) -> OpsResult<()> {
    if points.len() < 2 {
        return Err(OpsError::InvalidParameter(format!(
            "curve needs at least 2 control points, got {}",
            points.len()
        )));
    }
    if slopes.len() != points.len() {
        return Err(OpsError::SizeMismatch(format!(
            "curve has {} control points but {} slopes",
            points.len(),
            slopes.len()
        )));
    }
    for (i, pair) in points.windows(2).enumerate() {
        if !(pair[1].x > pair[0].x) {
            return Err(OpsError::InvalidParameter(format!(
                "control point x values must be strictly increasing: point {} x={} follows x={}",
                i + 1,
                pair[1].x,
                pair[0].x
            )));
        }
    }
    Ok(())
}

/// Red, green, blue and master curves.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingRgbCurves {
    curves: [GradingBSplineCurve; NUM_RGB_CURVES],
}

impl GradingRgbCurves {
    /// Creates a set from validated curves.
    pub fn new(
        red: GradingBSplineCurve,
        green: GradingBSplineCurve,
        blue: GradingBSplineCurve,
        master: GradingBSplineCurve,
    ) -> Self {
        Self {
            curves: [red, green, blue, master],
        }
    }

    /// All four curves at the style default.
    pub fn default_for(style: GradingStyle) -> Self {
        let c = GradingBSplineCurve::default_for(style);
        Self {
            curves: [c.clone(), c.clone(), c.clone(), c],
        }
    }

    /// Curve for `channel`.
    #[inline]
    pub fn curve(&self, channel: RgbCurveChannel) -> &GradingBSplineCurve {
        &self.curves[channel as usize]
    }

    /// Mutable curve for `channel`; its setters keep validating.
    #[inline]
    pub fn curve_mut(&mut self, channel: RgbCurveChannel) -> &mut GradingBSplineCurve {
        &mut self.curves[channel as usize]
    }

    /// Replaces the curve for `channel`.
    pub fn set_curve(&mut self, channel: RgbCurveChannel, curve: GradingBSplineCurve) {
        self.curves[channel as usize] = curve;
    }

    /// All curves in R, G, B, M order.
    pub fn curves(&self) -> &[GradingBSplineCurve; NUM_RGB_CURVES] {
        &self.curves
    }

    /// True when all four curves are identities.
    pub fn is_identity(&self) -> bool {
        self.curves.iter().all(GradingBSplineCurve::is_identity)
    }
}

impl Default for GradingRgbCurves {
    fn default() -> Self {
        Self::default_for(GradingStyle::Log)
    }
}
