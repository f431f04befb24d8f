//! Quadratic B-spline fitting.
//!
//! Each interval between control points is one quadratic when the end slopes
//! average to the secant, otherwise two quadratics joined at a knot `ksi`.
//! A split whose middle slope comes out negative has its end slopes scaled
//! down and the whole curve is refit once.

use super::eval::build_envelope;
use super::slopes::estimate_rgb_slopes;
use super::types::ControlPoint;

/// Fitted spline: segment `i` spans `knots[i]..knots[i + 1]` and evaluates
/// `(a * t + b) * t + c` with `t = x - knots[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplineData {
    /// Segment boundaries.
    pub knots: Vec<f32>,
    /// Quadratic coefficients.
    pub coefs_a: Vec<f32>,
    /// Linear coefficients.
    pub coefs_b: Vec<f32>,
    /// Constant coefficients.
    pub coefs_c: Vec<f32>,
    /// Running maximum of the curve sampled over the knot range, used for
    /// inversion. Empty for identity curves.
    pub envelope: Vec<f32>,
}

impl SplineData {
    /// Number of quadratic segments.
    #[inline]
    pub fn num_segments(&self) -> usize {
        self.coefs_a.len()
    }

    /// True for an identity (pass-through) curve.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    /// First knot.
    #[inline]
    pub fn start(&self) -> f32 {
        self.knots[0]
    }

    /// Last knot.
    #[inline]
    pub fn end(&self) -> f32 {
        self.knots[self.knots.len() - 1]
    }
}

/// Fits a spline through `points` using `user_slopes` when any is non-zero.
pub fn fit_rgb_spline(points: &[ControlPoint], user_slopes: &[f32]) -> SplineData {
    if points.len() < 2 {
        return SplineData::default();
    }
    let mut slopes = if user_slopes.len() == points.len() && user_slopes.iter().any(|&s| s != 0.0) {
        user_slopes.to_vec()
    } else {
        estimate_rgb_slopes(points)
    };

    let mut spline = fit_with_slopes(points, &slopes);
    if adjust_rgb_slopes(points, &mut slopes, &spline.knots) {
        spline = fit_with_slopes(points, &slopes);
    }
    spline.envelope = build_envelope(&spline);
    spline
}

fn fit_with_slopes(points: &[ControlPoint], slopes: &[f32]) -> SplineData {
    let n = points.len();
    let mut s = SplineData {
        knots: Vec::with_capacity(2 * n),
        coefs_a: Vec::with_capacity(2 * n),
        coefs_b: Vec::with_capacity(2 * n),
        coefs_c: Vec::with_capacity(2 * n),
        envelope: Vec::new(),
    };
    s.knots.push(points[0].x);

    for i in 0..n - 1 {
        let (x0, y0) = (points[i].x, points[i].y);
        let (x1, y1) = (points[i + 1].x, points[i + 1].y);
        let dx = x1 - x0;
        let dy = y1 - y0;
        let secant = dy / dx;

        if (slopes[i] + slopes[i + 1] - 2.0 * secant).abs() <= 1e-6 {
            s.coefs_c.push(y0);
            s.coefs_b.push(slopes[i]);
            s.coefs_a.push(0.5 * (slopes[i + 1] - slopes[i]) / dx);
        } else {
            let ksi = calculate_ksi(points, slopes, i);
            let s_bar = split_slope(points, slopes, i, ksi);
            let eta = (s_bar - slopes[i]) / (ksi - x0);
            let t = ksi - x0;

            s.coefs_c.push(y0);
            s.coefs_b.push(slopes[i]);
            s.coefs_a.push(0.5 * eta);

            s.coefs_c.push(y0 + slopes[i] * t + 0.5 * eta * t * t);
            s.coefs_b.push(s_bar);
            s.coefs_a.push(0.5 * (slopes[i + 1] - s_bar) / (x1 - ksi));

            s.knots.push(ksi);
        }
        s.knots.push(x1);
    }
    s
}

/// Slope at the split knot that keeps the two halves area-consistent with
/// the interval's rise.
#[inline]
fn split_slope(points: &[ControlPoint], slopes: &[f32], i: usize, ksi: f32) -> f32 {
    let (x0, y0) = (points[i].x, points[i].y);
    let (x1, y1) = (points[i + 1].x, points[i + 1].y);
    (2.0 * (y1 - y0) - (ksi - x0) * slopes[i] - (x1 - ksi) * slopes[i + 1]) / (x1 - x0)
}

/// Split knot for interval `i`: the midpoint when both end slopes sit on the
/// same side of the secant, otherwise where the steeper deviation is absorbed.
fn calculate_ksi(points: &[ControlPoint], slopes: &[f32], i: usize) -> f32 {
    let x0 = points[i].x;
    let x1 = points[i + 1].x;
    let dx = x1 - x0;
    let secant = (points[i + 1].y - points[i].y) / dx;

    let aa = slopes[i] - secant;
    let bb = slopes[i + 1] - secant;

    if aa * bb >= 0.0 {
        (x0 + x1) * 0.5
    } else if aa.abs() > bb.abs() {
        x1 + aa * dx / (slopes[i + 1] - slopes[i])
    } else {
        x0 + bb * dx / (slopes[i + 1] - slopes[i])
    }
}

/// Rescales the end slopes of every split interval whose middle slope is
/// negative. Returns whether anything changed.
fn adjust_rgb_slopes(points: &[ControlPoint], slopes: &mut [f32], knots: &[f32]) -> bool {
    let mut adjusted = false;
    // j indexes the knot at the start of interval i
    let mut j = 0;
    for i in 0..points.len() - 1 {
        if knots[j + 1] == points[i + 1].x {
            j += 1;
            continue;
        }
        let ksi = knots[j + 1];
        let s_bar = split_slope(points, slopes, i, ksi);
        if s_bar < 0.0 {
            adjusted = true;
            let (x0, x1) = (points[i].x, points[i + 1].x);
            let dx = x1 - x0;
            let secant = (points[i + 1].y - points[i].y) / dx;
            let blend = ((ksi - x0) * slopes[i] + (x1 - ksi) * slopes[i + 1]) / dx;
            let aim = (0.01 * 0.5 * (slopes[i] + slopes[i + 1])).min(secant);
            let scale = (2.0 * secant - aim) / blend;
            slopes[i] *= scale;
            slopes[i + 1] *= scale;
        }
        j += 2;
    }
    adjusted
}
