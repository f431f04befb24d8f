//! Curve evaluation and numeric inversion.
//!
//! Forward evaluation finds the segment and evaluates its quadratic; outside
//! the knot range the boundary tangent is extended linearly.
//!
//! Inversion does not assume the curve is monotonic. A table of
//! [`ENVELOPE_SAMPLES`] values over the knot range is reduced to its running
//! maximum. A binary search finds the first table cell where the envelope
//! reaches `y`, then bisection on the real spline refines inside that cell.
//! For a non-monotonic curve this returns the first `x` where the curve
//! reaches `y`. Below the envelope the start extrapolation is inverted. Above
//! it, a curve that falls after its maximum returns the `x` of that maximum;
//! otherwise the rising end extrapolation is inverted.

use super::spline::SplineData;

/// Samples in the inversion table.
pub const ENVELOPE_SAMPLES: usize = 4096;

/// Bisection steps inside one table cell.
const BISECT_ITERATIONS: usize = 40;

/// Slope below which extrapolation is treated as flat.
const FLAT_SLOPE: f32 = 1e-5;

/// Evaluates the curve at `x`. Identity curves return `x`.
pub fn eval_curve(spline: &SplineData, x: f32) -> f32 {
    if spline.is_empty() {
        return x;
    }
    let kn_start = spline.start();
    let kn_end = spline.end();

    if x <= kn_start {
        return (x - kn_start) * spline.coefs_b[0] + spline.coefs_c[0];
    }
    if x >= kn_end {
        let (slope, value) = end_tangent(spline);
        return (x - kn_end) * slope + value;
    }

    let seg = segment_of(spline, x);
    let t = x - spline.knots[seg];
    (spline.coefs_a[seg] * t + spline.coefs_b[seg]) * t + spline.coefs_c[seg]
}

/// Inverts the curve at `y`. Identity curves return `y`.
pub fn eval_curve_rev(spline: &SplineData, y: f32) -> f32 {
    if spline.is_empty() {
        return y;
    }
    let env = &spline.envelope;
    let kn_start = spline.start();
    let kn_end = spline.end();

    if env.is_empty() || y <= env[0] {
        let b = spline.coefs_b[0];
        if b < FLAT_SLOPE {
            return kn_start;
        }
        return (y - spline.coefs_c[0]) / b + kn_start;
    }
    let peak = env[env.len() - 1];
    if y >= peak {
        let (slope, value) = end_tangent(spline);
        if value < peak {
            // the envelope stays flat from the maximum on
            return sample_x(spline, env.partition_point(|&e| e < peak));
        }
        if slope < FLAT_SLOPE {
            return kn_end;
        }
        return (y - value) / slope + kn_end;
    }

    // env[0] < y < env[last], so k is in 1..len
    let k = env.partition_point(|&e| e < y);
    let mut lo = sample_x(spline, k - 1);
    let mut hi = sample_x(spline, k);
    for _ in 0..BISECT_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if eval_curve(spline, mid) < y {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Builds the running-maximum table used by [`eval_curve_rev`].
pub(crate) fn build_envelope(spline: &SplineData) -> Vec<f32> {
    if spline.is_empty() {
        return Vec::new();
    }
    let mut env = Vec::with_capacity(ENVELOPE_SAMPLES);
    let mut running = f32::NEG_INFINITY;
    for k in 0..ENVELOPE_SAMPLES {
        running = running.max(eval_curve(spline, sample_x(spline, k)));
        env.push(running);
    }
    env
}

#[inline]
fn sample_x(spline: &SplineData, k: usize) -> f32 {
    let (start, end) = (spline.start(), spline.end());
    if k + 1 >= ENVELOPE_SAMPLES {
        return end;
    }
    start + (end - start) * (k as f32 / (ENVELOPE_SAMPLES - 1) as f32)
}

/// Index of the segment containing `x`, for `start < x < end`.
#[inline]
fn segment_of(spline: &SplineData, x: f32) -> usize {
    let upper = spline.knots.partition_point(|&k| k <= x);
    upper.saturating_sub(1).min(spline.num_segments() - 1)
}

/// Slope and value at the last knot.
#[inline]
fn end_tangent(spline: &SplineData) -> (f32, f32) {
    let last = spline.num_segments() - 1;
    let (a, b, c) = (spline.coefs_a[last], spline.coefs_b[last], spline.coefs_c[last]);
    let t = spline.end() - spline.knots[spline.knots.len() - 2];
    (2.0 * a * t + b, (a * t + b) * t + c)
}

#[cfg(test)]
mod tests {
    use super::super::spline::fit_rgb_spline;
    use super::super::types::ControlPoint;
    use super::*;
    use approx::assert_abs_diff_eq;

    const EPSILON: f32 = 1e-3;

    fn fit(xy: &[f32]) -> SplineData {
        let pts: Vec<_> = xy.chunks_exact(2).map(|p| ControlPoint::new(p[0], p[1])).collect();
        let slopes = vec![0.0; pts.len()];
        fit_rgb_spline(&pts, &slopes)
    }

    #[test]
    fn identity_passthrough() {
        let s = SplineData::default();
        assert_eq!(eval_curve(&s, 0.37), 0.37);
        assert_eq!(eval_curve_rev(&s, -2.0), -2.0);
    }

    #[test]
    fn extrapolates_linearly() {
        let s = fit(&[0.0, 0.0, 1.0, 2.0]);
        assert_abs_diff_eq!(eval_curve(&s, -0.5), -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(eval_curve(&s, 1.5), 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(eval_curve_rev(&s, 3.0), 1.5, epsilon = 1e-5);
        assert_abs_diff_eq!(eval_curve_rev(&s, -1.0), -0.5, epsilon = 1e-5);
    }

    #[test]
    fn monotonic_roundtrip() {
        let s = fit(&[0.0, 0.0, 0.4, 0.2, 0.5, 0.7, 0.6, 1.5, 1.0, 2.1]);
        for k in 0..=50 {
            let x = -0.2 + 1.4 * k as f32 / 50.0;
            let back = eval_curve_rev(&s, eval_curve(&s, x));
            assert!((back - x).abs() < 1e-4, "x={x} back={back}");
        }
    }

    #[test]
    fn non_monotonic_returns_first_crossing() {
        // rises to 0.8 then falls back to 0.2
        let s = fit(&[0.0, 0.0, 0.5, 0.8, 1.0, 0.2]);
        let peak = s.envelope[ENVELOPE_SAMPLES - 1];
        assert!(peak >= 0.8 - 1e-4);

        // y = 0.3 is reached on the rising side and again on the falling side
        let x = eval_curve_rev(&s, 0.3);
        assert!(x < 0.5, "expected the rising-side crossing, got {x}");
        assert!((eval_curve(&s, x) - 0.3).abs() < 1e-4);
    }

    #[test]
    fn above_the_peak_of_a_falling_curve() {
        let s = fit(&[0.0, 0.0, 0.5, 0.8, 1.0, 0.2]);
        let peak = s.envelope[ENVELOPE_SAMPLES - 1];

        let at_peak = eval_curve_rev(&s, 0.85);
        assert!(at_peak > 0.3 && at_peak < 0.7, "got {at_peak}");
        assert_abs_diff_eq!(eval_curve(&s, at_peak), peak, epsilon = EPSILON);
        assert_eq!(eval_curve_rev(&s, 1.0), at_peak);
        assert_eq!(eval_curve_rev(&s, 10.0), at_peak);

        // the inverse stays monotonic across the top of the envelope
        let below = eval_curve_rev(&s, peak - 0.01);
        assert!(below <= at_peak, "{below} > {at_peak}");
        assert!(eval_curve_rev(&s, peak - 0.02) <= below);
    }

    #[test]
    fn falling_start_clamps_to_first_knot() {
        let pts = vec![ControlPoint::new(0.0, 0.5), ControlPoint::new(1.0, 1.0)];
        let s = fit_rgb_spline(&pts, &[-0.5, 2.0]);
        assert_eq!(eval_curve_rev(&s, -3.0), 0.0);
    }

    #[test]
    fn flat_end_returns_knot() {
        let pts = vec![ControlPoint::new(0.0, 0.0), ControlPoint::new(1.0, 1.0)];
        let s = fit_rgb_spline(&pts, &[1.0, 0.0]);
        // end tangent is flat, so anything above the peak maps to the last knot
        assert_eq!(eval_curve_rev(&s, 5.0), 1.0);
    }
}
