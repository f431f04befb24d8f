//! Slope estimation at control points.
//!
//! Interior slopes are secant slopes averaged with weights equal to the
//! secant lengths. Runs of equal secants are merged first so that a straight
//! section stays straight. End slopes extrapolate the neighbouring interior
//! slope and never drop below [`MIN_END_SLOPE`].

use super::types::ControlPoint;

/// Floor for the extrapolated end slopes.
pub const MIN_END_SLOPE: f32 = 0.01;

/// Estimates one slope per control point. `points` must hold at least 2.
pub fn estimate_rgb_slopes(points: &[ControlPoint]) -> Vec<f32> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }

    let (secant, mut length): (Vec<f32>, Vec<f32>) = points
        .windows(2)
        .map(|p| {
            let dx = p[1].x - p[0].x;
            let dy = p[1].y - p[0].y;
            (dy / dx, (dx * dx + dy * dy).sqrt())
        })
        .unzip();

    if n == 2 {
        return vec![secant[0], secant[0]];
    }

    // merge runs of equal secant slopes
    let mut i = 0;
    loop {
        let mut j = i;
        let mut run = length[i];
        while j < n - 2 && (secant[j + 1] - secant[j]).abs() < 1e-6 {
            run += length[j + 1];
            j += 1;
        }
        length[i..=j].fill(run);
        i = j + 1;
        if i >= n - 2 {
            break;
        }
    }

    let mut slopes = vec![0.0; n];
    for k in 1..n - 1 {
        slopes[k] = (length[k] * secant[k] + length[k - 1] * secant[k - 1])
            / (length[k] + length[k - 1]);
    }
    slopes[0] = MIN_END_SLOPE.max(0.5 * (3.0 * secant[0] - slopes[1]));
    slopes[n - 1] = MIN_END_SLOPE.max(0.5 * (3.0 * secant[n - 2] - slopes[n - 2]));
    slopes
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn pts(xy: &[f32]) -> Vec<ControlPoint> {
        xy.chunks_exact(2).map(|p| ControlPoint::new(p[0], p[1])).collect()
    }

    #[test]
    fn two_points_use_secant() {
        let slopes = estimate_rgb_slopes(&pts(&[0.0, 0.0, 2.0, 1.0]));
        assert_eq!(slopes, vec![0.5, 0.5]);
    }

    #[test]
    fn straight_line_has_unit_slopes() {
        let slopes = estimate_rgb_slopes(&pts(&[0.0, 0.0, 0.5, 0.5, 1.0, 1.0]));
        for s in slopes {
            assert!((s - 1.0).abs() < EPSILON, "slope {s}");
        }
    }

    #[test]
    fn end_slopes_floored() {
        // steep then flat: extrapolated end slope would go negative
        let slopes = estimate_rgb_slopes(&pts(&[0.0, 0.0, 0.1, 1.0, 1.0, 1.0]));
        assert_eq!(slopes[2], MIN_END_SLOPE);
        assert!(slopes[1] > 0.0);
    }
}
