//! SIMD-accelerated pixel kernels.
//!
//! Pixels are processed four at a time in structure-of-arrays form using the
//! `wide` crate for portable SIMD on stable Rust. [`Pixel4`] holds one
//! `f32x4` per channel; loads and stores transpose from and to interleaved
//! RGBA buffers.
//!
//! # Example
//!
//! ```rust
//! use opal_math::simd::{Pixel4, pow_clamped_x4};
//! use wide::f32x4;
//!
//! let px = [[0.25_f32, 0.5, 1.0, 1.0]; 4];
//! let mut lanes = Pixel4::load_rgba(&px);
//! lanes.r = pow_clamped_x4(lanes.r, f32x4::splat(2.0));
//! let mut out = [[0.0_f32; 4]; 4];
//! lanes.store_rgba(&mut out);
//! assert!((out[0][0] - 0.0625).abs() < 1e-5);
//! ```
//!
//! Transcendentals go through `wide`'s `ln`/`exp`, which round differently
//! from the scalar `powf`/`log2` path. Callers compare the two paths with a
//! tolerance, never bit-exactly.

use wide::{CmpEq, CmpGt, CmpLt, f32x4};

const LN_2: f32 = std::f32::consts::LN_2;
const LOG2_E: f32 = std::f32::consts::LOG2_E;

/// Four pixels in structure-of-arrays layout.
#[derive(Debug, Clone, Copy)]
pub struct Pixel4 {
    /// Red lanes.
    pub r: f32x4,
    /// Green lanes.
    pub g: f32x4,
    /// Blue lanes.
    pub b: f32x4,
    /// Alpha lanes.
    pub a: f32x4,
}

impl Pixel4 {
    /// Transposes four RGBA pixels into lanes.
    #[inline]
    pub fn load_rgba(px: &[[f32; 4]; 4]) -> Self {
        Self {
            r: f32x4::from([px[0][0], px[1][0], px[2][0], px[3][0]]),
            g: f32x4::from([px[0][1], px[1][1], px[2][1], px[3][1]]),
            b: f32x4::from([px[0][2], px[1][2], px[2][2], px[3][2]]),
            a: f32x4::from([px[0][3], px[1][3], px[2][3], px[3][3]]),
        }
    }

    /// Writes all four lanes back to interleaved pixels.
    #[inline]
    pub fn store_rgba(&self, px: &mut [[f32; 4]; 4]) {
        let (r, g, b, a) = (
            self.r.to_array(),
            self.g.to_array(),
            self.b.to_array(),
            self.a.to_array(),
        );
        for i in 0..4 {
            px[i] = [r[i], g[i], b[i], a[i]];
        }
    }

    /// Extracts pixel `i` as RGBA.
    #[inline]
    pub fn lane(&self, i: usize) -> [f32; 4] {
        [
            self.r.to_array()[i],
            self.g.to_array()[i],
            self.b.to_array()[i],
            self.a.to_array()[i],
        ]
    }

    /// Rebuilds lanes from four RGBA pixels held in an array.
    #[inline]
    pub fn from_lanes(px: [[f32; 4]; 4]) -> Self {
        Self::load_rgba(&px)
    }
}

/// `v * slope + offset` on four values.
#[inline]
pub fn mul_add_x4(v: f32x4, slope: f32x4, offset: f32x4) -> f32x4 {
    v * slope + offset
}

/// Clamps four values to `[lo, hi]`.
#[inline]
pub fn clamp_x4(v: f32x4, lo: f32, hi: f32) -> f32x4 {
    v.max(f32x4::splat(lo)).min(f32x4::splat(hi))
}

/// `pow(v, e)` for positive `v`, computed as `exp(e * ln(v))`.
///
/// Lanes with `v <= 0` produce 0 and lanes with `e == 0` produce 1.
#[inline]
pub fn pow_clamped_x4(v: f32x4, e: f32x4) -> f32x4 {
    let zero = f32x4::splat(0.0);
    let one = f32x4::splat(1.0);
    let positive = v.cmp_gt(zero);
    let safe = positive.blend(v, one);
    let p = (e * safe.ln()).exp();
    let p = positive.blend(p, zero);
    e.cmp_eq(zero).blend(one, p)
}

/// Sign-preserving power: `sign(v) * pow(|v|, e)`.
#[inline]
pub fn pow_mirror_x4(v: f32x4, e: f32x4) -> f32x4 {
    let p = pow_clamped_x4(v.abs(), e);
    v.cmp_lt(f32x4::splat(0.0)).blend(-p, p)
}

/// Power on positive lanes, pass-through elsewhere.
#[inline]
pub fn pow_passthru_x4(v: f32x4, e: f32x4) -> f32x4 {
    let p = pow_clamped_x4(v, e);
    v.cmp_gt(f32x4::splat(0.0)).blend(p, v)
}

/// `log2(v)` on four values. Non-positive lanes follow `ln`'s convention.
#[inline]
pub fn log2_x4(v: f32x4) -> f32x4 {
    v.ln() * f32x4::splat(LOG2_E)
}

/// `2^v` on four values.
#[inline]
pub fn exp2_x4(v: f32x4) -> f32x4 {
    (v * f32x4::splat(LN_2)).exp()
}

/// Applies a row-major 4x4 matrix plus offset to four pixels.
#[inline]
pub fn matrix_x4(m: &[f32; 16], offset: &[f32; 4], px: &mut Pixel4) {
    let s = f32x4::splat;
    let (r, g, b, a) = (px.r, px.g, px.b, px.a);
    px.r = r * s(m[0]) + g * s(m[1]) + b * s(m[2]) + a * s(m[3]) + s(offset[0]);
    px.g = r * s(m[4]) + g * s(m[5]) + b * s(m[6]) + a * s(m[7]) + s(offset[1]);
    px.b = r * s(m[8]) + g * s(m[9]) + b * s(m[10]) + a * s(m[11]) + s(offset[2]);
    px.a = r * s(m[12]) + g * s(m[13]) + b * s(m[14]) + a * s(m[15]) + s(offset[3]);
}
