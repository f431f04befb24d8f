//! 4x4 affine matrix with RGBA offset.
//!
//! Storage is `f64` so that chains of folded matrices keep their precision;
//! evaluation converts once with [`Matrix44::to_f32`].

use glam::{DMat4, DVec4};

/// Row-major 4x4 matrix plus an RGBA offset: `out = m * in + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix44 {
    /// Elements in row-major order.
    pub m: [f64; 16],
    /// Offset added after the multiply.
    pub offset: [f64; 4],
}

impl Matrix44 {
    /// Identity elements.
    pub const IDENTITY_ELEMENTS: [f64; 16] = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];

    /// Identity matrix with zero offset.
    pub const IDENTITY: Self = Self {
        m: Self::IDENTITY_ELEMENTS,
        offset: [0.0; 4],
    };

    /// Creates a matrix from row-major elements and an offset.
    #[inline]
    pub fn new(m: [f64; 16], offset: [f64; 4]) -> Self {
        Self { m, offset }
    }

    /// Diagonal scale matrix.
    pub fn scale(s: [f64; 4]) -> Self {
        let mut m = [0.0; 16];
        for (i, v) in s.iter().enumerate() {
            m[i * 5] = *v;
        }
        Self { m, offset: [0.0; 4] }
    }

    fn to_glam(&self) -> DMat4 {
        // glam is column-major
        DMat4::from_cols_array(&self.m).transpose()
    }

    fn from_glam(m: DMat4, offset: DVec4) -> Self {
        Self {
            m: m.transpose().to_cols_array(),
            offset: offset.to_array(),
        }
    }

    /// Checks whether this is the identity within `eps`.
    pub fn is_identity(&self, eps: f64) -> bool {
        self.m
            .iter()
            .zip(Self::IDENTITY_ELEMENTS.iter())
            .all(|(a, b)| (a - b).abs() <= eps)
            && self.offset.iter().all(|o| o.abs() <= eps)
    }

    /// Returns the inverse, or `None` when the matrix is singular.
    ///
    /// The inverse of `M x + o` is `M⁻¹ x - M⁻¹ o`.
    pub fn inverse(&self) -> Option<Self> {
        let m = self.to_glam();
        let det = m.determinant();
        if !det.is_finite() || det.abs() < 1e-12 {
            return None;
        }
        let inv = m.inverse();
        let off = -(inv * DVec4::from_array(self.offset));
        Some(Self::from_glam(inv, off))
    }

    /// Composition applying `self` first, then `next`.
    pub fn then(&self, next: &Self) -> Self {
        let a = self.to_glam();
        let b = next.to_glam();
        let off = b * DVec4::from_array(self.offset) + DVec4::from_array(next.offset);
        Self::from_glam(b * a, off)
    }

    /// Applies the matrix to an RGBA value in double precision.
    pub fn apply(&self, rgba: [f64; 4]) -> [f64; 4] {
        let out = self.to_glam() * DVec4::from_array(rgba) + DVec4::from_array(self.offset);
        out.to_array()
    }

    /// Converts to single precision for evaluation.
    pub fn to_f32(&self) -> ([f32; 16], [f32; 4]) {
        let mut m = [0.0_f32; 16];
        for (dst, src) in m.iter_mut().zip(self.m.iter()) {
            *dst = *src as f32;
        }
        let o = self.offset;
        (m, [o[0] as f32, o[1] as f32, o[2] as f32, o[3] as f32])
    }
}

impl Default for Matrix44 {
    fn default() -> Self {
        Self::IDENTITY
    }
}
