//! Fixed-function conversions: RGB/HSV and the CIE chromaticity pairs.
//!
//! Each style has an exact inverse, which is the style of the opposite pair.

/// Built-in conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedFunctionStyle {
    /// RGB to hue/saturation/value, hue normalized to `[0, 1)`.
    RgbToHsv,
    /// Inverse of [`FixedFunctionStyle::RgbToHsv`].
    HsvToRgb,
    /// CIE XYZ to xyY.
    XyzToXyy,
    /// CIE xyY to XYZ.
    XyyToXyz,
    /// CIE XYZ to u'v'Y.
    XyzToUvy,
    /// CIE u'v'Y to XYZ.
    UvyToXyz,
}

impl FixedFunctionStyle {
    /// The opposite conversion.
    pub fn inverse(self) -> Self {
        match self {
            Self::RgbToHsv => Self::HsvToRgb,
            Self::HsvToRgb => Self::RgbToHsv,
            Self::XyzToXyy => Self::XyyToXyz,
            Self::XyyToXyz => Self::XyzToXyy,
            Self::XyzToUvy => Self::UvyToXyz,
            Self::UvyToXyz => Self::XyzToUvy,
        }
    }

    /// Applies the conversion.
    #[inline]
    pub fn apply(self, rgb: [f32; 3]) -> [f32; 3] {
        match self {
            Self::RgbToHsv => rgb_to_hsv(rgb),
            Self::HsvToRgb => hsv_to_rgb(rgb),
            Self::XyzToXyy => xyz_to_xyy(rgb),
            Self::XyyToXyz => xyy_to_xyz(rgb),
            Self::XyzToUvy => xyz_to_uvy(rgb),
            Self::UvyToXyz => uvy_to_xyz(rgb),
        }
    }
}

/// RGB to HSV with hue in `[0, 1)`.
pub fn rgb_to_hsv([r, g, b]: [f32; 3]) -> [f32; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta.abs() < 1e-10 {
        0.0
    } else if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    let s = if max.abs() < 1e-10 { 0.0 } else { delta / max };
    [h / 6.0, s, max]
}

/// HSV to RGB; hue wraps.
pub fn hsv_to_rgb([h, s, v]: [f32; 3]) -> [f32; 3] {
    let h6 = h.rem_euclid(1.0) * 6.0;
    let c = v * s;
    let x = c * (1.0 - ((h6 % 2.0) - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match h6 as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m]
}

/// XYZ to xyY: `x = X / (X+Y+Z)`, `y = Y / (X+Y+Z)`, `Y` unchanged.
pub fn xyz_to_xyy([x, y, z]: [f32; 3]) -> [f32; 3] {
    let d = x + y + z;
    let d = if d == 0.0 { 0.0 } else { 1.0 / d };
    [x * d, y * d, y]
}

/// xyY to XYZ.
pub fn xyy_to_xyz([x, y, lum]: [f32; 3]) -> [f32; 3] {
    let d = if y == 0.0 { 0.0 } else { 1.0 / y };
    [lum * x * d, lum, lum * (1.0 - x - y) * d]
}

/// XYZ to u'v'Y (CIE 1976 UCS).
pub fn xyz_to_uvy([x, y, z]: [f32; 3]) -> [f32; 3] {
    let d = x + 15.0 * y + 3.0 * z;
    let d = if d == 0.0 { 0.0 } else { 1.0 / d };
    [4.0 * x * d, 9.0 * y * d, y]
}

/// u'v'Y to XYZ.
pub fn uvy_to_xyz([u, v, lum]: [f32; 3]) -> [f32; 3] {
    let d = if v == 0.0 { 0.0 } else { 1.0 / v };
    let x = 2.25 * lum * u * d;
    let z = 0.75 * lum * (4.0 - u - 20.0 / 3.0 * v) * d;
    [x, lum, z]
}
