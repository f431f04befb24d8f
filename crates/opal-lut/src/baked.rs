//! Baked LUT containers.
//!
//! These hold already-evaluated samples; the serializers only format them.

use crate::{LutError, LutResult};

/// One channel of a shaper (pre-LUT): paired input and output rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaperChannel {
    /// Input domain samples, increasing.
    pub input: Vec<f32>,
    /// Output values, usually a `[0, 1]` ramp.
    pub output: Vec<f32>,
}

impl ShaperChannel {
    /// Creates a channel, checking that both rows have the same length.
    pub fn new(input: Vec<f32>, output: Vec<f32>) -> LutResult<Self> {
        if input.len() != output.len() || input.len() < 2 {
            return Err(LutError::InvalidSize(format!(
                "shaper rows must match and hold at least 2 samples (input {}, output {})",
                input.len(),
                output.len()
            )));
        }
        Ok(Self { input, output })
    }

    /// Pass-through channel over `[0, 1]`.
    pub fn identity() -> Self {
        Self {
            input: vec![0.0, 1.0],
            output: vec![0.0, 1.0],
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// True when the channel holds no samples.
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }
}

/// Three-channel shaper applied before the main LUT.
#[derive(Debug, Clone, PartialEq)]
pub struct Shaper {
    /// Red channel.
    pub r: ShaperChannel,
    /// Green channel.
    pub g: ShaperChannel,
    /// Blue channel.
    pub b: ShaperChannel,
}

impl Shaper {
    /// Shaper using the same rows on every channel.
    pub fn uniform(channel: ShaperChannel) -> Self {
        Self {
            r: channel.clone(),
            g: channel.clone(),
            b: channel,
        }
    }

    /// Channels in R, G, B order.
    pub fn channels(&self) -> [&ShaperChannel; 3] {
        [&self.r, &self.g, &self.b]
    }
}

/// Per-channel 1D table sampled over the domain `[0, 1]` (or the shaper's).
#[derive(Debug, Clone, PartialEq)]
pub struct Lut1D {
    /// RGB entries in input order.
    pub entries: Vec<[f32; 3]>,
}

impl Lut1D {
    /// Creates a table with at least 2 entries.
    pub fn new(entries: Vec<[f32; 3]>) -> LutResult<Self> {
        if entries.len() < 2 {
            return Err(LutError::InvalidSize(format!(
                "1D LUT needs at least 2 entries, got {}",
                entries.len()
            )));
        }
        Ok(Self { entries })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cube of RGB samples stored red-fastest, then green, then blue.
#[derive(Debug, Clone, PartialEq)]
pub struct Lut3D {
    /// Edge length.
    pub size: usize,
    /// `size³` RGB samples.
    pub data: Vec<[f32; 3]>,
}

impl Lut3D {
    /// Creates a cube, checking that `data` holds `size³` samples.
    pub fn new(size: usize, data: Vec<[f32; 3]>) -> LutResult<Self> {
        if size < 2 {
            return Err(LutError::InvalidSize(format!("cube size must be >= 2, got {size}")));
        }
        if data.len() != size * size * size {
            return Err(LutError::InvalidSize(format!(
                "cube of size {size} needs {} samples, got {}",
                size * size * size,
                data.len()
            )));
        }
        Ok(Self { size, data })
    }

    /// Identity lattice: each sample is its own normalized grid coordinate.
    pub fn identity(size: usize) -> Self {
        let scale = if size > 1 { 1.0 / (size - 1) as f32 } else { 0.0 };
        let mut data = Vec::with_capacity(size * size * size);
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    data.push([r as f32 * scale, g as f32 * scale, b as f32 * scale]);
                }
            }
        }
        Self { size, data }
    }

    /// Flat index of grid point `(r, g, b)`.
    #[inline]
    pub fn index(&self, r: usize, g: usize, b: usize) -> usize {
        r + self.size * (g + self.size * b)
    }

    /// Sample at grid point `(r, g, b)`.
    #[inline]
    pub fn get(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        self.data[self.index(r, g, b)]
    }
}

/// The table part of a baked LUT.
#[derive(Debug, Clone, PartialEq)]
pub enum LutData {
    /// Per-channel curves.
    OneD(Lut1D),
    /// Full RGB cube.
    ThreeD(Lut3D),
}

impl LutData {
    /// `"1D"` or `"3D"`.
    pub fn kind(&self) -> &'static str {
        match self {
            LutData::OneD(_) => "1D",
            LutData::ThreeD(_) => "3D",
        }
    }
}

/// A fully sampled LUT ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct BakedLut {
    /// Optional shaper written before the table.
    pub shaper: Option<Shaper>,
    /// Main table.
    pub data: LutData,
    /// Free-text metadata; formats without a metadata block ignore it.
    pub metadata: Option<String>,
}

impl BakedLut {
    /// Metadata split into trimmed lines, empty when unset or blank.
    pub fn metadata_lines(&self) -> Vec<&str> {
        match self.metadata.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.lines().collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_cube_is_red_fastest() {
        let lut = Lut3D::identity(2);
        assert_eq!(lut.data.len(), 8);
        assert_eq!(lut.data[1], [1.0, 0.0, 0.0]);
        assert_eq!(lut.data[2], [0.0, 1.0, 0.0]);
        assert_eq!(lut.data[4], [0.0, 0.0, 1.0]);
        assert_eq!(lut.get(1, 1, 0), [1.0, 1.0, 0.0]);
    }

    #[test]
    fn cube_size_checked() {
        assert!(Lut3D::new(1, vec![[0.0; 3]]).is_err());
        let err = Lut3D::new(2, vec![[0.0; 3]; 7]).unwrap_err();
        assert!(err.to_string().contains("needs 8 samples"), "got: {err}");
    }

    #[test]
    fn shaper_rows_must_match() {
        assert!(ShaperChannel::new(vec![0.0, 1.0], vec![0.0]).is_err());
        assert!(ShaperChannel::new(vec![0.0, 0.5, 1.0], vec![0.0, 0.5, 1.0]).is_ok());
    }

    #[test]
    fn metadata_lines_trimmed() {
        let lut = BakedLut {
            shaper: None,
            data: LutData::OneD(Lut1D::new(vec![[0.0; 3], [1.0; 3]]).unwrap()),
            metadata: Some("\n first\nsecond \n".into()),
        };
        assert_eq!(lut.metadata_lines(), vec!["first", "second"]);

        let blank = BakedLut { metadata: Some("   ".into()), ..lut };
        assert!(blank.metadata_lines().is_empty());
    }
}
