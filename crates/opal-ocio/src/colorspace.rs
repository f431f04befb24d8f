//! Named color spaces.
//!
//! A color space is a node of the config's star graph. It knows how to reach
//! the reference space (`to_reference`), how to come back from it
//! (`from_reference`), or neither when it *is* the reference.
//!
//! # Example
//!
//! ```
//! use opal_ocio::{ColorSpace, Encoding, Transform};
//!
//! let cs = ColorSpace::builder("gamma22")
//!     .alias("g22")
//!     .encoding(Encoding::Sdr)
//!     .to_reference(Transform::exponent([2.2, 2.2, 2.2, 1.0]))
//!     .build();
//!
//! assert!(cs.matches_name("G22"));
//! assert!(cs.to_reference().is_some());
//! ```

use opal_ops::allocation::AllocationOp;

use crate::transform::Transform;

/// Pixel encoding of a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// Scene-referred linear.
    SceneLinear,
    /// Display-referred linear.
    DisplayLinear,
    /// Logarithmic.
    Log,
    /// SDR video (OETF-encoded).
    Sdr,
    /// HDR video (PQ, HLG).
    Hdr,
    /// Non-color data.
    Data,
    /// Unspecified.
    #[default]
    Unknown,
}

impl Encoding {
    /// Parses a config-style encoding name. Unrecognized names map to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "scene-linear" | "scene_linear" => Self::SceneLinear,
            "display-linear" | "display_linear" => Self::DisplayLinear,
            "log" => Self::Log,
            "sdr-video" | "sdr_video" => Self::Sdr,
            "hdr-video" | "hdr_video" => Self::Hdr,
            "data" => Self::Data,
            _ => Self::Unknown,
        }
    }

    /// Config-style name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SceneLinear => "scene-linear",
            Self::DisplayLinear => "display-linear",
            Self::Log => "log",
            Self::Sdr => "sdr-video",
            Self::Hdr => "hdr-video",
            Self::Data => "data",
            Self::Unknown => "",
        }
    }
}

/// Storage bit depth hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BitDepth {
    /// 8-bit unsigned.
    Uint8,
    /// 10-bit unsigned.
    Uint10,
    /// 12-bit unsigned.
    Uint12,
    /// 16-bit unsigned.
    Uint16,
    /// Half float.
    F16,
    /// Float.
    #[default]
    F32,
}

/// A named color space.
///
/// Immutable once built; use [`ColorSpaceBuilder`] to create one.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorSpace {
    name: String,
    aliases: Vec<String>,
    description: String,
    family: String,
    encoding: Encoding,
    bit_depth: BitDepth,
    is_data: bool,
    to_reference: Option<Transform>,
    from_reference: Option<Transform>,
    allocation: AllocationOp,
}

impl ColorSpace {
    /// Starts a builder.
    #[inline]
    pub fn builder(name: impl Into<String>) -> ColorSpaceBuilder {
        ColorSpaceBuilder::new(name)
    }

    /// Name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Aliases.
    #[inline]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Description.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Family, e.g. `"Input/ARRI"`.
    #[inline]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Encoding.
    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Bit depth hint.
    #[inline]
    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    /// Non-color data: conversions to or from this space are skipped.
    #[inline]
    pub fn is_data(&self) -> bool {
        self.is_data
    }

    /// Transform toward the reference space.
    #[inline]
    pub fn to_reference(&self) -> Option<&Transform> {
        self.to_reference.as_ref()
    }

    /// Transform away from the reference space.
    #[inline]
    pub fn from_reference(&self) -> Option<&Transform> {
        self.from_reference.as_ref()
    }

    /// True when the space declares neither direction.
    #[inline]
    pub fn has_no_transforms(&self) -> bool {
        self.to_reference.is_none() && self.from_reference.is_none()
    }

    /// Sample spacing used by the baker's shaper.
    #[inline]
    pub fn allocation(&self) -> &AllocationOp {
        &self.allocation
    }

    /// Case-insensitive match against the name and every alias.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

/// Fluent builder for [`ColorSpace`].
#[derive(Debug)]
pub struct ColorSpaceBuilder {
    inner: ColorSpace,
}

impl ColorSpaceBuilder {
    /// New builder with uniform `[0, 1]` allocation and no transforms.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: ColorSpace {
                name: name.into(),
                aliases: Vec::new(),
                description: String::new(),
                family: String::new(),
                encoding: Encoding::default(),
                bit_depth: BitDepth::default(),
                is_data: false,
                to_reference: None,
                from_reference: None,
                allocation: AllocationOp::uniform(),
            },
        }
    }

    /// Adds an alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.inner.aliases.push(alias.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.inner.description = desc.into();
        self
    }

    /// Sets the family.
    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.inner.family = family.into();
        self
    }

    /// Sets the encoding. `Data` also marks the space as data.
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.inner.encoding = encoding;
        if encoding == Encoding::Data {
            self.inner.is_data = true;
        }
        self
    }

    /// Sets the bit depth.
    pub fn bit_depth(mut self, depth: BitDepth) -> Self {
        self.inner.bit_depth = depth;
        self
    }

    /// Marks the space as non-color data.
    pub fn is_data(mut self, is_data: bool) -> Self {
        self.inner.is_data = is_data;
        self
    }

    /// Sets the transform toward the reference.
    pub fn to_reference(mut self, transform: Transform) -> Self {
        self.inner.to_reference = Some(transform);
        self
    }

    /// Sets the transform away from the reference.
    pub fn from_reference(mut self, transform: Transform) -> Self {
        self.inner.from_reference = Some(transform);
        self
    }

    /// Sets the allocation.
    pub fn allocation(mut self, allocation: AllocationOp) -> Self {
        self.inner.allocation = allocation;
        self
    }

    /// Finishes the space.
    pub fn build(self) -> ColorSpace {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opal_ops::allocation::Allocation;

    #[test]
    fn builder_defaults() {
        let cs = ColorSpace::builder("lnh").build();
        assert_eq!(cs.name(), "lnh");
        assert!(cs.has_no_transforms());
        assert!(!cs.is_data());
        assert_eq!(cs.allocation().allocation, Allocation::Uniform);
        assert_eq!(cs.bit_depth(), BitDepth::F32);
    }

    #[test]
    fn name_matching_is_case_insensitive() {
        let cs = ColorSpace::builder("ACEScg").alias("aces_cg").build();
        assert!(cs.matches_name("acescg"));
        assert!(cs.matches_name("ACES_CG"));
        assert!(!cs.matches_name("aces"));
    }

    #[test]
    fn data_encoding_marks_data() {
        let cs = ColorSpace::builder("raw").encoding(Encoding::Data).build();
        assert!(cs.is_data());
        assert_eq!(Encoding::parse("Scene-Linear"), Encoding::SceneLinear);
        assert_eq!(Encoding::parse("whatever"), Encoding::Unknown);
    }
}
