//! Looks: named adjustments applied inside a process space.
//!
//! # Example
//!
//! ```
//! use opal_ocio::{Look, Transform, TransformDirection, parse_looks};
//!
//! let look = Look::new("warm")
//!     .process_space("log")
//!     .transform(Transform::exponent([0.9, 1.0, 1.1, 1.0]));
//! assert_eq!(look.process_space_name(), "log");
//!
//! let specs = parse_looks("+warm, -grade")?;
//! assert_eq!(specs[1].direction, TransformDirection::Inverse);
//! # Ok::<(), opal_ocio::OcioError>(())
//! ```

use crate::error::{OcioError, OcioResult};
use crate::transform::{Transform, TransformDirection};

/// A named look.
#[derive(Debug, Clone, PartialEq)]
pub struct Look {
    name: String,
    process_space: String,
    description: String,
    transform: Option<Transform>,
    inverse_transform: Option<Transform>,
}

impl Look {
    /// New look without transforms.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            process_space: String::new(),
            description: String::new(),
            transform: None,
            inverse_transform: None,
        }
    }

    /// Sets the process space.
    pub fn process_space(mut self, space: impl Into<String>) -> Self {
        self.process_space = space.into();
        self
    }

    /// Sets the description.
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Sets the forward transform.
    pub fn transform(mut self, t: Transform) -> Self {
        self.transform = Some(t);
        self
    }

    /// Sets an explicit inverse transform.
    pub fn inverse_transform(mut self, t: Transform) -> Self {
        self.inverse_transform = Some(t);
        self
    }

    /// Name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Space the look's transform expects its input in.
    #[inline]
    pub fn process_space_name(&self) -> &str {
        &self.process_space
    }

    /// Description.
    #[inline]
    pub fn description_text(&self) -> &str {
        &self.description
    }

    /// Forward transform.
    #[inline]
    pub fn forward_transform(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }

    /// Explicit inverse transform.
    #[inline]
    pub fn explicit_inverse(&self) -> Option<&Transform> {
        self.inverse_transform.as_ref()
    }

    /// Transform to run for `direction`, or `None` when the look is a no-op.
    ///
    /// Forward prefers the forward transform and falls back to the inverted
    /// explicit inverse; Inverse does the opposite.
    pub fn transform_for(&self, direction: TransformDirection) -> Option<Transform> {
        let (primary, fallback) = match direction {
            TransformDirection::Forward => (&self.transform, &self.inverse_transform),
            TransformDirection::Inverse => (&self.inverse_transform, &self.transform),
        };
        primary
            .clone()
            .or_else(|| fallback.clone().map(Transform::inverse))
    }
}

/// One entry of a look string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookSpec {
    /// Look name.
    pub name: String,
    /// `+` (or no prefix) is forward, `-` is inverse.
    pub direction: TransformDirection,
}

/// Splits a look string such as `"+grade, -film:show"`.
///
/// Separators are `,` and `:`; empty tokens are skipped. A prefix with no
/// name after it is an error.
pub fn parse_looks(looks: &str) -> OcioResult<Vec<LookSpec>> {
    let mut out = Vec::new();
    for token in looks.split([',', ':']) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let (name, direction) = if let Some(rest) = token.strip_prefix('-') {
            (rest.trim(), TransformDirection::Inverse)
        } else if let Some(rest) = token.strip_prefix('+') {
            (rest.trim(), TransformDirection::Forward)
        } else {
            (token, TransformDirection::Forward)
        };
        if name.is_empty() {
            return Err(OcioError::look_parsing(
                looks,
                format!("'{token}' has a direction but no look name"),
            ));
        }
        out.push(LookSpec {
            name: name.to_string(),
            direction,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mixed_separators() {
        let specs = parse_looks(" a, +b : -c ,, ").unwrap();
        let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(specs[0].direction, TransformDirection::Forward);
        assert_eq!(specs[1].direction, TransformDirection::Forward);
        assert_eq!(specs[2].direction, TransformDirection::Inverse);
    }

    #[test]
    fn empty_string_is_no_looks() {
        assert!(parse_looks("").unwrap().is_empty());
        assert!(parse_looks(" , : ").unwrap().is_empty());
    }

    #[test]
    fn bare_prefix_is_an_error() {
        let err = parse_looks("a, -").unwrap_err();
        assert!(matches!(err, OcioError::LookParsing { .. }), "got {err:?}");
        assert!(parse_looks("+").is_err());
    }

    #[test]
    fn direction_selects_transform() {
        let fwd = Transform::exponent([2.0, 2.0, 2.0, 1.0]);
        let look = Look::new("g").transform(fwd.clone());

        assert_eq!(look.transform_for(TransformDirection::Forward), Some(fwd.clone()));
        assert_eq!(
            look.transform_for(TransformDirection::Inverse),
            Some(fwd.inverse())
        );

        let inv = Transform::exponent([0.5, 0.5, 0.5, 1.0]);
        let look = look.inverse_transform(inv.clone());
        assert_eq!(look.transform_for(TransformDirection::Inverse), Some(inv));

        assert_eq!(Look::new("empty").transform_for(TransformDirection::Forward), None);
    }
}
