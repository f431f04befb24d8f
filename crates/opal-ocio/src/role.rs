//! Roles: purpose names that alias color spaces.
//!
//! Role names are matched case-insensitively and take precedence over color
//! space names in [`crate::Config::colorspace`].

use std::collections::HashMap;

/// Common role names.
pub mod names {
    /// Hub space of the config.
    pub const REFERENCE: &str = "reference";
    /// Default input space.
    pub const DEFAULT: &str = "default";
    /// Non-color data.
    pub const DATA: &str = "data";
    /// Scene-linear working space.
    pub const SCENE_LINEAR: &str = "scene_linear";
    /// Log compositing space.
    pub const COMPOSITING_LOG: &str = "compositing_log";
    /// Grading space.
    pub const COLOR_TIMING: &str = "color_timing";
}

/// Role to color space mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roles {
    // keys are lower-cased
    mapping: HashMap<String, String>,
}

impl Roles {
    /// Empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `role` to `colorspace`, replacing any previous mapping.
    pub fn define(&mut self, role: impl Into<String>, colorspace: impl Into<String>) {
        self.mapping
            .insert(role.into().to_ascii_lowercase(), colorspace.into());
    }

    /// Color space name for `role`.
    pub fn get(&self, role: &str) -> Option<&str> {
        self.mapping
            .get(&role.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// All `(role, colorspace)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mapping.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of roles.
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    /// True when no role is defined.
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Space named by the `reference` role.
    pub fn reference(&self) -> Option<&str> {
        self.get(names::REFERENCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let mut roles = Roles::new();
        roles.define("Scene_Linear", "ACEScg");
        assert_eq!(roles.get("scene_linear"), Some("ACEScg"));
        assert_eq!(roles.get("SCENE_LINEAR"), Some("ACEScg"));
        assert_eq!(roles.reference(), None);
    }

    #[test]
    fn redefine_replaces() {
        let mut roles = Roles::new();
        roles.define(names::REFERENCE, "a");
        roles.define("REFERENCE", "b");
        assert_eq!(roles.len(), 1);
        assert_eq!(roles.reference(), Some("b"));
    }
}
