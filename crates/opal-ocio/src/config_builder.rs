//! Fluent construction of a validated [`Config`].
//!
//! # Example
//!
//! ```
//! use opal_ocio::{ColorSpace, ConfigBuilder, Encoding, Look, Transform};
//!
//! let config = ConfigBuilder::new("studio")
//!     .description("two spaces and a grade")
//!     .add_colorspace(
//!         ColorSpace::builder("ACES2065-1")
//!             .encoding(Encoding::SceneLinear)
//!             .build(),
//!     )
//!     .add_colorspace(
//!         ColorSpace::builder("gamma22")
//!             .encoding(Encoding::Sdr)
//!             .to_reference(Transform::exponent([2.2, 2.2, 2.2, 1.0]))
//!             .build(),
//!     )
//!     .add_look(Look::new("grade").process_space("ACES2065-1"))
//!     .set_role("reference", "ACES2065-1")
//!     .set_role("scene_linear", "ACES2065-1")
//!     .build()?;
//!
//! assert_eq!(config.colorspace("scene_linear").map(|cs| cs.name()), Some("ACES2065-1"));
//! # Ok::<(), opal_ocio::OcioError>(())
//! ```

use crate::colorspace::ColorSpace;
use crate::config::Config;
use crate::error::{OcioError, OcioResult};
use crate::look::Look;
use crate::role::Roles;

/// Builder for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    name: String,
    description: String,
    colorspaces: Vec<ColorSpace>,
    looks: Vec<Look>,
    roles: Roles,
    reference: Option<String>,
}

impl ConfigBuilder {
    /// New builder with the given config name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            colorspaces: Vec::new(),
            looks: Vec::new(),
            roles: Roles::new(),
            reference: None,
        }
    }

    /// Sets the description.
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Adds a color space.
    pub fn add_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.colorspaces.push(colorspace);
        self
    }

    /// Adds several color spaces.
    pub fn add_colorspaces(mut self, colorspaces: impl IntoIterator<Item = ColorSpace>) -> Self {
        self.colorspaces.extend(colorspaces);
        self
    }

    /// Adds a look.
    pub fn add_look(mut self, look: Look) -> Self {
        self.looks.push(look);
        self
    }

    /// Adds several looks.
    pub fn add_looks(mut self, looks: impl IntoIterator<Item = Look>) -> Self {
        self.looks.extend(looks);
        self
    }

    /// Maps `role` to a color space.
    pub fn set_role(mut self, role: impl Into<String>, colorspace: impl Into<String>) -> Self {
        self.roles.define(role, colorspace);
        self
    }

    /// Names the reference space explicitly.
    pub fn reference_space(mut self, name: impl Into<String>) -> Self {
        self.reference = Some(name.into());
        self
    }

    /// Validates and builds the config.
    ///
    /// # Errors
    ///
    /// - [`OcioError::Validation`] for a duplicate space name, alias or look
    /// - [`OcioError::ColorSpace`] for a role or explicit reference naming a
    ///   space that does not exist
    pub fn build(self) -> OcioResult<Config> {
        let mut config = Config::new(self.name);
        config.set_description(self.description);
        for cs in self.colorspaces {
            config.add_colorspace(cs)?;
        }
        for look in self.looks {
            config.add_look(look)?;
        }

        // roles are checked against names and aliases, not other roles
        for (role, target) in self.roles.iter() {
            if !config.colorspaces().iter().any(|cs| cs.matches_name(target)) {
                return Err(OcioError::colorspace(
                    target,
                    format!("role '{role}' points at a missing color space"),
                ));
            }
        }
        for (role, target) in self.roles.iter() {
            config.set_role(role, target);
        }

        if let Some(reference) = self.reference {
            if !config.colorspaces().iter().any(|cs| cs.matches_name(&reference)) {
                return Err(OcioError::colorspace(
                    reference,
                    "explicit reference space does not exist",
                ));
            }
            config.set_reference_space(reference);
        }
        Ok(config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new("untitled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;

    fn linear() -> ColorSpace {
        ColorSpace::builder("Linear").build()
    }

    #[test]
    fn build_minimal_config() {
        let config = ConfigBuilder::new("Test")
            .add_colorspace(linear())
            .build()
            .unwrap();
        assert_eq!(config.name(), "Test");
        assert_eq!(config.colorspaces().len(), 1);
        assert_eq!(config.reference_space().map(ColorSpace::name), Some("Linear"));
    }

    #[test]
    fn explicit_reference_is_kept() {
        let config = ConfigBuilder::new("Test")
            .add_colorspace(linear())
            .add_colorspace(
                ColorSpace::builder("Log")
                    .from_reference(Transform::exponent([0.5, 0.5, 0.5, 1.0]))
                    .build(),
            )
            .add_colorspace(ColorSpace::builder("Hub").build())
            .reference_space("hub")
            .build()
            .unwrap();
        assert_eq!(config.reference_space().map(ColorSpace::name), Some("Hub"));
        assert!(config.processor("Log", "Hub").is_ok());
        assert!(config.processor("Linear", "Hub").is_err());
    }

    #[test]
    fn build_fails_with_duplicate_alias() {
        let err = ConfigBuilder::new("Test")
            .add_colorspace(linear())
            .add_colorspace(ColorSpace::builder("Other").alias("linear").build())
            .build()
            .unwrap_err();
        assert!(matches!(err, OcioError::Validation(_)), "got {err:?}");
        assert!(err.to_string().contains("linear"), "got {err}");
    }

    #[test]
    fn build_fails_with_duplicate_look() {
        let result = ConfigBuilder::new("Test")
            .add_colorspace(linear())
            .add_looks([Look::new("grade"), Look::new("Grade")])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn build_fails_with_invalid_role() {
        let err = ConfigBuilder::new("Test")
            .add_colorspace(linear())
            .set_role("reference", "NonExistent")
            .build()
            .unwrap_err();
        assert!(matches!(err, OcioError::ColorSpace { .. }), "got {err:?}");
        assert!(err.to_string().contains("NonExistent"), "got {err}");
    }

    #[test]
    fn build_fails_with_missing_reference() {
        let err = ConfigBuilder::new("Test")
            .add_colorspace(linear())
            .reference_space("aces")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("aces"), "got {err}");
    }
}
