//! The color space graph.
//!
//! A [`Config`] holds color spaces, looks and roles, and turns a
//! `(source, destination, looks)` request into an ordered transform list.
//! Every space is defined relative to one hub, the reference space, so a
//! conversion A→B is always `to_reference(A)` followed by `from_reference(B)`.
//!
//! # Example
//!
//! ```
//! use opal_ocio::{ColorSpace, Config, Transform};
//!
//! let mut config = Config::new("demo");
//! config.add_colorspace(ColorSpace::builder("linear").build())?;
//! config.add_colorspace(
//!     ColorSpace::builder("gamma22")
//!         .to_reference(Transform::exponent([2.2, 2.2, 2.2, 1.0]))
//!         .build(),
//! )?;
//!
//! let proc = config.processor("gamma22", "linear")?;
//! let out = proc.default_cpu_processor().apply_rgb([0.5, 0.5, 0.5]);
//! assert!((out[0] - 0.5f32.powf(2.2)).abs() < 1e-5);
//! # Ok::<(), opal_ocio::OcioError>(())
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::colorspace::ColorSpace;
use crate::error::{OcioError, OcioResult};
use crate::look::{Look, LookSpec, parse_looks};
use crate::processor::{OptimizationLevel, Processor};
use crate::role::Roles;
use crate::transform::{Transform, TransformDirection};

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// Color spaces, looks and roles.
#[derive(Debug, Clone, Default)]
pub struct Config {
    name: String,
    description: String,
    colorspaces: Vec<ColorSpace>,
    looks: Vec<Look>,
    roles: Roles,
    /// Explicit hub, consulted after the `reference` role.
    reference: Option<String>,
    revision: u64,
}

impl Config {
    /// Empty config.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            revision: next_revision(),
            ..Default::default()
        }
    }

    /// Process-wide stamp of the config's current contents.
    ///
    /// Every edit assigns a fresh value, so two configs share a revision only
    /// when one is an unedited clone of the other.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Config name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Sets the description.
    pub fn set_description(&mut self, desc: impl Into<String>) {
        self.description = desc.into();
    }

    /// Registers a color space.
    ///
    /// Fails with [`OcioError::Validation`] when its name or one of its
    /// aliases is already taken by another space.
    pub fn add_colorspace(&mut self, cs: ColorSpace) -> OcioResult<()> {
        let taken = std::iter::once(cs.name())
            .chain(cs.aliases().iter().map(String::as_str))
            .find(|n| self.find_space(n).is_some());
        if let Some(name) = taken {
            return Err(OcioError::Validation(format!(
                "color space '{}': name '{name}' is already in use",
                cs.name()
            )));
        }
        self.colorspaces.push(cs);
        self.revision = next_revision();
        Ok(())
    }

    /// Registers a look. Names must be unique (case-insensitive).
    pub fn add_look(&mut self, look: Look) -> OcioResult<()> {
        if self.look(look.name()).is_some() {
            return Err(OcioError::Validation(format!(
                "look '{}' is already defined",
                look.name()
            )));
        }
        self.looks.push(look);
        self.revision = next_revision();
        Ok(())
    }

    /// Maps `role` to a color space name. Not checked until used.
    pub fn set_role(&mut self, role: impl Into<String>, colorspace: impl Into<String>) {
        self.roles.define(role, colorspace);
        self.revision = next_revision();
    }

    /// Names the hub explicitly. The `reference` role still wins.
    pub fn set_reference_space(&mut self, name: impl Into<String>) {
        self.reference = Some(name.into());
        self.revision = next_revision();
    }

    /// All color spaces in registration order.
    #[inline]
    pub fn colorspaces(&self) -> &[ColorSpace] {
        &self.colorspaces
    }

    /// Color space names in registration order.
    pub fn colorspace_names(&self) -> impl Iterator<Item = &str> {
        self.colorspaces.iter().map(ColorSpace::name)
    }

    /// Looks up a space by role, then name, then alias. Case-insensitive.
    pub fn colorspace(&self, name: &str) -> Option<&ColorSpace> {
        if let Some(cs) = self.roles.get(name).and_then(|target| self.find_space(target)) {
            return Some(cs);
        }
        self.find_space(name)
    }

    fn find_space(&self, name: &str) -> Option<&ColorSpace> {
        self.colorspaces
            .iter()
            .find(|cs| cs.name().eq_ignore_ascii_case(name))
            .or_else(|| {
                self.colorspaces
                    .iter()
                    .find(|cs| cs.aliases().iter().any(|a| a.eq_ignore_ascii_case(name)))
            })
    }

    fn require(&self, name: &str) -> OcioResult<&ColorSpace> {
        self.colorspace(name)
            .ok_or_else(|| OcioError::colorspace(name, "not found in config"))
    }

    /// All looks in registration order.
    #[inline]
    pub fn looks(&self) -> &[Look] {
        &self.looks
    }

    /// Look by name, case-insensitive.
    pub fn look(&self, name: &str) -> Option<&Look> {
        self.looks
            .iter()
            .find(|l| l.name().eq_ignore_ascii_case(name))
    }

    /// Role mapping.
    #[inline]
    pub fn roles(&self) -> &Roles {
        &self.roles
    }

    /// The hub: the `reference` role, else the explicit reference, else the
    /// first non-data space that declares no transform.
    pub fn reference_space(&self) -> Option<&ColorSpace> {
        if let Some(cs) = self.roles.reference().and_then(|n| self.find_space(n)) {
            return Some(cs);
        }
        if let Some(cs) = self.reference.as_deref().and_then(|n| self.find_space(n)) {
            return Some(cs);
        }
        self.colorspaces
            .iter()
            .find(|cs| !cs.is_data() && cs.has_no_transforms())
    }

    fn is_reference(&self, cs: &ColorSpace) -> bool {
        self.reference_space()
            .is_some_and(|r| r.name().eq_ignore_ascii_case(cs.name()))
    }

    fn no_path(&self, cs: &ColorSpace) -> OcioError {
        OcioError::colorspace(
            cs.name(),
            "declares no transform to or from the reference and is not the reference space",
        )
    }

    /// Transform taking `cs` to the reference; `None` for the hub itself.
    fn to_reference(&self, cs: &ColorSpace) -> OcioResult<Option<Transform>> {
        if let Some(t) = cs.to_reference() {
            Ok(Some(t.clone()))
        } else if let Some(t) = cs.from_reference() {
            Ok(Some(t.clone().inverse()))
        } else if self.is_reference(cs) {
            Ok(None)
        } else {
            Err(self.no_path(cs))
        }
    }

    /// Transform taking the reference to `cs`; `None` for the hub itself.
    fn from_reference(&self, cs: &ColorSpace) -> OcioResult<Option<Transform>> {
        if let Some(t) = cs.from_reference() {
            Ok(Some(t.clone()))
        } else if let Some(t) = cs.to_reference() {
            Ok(Some(t.clone().inverse()))
        } else if self.is_reference(cs) {
            Ok(None)
        } else {
            Err(self.no_path(cs))
        }
    }

    fn push_path(&self, a: &ColorSpace, b: &ColorSpace, out: &mut Vec<Transform>) -> OcioResult<()> {
        if a.name() == b.name() {
            return Ok(());
        }
        out.extend(self.to_reference(a)?);
        out.extend(self.from_reference(b)?);
        Ok(())
    }

    /// Ordered transform list for `src → (looks) → dst`.
    ///
    /// Each look is reached through its process space. Data endpoints give
    /// an empty list and skip the looks.
    pub(crate) fn resolve(
        &self,
        src: &str,
        dst: &str,
        looks: &[LookSpec],
    ) -> OcioResult<Vec<Transform>> {
        let src_cs = self.require(src)?;
        let dst_cs = self.require(dst)?;
        if src_cs.is_data() || dst_cs.is_data() {
            debug!(src, dst, "data endpoint, empty conversion");
            return Ok(Vec::new());
        }

        let mut nodes = Vec::new();
        let mut current = src_cs;
        for spec in looks {
            let look = self
                .look(&spec.name)
                .ok_or_else(|| OcioError::look_parsing(spec.name.as_str(), "look not found in config"))?;
            if look.process_space_name().is_empty() {
                return Err(OcioError::look_parsing(
                    spec.name.as_str(),
                    "look has no process space",
                ));
            }
            let process = self.require(look.process_space_name())?;
            self.push_path(current, process, &mut nodes)?;
            nodes.extend(look.transform_for(spec.direction));
            current = process;
        }
        self.push_path(current, dst_cs, &mut nodes)?;

        debug!(
            src = src_cs.name(),
            dst = dst_cs.name(),
            looks = looks.len(),
            nodes = nodes.len(),
            "resolved conversion"
        );
        Ok(nodes)
    }

    /// Processor for `src → dst`.
    pub fn processor(&self, src: &str, dst: &str) -> OcioResult<Processor> {
        self.processor_with_looks(src, dst, "")
    }

    /// Processor for `src → looks → dst`. `looks` uses the
    /// [`parse_looks`] syntax, e.g. `"+grade, -film"`.
    pub fn processor_with_looks(&self, src: &str, dst: &str, looks: &str) -> OcioResult<Processor> {
        self.processor_with_direction(src, dst, looks, TransformDirection::Forward)
    }

    /// Like [`Self::processor_with_looks`]; `Inverse` runs the resolved
    /// chain backwards with every node inverted.
    pub fn processor_with_direction(
        &self,
        src: &str,
        dst: &str,
        looks: &str,
        direction: TransformDirection,
    ) -> OcioResult<Processor> {
        self.processor_with_level(src, dst, looks, direction, OptimizationLevel::default())
    }

    /// Full form of the processor constructors.
    pub fn processor_with_level(
        &self,
        src: &str,
        dst: &str,
        looks: &str,
        direction: TransformDirection,
        level: OptimizationLevel,
    ) -> OcioResult<Processor> {
        let specs = parse_looks(looks)?;
        let nodes = self.resolve(src, dst, &specs)?;
        Processor::build(Some(self), &Transform::group(nodes), direction, level)
    }

    /// Compiles a transform that may contain `ColorSpace` references to
    /// spaces of this config.
    pub fn processor_from_transform(
        &self,
        transform: &Transform,
        direction: TransformDirection,
    ) -> OcioResult<Processor> {
        self.processor_from_transform_with_level(transform, direction, OptimizationLevel::default())
    }

    /// [`Self::processor_from_transform`] with an explicit optimization level.
    pub fn processor_from_transform_with_level(
        &self,
        transform: &Transform,
        direction: TransformDirection,
        level: OptimizationLevel,
    ) -> OcioResult<Processor> {
        Processor::build(Some(self), transform, direction, level)
    }
}
