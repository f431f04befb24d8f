//! LUT baking.
//!
//! The baker samples `input space → (looks) → target space` of a config into
//! a 1D or 3D table and serializes it through the `opal-lut` format registry.
//! Formats that carry a shaper (cinespace) get one built from the allocation
//! of the shaper space, so log or HDR inputs are sampled evenly.
//!
//! # Example
//!
//! ```
//! use opal_ocio::{Baker, ColorSpace, Config, Transform};
//!
//! let mut config = Config::new("bake");
//! config.add_colorspace(ColorSpace::builder("linear").build())?;
//! config.add_colorspace(
//!     ColorSpace::builder("gamma")
//!         .to_reference(Transform::exponent([2.2, 2.2, 2.2, 1.0]))
//!         .build(),
//! )?;
//!
//! let mut baker = Baker::new();
//! baker.set_config(&config);
//! baker.set_format("resolve_cube");
//! baker.set_type("3D");
//! baker.set_input_space("linear");
//! baker.set_target_space("gamma");
//! baker.set_cube_size(5);
//!
//! let text = baker.bake()?;
//! assert!(text.contains("LUT_3D_SIZE 5"));
//! # Ok::<(), opal_ocio::OcioError>(())
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use opal_lut::{BakedLut, Lut1D, Lut3D, LutData, LutFormat, LutKind, Shaper, ShaperChannel};
use opal_ops::allocation::AllocationOp;
use tracing::debug;

use crate::colorspace::ColorSpace;
use crate::config::Config;
use crate::cpu::EvalPath;
use crate::error::{OcioError, OcioResult};

/// Shaper samples used when none is requested.
pub const DEFAULT_SHAPER_SIZE: usize = 1024;

/// Number of registered output formats.
pub fn num_formats() -> usize {
    LutFormat::ALL.len()
}

/// Registry name of the format at `index`.
pub fn format_name_by_index(index: usize) -> OcioResult<&'static str> {
    format_by_index(index).map(LutFormat::name)
}

/// File extension of the format at `index`.
pub fn format_extension_by_index(index: usize) -> OcioResult<&'static str> {
    format_by_index(index).map(LutFormat::extension)
}

fn format_by_index(index: usize) -> OcioResult<LutFormat> {
    LutFormat::by_index(index).ok_or_else(|| {
        OcioError::invalid_parameter(
            "index",
            format!("format index {index} out of range (0..{})", num_formats()),
        )
    })
}

/// LUT baker.
///
/// Configured through setters, then [`Baker::bake`] (or one of its writer
/// forms) samples the config. Baking never modifies the baker or the config,
/// so one baker can be reused after changing a setting.
#[derive(Debug, Clone)]
pub struct Baker<'a> {
    config: Option<&'a Config>,
    format: String,
    lut_type: String,
    input_space: String,
    shaper_space: String,
    target_space: String,
    looks: String,
    shaper_size: usize,
    cube_size: Option<usize>,
    metadata: String,
}

impl Default for Baker<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a bake needs, checked and looked up.
struct Plan<'c> {
    config: &'c Config,
    format: LutFormat,
    kind: LutKind,
    input: &'c ColorSpace,
    shaper: &'c ColorSpace,
    shaper_size: usize,
    cube_size: usize,
}

impl<'a> Baker<'a> {
    /// Baker with default sizes and nothing else set.
    pub fn new() -> Self {
        Self {
            config: None,
            format: String::new(),
            lut_type: String::new(),
            input_space: String::new(),
            shaper_space: String::new(),
            target_space: String::new(),
            looks: String::new(),
            shaper_size: DEFAULT_SHAPER_SIZE,
            cube_size: None,
            metadata: String::new(),
        }
    }

    /// Config to sample.
    pub fn config(&self) -> Option<&'a Config> {
        self.config
    }

    /// Sets the config to sample.
    pub fn set_config(&mut self, config: &'a Config) {
        self.config = Some(config);
    }

    /// Format registry name.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Sets the format by registry name, e.g. `"cinespace"`.
    pub fn set_format(&mut self, format: impl Into<String>) {
        self.format = format.into();
    }

    /// `"1D"` or `"3D"`.
    pub fn lut_type(&self) -> &str {
        &self.lut_type
    }

    /// Sets the table type, `"1D"` or `"3D"`.
    pub fn set_type(&mut self, lut_type: impl Into<String>) {
        self.lut_type = lut_type.into();
    }

    /// Input space.
    pub fn input_space(&self) -> &str {
        &self.input_space
    }

    /// Sets the input space.
    pub fn set_input_space(&mut self, name: impl Into<String>) {
        self.input_space = name.into();
    }

    /// Shaper space; empty means the input space.
    pub fn shaper_space(&self) -> &str {
        &self.shaper_space
    }

    /// Sets the space whose allocation drives the shaper.
    pub fn set_shaper_space(&mut self, name: impl Into<String>) {
        self.shaper_space = name.into();
    }

    /// Target space.
    pub fn target_space(&self) -> &str {
        &self.target_space
    }

    /// Sets the target space.
    pub fn set_target_space(&mut self, name: impl Into<String>) {
        self.target_space = name.into();
    }

    /// Look string.
    pub fn looks(&self) -> &str {
        &self.looks
    }

    /// Sets looks applied between input and target, e.g. `"+grade"`.
    pub fn set_looks(&mut self, looks: impl Into<String>) {
        self.looks = looks.into();
    }

    /// Shaper samples (also the entry count of a 1D table).
    pub fn shaper_size(&self) -> usize {
        self.shaper_size
    }

    /// Sets the shaper sample count.
    pub fn set_shaper_size(&mut self, size: usize) {
        self.shaper_size = size;
    }

    /// Requested cube edge; `None` uses the format default.
    pub fn cube_size(&self) -> Option<usize> {
        self.cube_size
    }

    /// Sets the cube edge length.
    pub fn set_cube_size(&mut self, size: usize) {
        self.cube_size = Some(size);
    }

    /// Free-text metadata.
    pub fn metadata(&self) -> &str {
        &self.metadata
    }

    /// Sets metadata written by formats that carry it.
    pub fn set_metadata(&mut self, metadata: impl Into<String>) {
        self.metadata = metadata.into();
    }

    fn plan(&self) -> OcioResult<Plan<'a>> {
        let config = self
            .config
            .ok_or_else(|| OcioError::invalid_parameter("config", "no config set"))?;

        let format = LutFormat::from_name(&self.format).ok_or_else(|| OcioError::UnknownFormat {
            format: self.format.clone(),
        })?;

        if self.lut_type.is_empty() {
            return Err(OcioError::invalid_parameter("type", "no LUT type set"));
        }
        let kind = LutKind::from_name(&self.lut_type).ok_or_else(|| {
            OcioError::invalid_parameter("type", format!("unknown LUT type '{}'", self.lut_type))
        })?;
        if !format.supports(kind) {
            return Err(OcioError::invalid_parameter(
                "type",
                format!("format '{}' cannot hold {} LUTs", format.name(), kind.name()),
            ));
        }

        if self.shaper_size <= 1 {
            return Err(OcioError::invalid_parameter(
                "shaper_size",
                format!("must be greater than 1, got {}", self.shaper_size),
            ));
        }
        let cube_size = self.cube_size.unwrap_or_else(|| format.default_cube_size());
        if cube_size <= 1 {
            return Err(OcioError::invalid_parameter(
                "cube_size",
                format!("must be greater than 1, got {cube_size}"),
            ));
        }

        let input = space(config, &self.input_space, "input")?;
        space(config, &self.target_space, "target")?;
        let shaper = if self.shaper_space.is_empty() {
            input
        } else {
            space(config, &self.shaper_space, "shaper")?
        };

        Ok(Plan {
            config,
            format,
            kind,
            input,
            shaper,
            shaper_size: self.shaper_size,
            cube_size,
        })
    }

    /// Samples the configured conversion without serializing it.
    pub fn bake_lut(&self) -> OcioResult<BakedLut> {
        let plan = self.plan()?;
        let use_shaper = plan.format.uses_shaper();
        let alloc = *plan.shaper.allocation();

        debug!(
            format = plan.format.name(),
            kind = plan.kind.name(),
            input = plan.input.name(),
            shaper = plan.shaper.name(),
            target = self.target_space.as_str(),
            looks = self.looks.as_str(),
            shaper_size = plan.shaper_size,
            cube_size = plan.cube_size,
            use_shaper,
            "baking LUT"
        );

        let shaper = if use_shaper {
            Some(self.bake_shaper(&plan, &alloc)?)
        } else {
            None
        };

        // with a shaper the table is indexed by shaper-space values
        let source = if use_shaper { plan.shaper } else { plan.input };
        let processor = plan
            .config
            .processor_with_looks(source.name(), &self.target_space, &self.looks)?;
        let cpu = processor.cpu_processor(EvalPath::Scalar);
        let domain = |t: f64| -> f32 {
            if use_shaper {
                alloc.decode(t) as f32
            } else {
                t as f32
            }
        };

        let data = match plan.kind {
            LutKind::OneD => {
                let n = plan.shaper_size;
                let mut entries: Vec<[f32; 3]> = (0..n)
                    .map(|i| [domain(i as f64 / (n - 1) as f64); 3])
                    .collect();
                cpu.apply_rgb_buffer(&mut entries);
                LutData::OneD(Lut1D::new(entries)?)
            }
            LutKind::ThreeD => {
                let n = plan.cube_size;
                let axis: Vec<f32> = (0..n).map(|i| domain(i as f64 / (n - 1) as f64)).collect();
                let mut samples = Vec::with_capacity(n * n * n);
                for &b in &axis {
                    for &g in &axis {
                        for &r in &axis {
                            samples.push([r, g, b]);
                        }
                    }
                }
                cpu.apply_rgb_buffer(&mut samples);
                LutData::ThreeD(Lut3D::new(n, samples)?)
            }
        };

        Ok(BakedLut {
            shaper,
            data,
            metadata: (!self.metadata.is_empty()).then(|| self.metadata.clone()),
        })
    }

    /// Input row: shaper-space values mapped into the input space. Output
    /// row: the `[0, 1]` ramp.
    fn bake_shaper(&self, plan: &Plan<'_>, alloc: &AllocationOp) -> OcioResult<Shaper> {
        let n = plan.shaper_size;
        let ramp: Vec<f32> = (0..n).map(|i| (i as f64 / (n - 1) as f64) as f32).collect();
        let mut input: Vec<[f32; 3]> = (0..n)
            .map(|i| [alloc.decode(i as f64 / (n - 1) as f64) as f32; 3])
            .collect();

        if plan.shaper.name() != plan.input.name() {
            plan.config
                .processor(plan.shaper.name(), plan.input.name())?
                .cpu_processor(EvalPath::Scalar)
                .apply_rgb_buffer(&mut input);
        }

        let channel = |c: usize| ShaperChannel::new(input.iter().map(|v| v[c]).collect(), ramp.clone());
        Ok(Shaper {
            r: channel(0)?,
            g: channel(1)?,
            b: channel(2)?,
        })
    }

    /// Bakes and serializes into `writer`.
    pub fn bake_to<W: Write>(&self, writer: &mut W) -> OcioResult<()> {
        let lut = self.bake_lut()?;
        let format = LutFormat::from_name(&self.format).ok_or_else(|| OcioError::UnknownFormat {
            format: self.format.clone(),
        })?;
        format.write(writer, &lut)?;
        Ok(())
    }

    /// Bakes and returns the serialized text.
    pub fn bake(&self) -> OcioResult<String> {
        let mut buf = Vec::new();
        self.bake_to(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Bakes into a file, replacing it if it exists.
    pub fn bake_to_path(&self, path: impl AsRef<Path>) -> OcioResult<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.bake_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

fn space<'c>(config: &'c Config, name: &str, role: &str) -> OcioResult<&'c ColorSpace> {
    if name.is_empty() {
        return Err(OcioError::colorspace(name, format!("no {role} space set")));
    }
    config
        .colorspace(name)
        .ok_or_else(|| OcioError::colorspace(name, format!("{role} space not found in config")))
}
