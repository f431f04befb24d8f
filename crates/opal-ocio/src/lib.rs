//! Color space graph, processor compiler and LUT baker.
//!
//! - [`Config`] holds named color spaces, looks and roles, and resolves a
//!   conversion into an ordered list of [`Transform`] nodes through the
//!   reference space
//! - [`Processor`] is that list compiled, inverted where asked and optimized
//! - [`CpuProcessor`] evaluates a processor on pixels, scalar or 4-wide SIMD
//! - [`Baker`] samples a conversion into a text LUT
//!
//! # Quick Start
//!
//! ```
//! use opal_ocio::{ColorSpace, ConfigBuilder, Encoding, Transform};
//!
//! let config = ConfigBuilder::new("quick")
//!     .add_colorspace(ColorSpace::builder("linear").encoding(Encoding::SceneLinear).build())
//!     .add_colorspace(
//!         ColorSpace::builder("gamma22")
//!             .encoding(Encoding::Sdr)
//!             .to_reference(Transform::exponent([2.2, 2.2, 2.2, 1.0]))
//!             .build(),
//!     )
//!     .set_role("scene_linear", "linear")
//!     .build()?;
//!
//! let processor = config.processor("scene_linear", "gamma22")?;
//! let cpu = processor.default_cpu_processor();
//!
//! let mut pixels = [[0.18_f32, 0.18, 0.18, 1.0]; 8];
//! cpu.apply_rgba_buffer(&mut pixels);
//! assert!((pixels[0][0] - 0.18f32.powf(1.0 / 2.2)).abs() < 1e-4);
//! # Ok::<(), opal_ocio::OcioError>(())
//! ```
//!
//! # Features
//!
//! - `parallel` - `par_apply_*` buffer methods on [`CpuProcessor`] via rayon

#![warn(missing_docs)]
#![warn(clippy::all)]

mod baker;
mod cache;
mod colorspace;
mod config;
mod config_builder;
mod cpu;
mod dynamic;
mod error;
mod look;
mod processor;
mod role;
mod transform;

pub use baker::{
    Baker, DEFAULT_SHAPER_SIZE, format_extension_by_index, format_name_by_index, num_formats,
};
pub use cache::ProcessorCache;
pub use colorspace::{BitDepth, ColorSpace, ColorSpaceBuilder, Encoding};
pub use config::Config;
pub use config_builder::ConfigBuilder;
pub use cpu::{CpuProcessor, EvalPath};
pub use dynamic::{DynamicHandle, DynamicProperty, DynamicPropertyKind, DynamicTable};
pub use error::{OcioError, OcioResult};
pub use look::{Look, LookSpec, parse_looks};
pub use processor::{MAX_NESTING_DEPTH, OptimizationLevel, Processor, ProcessorOp};
pub use role::{Roles, names as role_names};
pub use transform::{
    AllocationTransform, CdlStyle, CdlTransform, ColorSpaceTransform, ExponentTransform,
    ExposureContrastStyle, ExposureContrastTransform, FixedFunctionStyle, FixedFunctionTransform,
    GradingRgbCurveTransform, GroupTransform, LogTransform, MatrixTransform, NegativeStyle,
    RangeStyle, RangeTransform, Transform, TransformDirection,
};

pub use opal_math::Matrix44;
pub use opal_ops::allocation::{Allocation, AllocationOp};
pub use opal_ops::log::LogOp;
pub use opal_ops::grading_rgb_curve::{
    ControlPoint, GradingBSplineCurve, GradingRgbCurves, GradingStyle, RgbCurveChannel,
};
