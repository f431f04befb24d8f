//! Transform nodes: the declarative half of a color pipeline.
//!
//! A [`Transform`] describes an operation and the direction to run it in.
//! Nothing is evaluated here; [`crate::Processor`] compiles transforms into
//! ops. Node kinds:
//! - Matrix, exponent, CDL, range and allocation math
//! - Fixed functions (HSV, xyY, u'v'Y)
//! - Exposure/contrast and RGB curves, which can carry dynamic parameters
//! - `ColorSpace` references, resolved through a [`crate::Config`]
//! - Groups of any of the above
//!
//! # Example
//!
//! ```
//! use opal_ocio::{Transform, TransformDirection};
//!
//! let gamma = Transform::exponent([2.2, 2.2, 2.2, 1.0]);
//! let degamma = gamma.clone().inverse();
//! assert_eq!(degamma.direction(), TransformDirection::Inverse);
//! ```

use opal_math::Matrix44;
use opal_ops::allocation::{Allocation, AllocationOp};
use opal_ops::log::LogOp;
use opal_ops::exposure_contrast::{
    ExposureContrast, LOG_EXPOSURE_STEP_DEFAULT, LOG_MIDGRAY_DEFAULT,
};
use opal_ops::grading_rgb_curve::{
    ControlPoint, GradingBSplineCurve, GradingRgbCurves, GradingStyle, RgbCurveChannel,
};

pub use opal_ops::cdl::CdlStyle;
pub use opal_ops::exponent::NegativeStyle;
pub use opal_ops::exposure_contrast::ExposureContrastStyle;
pub use opal_ops::fixed_function::FixedFunctionStyle;
pub use opal_ops::range::RangeStyle;

use crate::error::OcioResult;

/// Transform application direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum TransformDirection {
    /// Forward transform.
    #[default]
    Forward,
    /// Inverse transform.
    Inverse,
}

impl TransformDirection {
    /// Returns the opposite direction.
    #[inline]
    pub fn inverse(self) -> Self {
        match self {
            Self::Forward => Self::Inverse,
            Self::Inverse => Self::Forward,
        }
    }

    /// Composes a node's own direction with the direction it is applied in.
    #[inline]
    pub fn combine(self, other: Self) -> Self {
        if self == other {
            Self::Forward
        } else {
            Self::Inverse
        }
    }
}

/// A color transform node.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    /// 4x4 matrix plus RGBA offset.
    Matrix(MatrixTransform),
    /// Per-channel power.
    Exponent(ExponentTransform),
    /// ASC CDL.
    Cdl(CdlTransform),
    /// Affine remap with optional clamp.
    Range(RangeTransform),
    /// Built-in conversion.
    FixedFunction(FixedFunctionTransform),
    /// Exposure, contrast and gamma.
    ExposureContrast(ExposureContrastTransform),
    /// Uniform or log2 encoding.
    Allocation(AllocationTransform),
    /// Log with affine parameters; forward is lin to log.
    Log(LogTransform),
    /// RGB + master B-spline curves.
    GradingRgbCurve(GradingRgbCurveTransform),
    /// Conversion between two named spaces of a config.
    ColorSpace(ColorSpaceTransform),
    /// Ordered chain.
    Group(GroupTransform),
}

impl Transform {
    /// Matrix without offset.
    pub fn matrix(m: [f64; 16]) -> Self {
        Self::matrix_with_offset(m, [0.0; 4])
    }

    /// Matrix with an RGBA offset.
    pub fn matrix_with_offset(m: [f64; 16], offset: [f64; 4]) -> Self {
        Self::Matrix(MatrixTransform {
            matrix: Matrix44::new(m, offset),
            direction: TransformDirection::Forward,
        })
    }

    /// Exponent with the default clamping style.
    pub fn exponent(value: [f64; 4]) -> Self {
        Self::Exponent(ExponentTransform {
            value,
            ..Default::default()
        })
    }

    /// Plain `log_base` on RGB. The inverse is `base^x`.
    pub fn log(base: f64) -> Self {
        Self::Log(LogTransform {
            base,
            ..Default::default()
        })
    }

    /// Reference from `src` to `dst`, resolved by the config at compile time.
    pub fn colorspace(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self::ColorSpace(ColorSpaceTransform {
            src: src.into(),
            dst: dst.into(),
            direction: TransformDirection::Forward,
        })
    }

    /// Group applied in order.
    pub fn group(transforms: Vec<Transform>) -> Self {
        Self::Group(GroupTransform {
            transforms,
            direction: TransformDirection::Forward,
        })
    }

    /// The node's own direction.
    pub fn direction(&self) -> TransformDirection {
        match self {
            Self::Matrix(t) => t.direction,
            Self::Exponent(t) => t.direction,
            Self::Cdl(t) => t.direction,
            Self::Range(t) => t.direction,
            Self::FixedFunction(t) => t.direction,
            Self::ExposureContrast(t) => t.direction,
            Self::Allocation(t) => t.direction,
            Self::Log(t) => t.direction,
            Self::GradingRgbCurve(t) => t.direction,
            Self::ColorSpace(t) => t.direction,
            Self::Group(t) => t.direction,
        }
    }

    /// Sets the node's own direction.
    pub fn with_direction(mut self, direction: TransformDirection) -> Self {
        match &mut self {
            Self::Matrix(t) => t.direction = direction,
            Self::Exponent(t) => t.direction = direction,
            Self::Cdl(t) => t.direction = direction,
            Self::Range(t) => t.direction = direction,
            Self::FixedFunction(t) => t.direction = direction,
            Self::ExposureContrast(t) => t.direction = direction,
            Self::Allocation(t) => t.direction = direction,
            Self::Log(t) => t.direction = direction,
            Self::GradingRgbCurve(t) => t.direction = direction,
            Self::ColorSpace(t) => t.direction = direction,
            Self::Group(t) => t.direction = direction,
        }
        self
    }

    /// Flips the direction. Whether the inverse exists is checked when the
    /// node is compiled.
    pub fn inverse(self) -> Self {
        let dir = self.direction().inverse();
        self.with_direction(dir)
    }

    /// Short kind name used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Matrix(_) => "matrix",
            Self::Exponent(_) => "exponent",
            Self::Cdl(_) => "cdl",
            Self::Range(_) => "range",
            Self::FixedFunction(_) => "fixed_function",
            Self::ExposureContrast(_) => "exposure_contrast",
            Self::Allocation(_) => "allocation",
            Self::Log(_) => "log",
            Self::GradingRgbCurve(_) => "grading_rgb_curve",
            Self::ColorSpace(_) => "colorspace",
            Self::Group(_) => "group",
        }
    }
}

/// 4x4 matrix plus offset.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixTransform {
    /// Matrix and offset.
    pub matrix: Matrix44,
    /// Direction.
    pub direction: TransformDirection,
}

/// Exponent per RGBA channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentTransform {
    /// Exponents `[R, G, B, A]`.
    pub value: [f64; 4],
    /// Negative handling.
    pub negative_style: NegativeStyle,
    /// Direction.
    pub direction: TransformDirection,
}

impl Default for ExponentTransform {
    fn default() -> Self {
        Self {
            value: [1.0; 4],
            negative_style: NegativeStyle::Clamp,
            direction: TransformDirection::Forward,
        }
    }
}

/// ASC CDL.
#[derive(Debug, Clone, PartialEq)]
pub struct CdlTransform {
    /// Per-channel slope.
    pub slope: [f64; 3],
    /// Per-channel offset.
    pub offset: [f64; 3],
    /// Per-channel power.
    pub power: [f64; 3],
    /// Saturation.
    pub saturation: f64,
    /// Clamping style.
    pub style: CdlStyle,
    /// Direction.
    pub direction: TransformDirection,
}

impl Default for CdlTransform {
    fn default() -> Self {
        Self {
            slope: [1.0; 3],
            offset: [0.0; 3],
            power: [1.0; 3],
            saturation: 1.0,
            style: CdlStyle::default(),
            direction: TransformDirection::Forward,
        }
    }
}

/// Range remap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RangeTransform {
    /// Lower input bound.
    pub min_in: Option<f64>,
    /// Upper input bound.
    pub max_in: Option<f64>,
    /// Lower output bound.
    pub min_out: Option<f64>,
    /// Upper output bound.
    pub max_out: Option<f64>,
    /// Clamping style.
    pub style: RangeStyle,
    /// Direction.
    pub direction: TransformDirection,
}

/// Log with lin-side and log-side affine parameters:
/// `log_slope * log_base(lin_slope * x + lin_offset) + log_offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogTransform {
    /// Log base.
    pub base: f64,
    /// Per-channel log-side slope.
    pub log_slope: [f64; 3],
    /// Per-channel log-side offset.
    pub log_offset: [f64; 3],
    /// Per-channel lin-side slope.
    pub lin_slope: [f64; 3],
    /// Per-channel lin-side offset.
    pub lin_offset: [f64; 3],
    /// Direction.
    pub direction: TransformDirection,
}

impl Default for LogTransform {
    fn default() -> Self {
        Self {
            base: 2.0,
            log_slope: [1.0; 3],
            log_offset: [0.0; 3],
            lin_slope: [1.0; 3],
            lin_offset: [0.0; 3],
            direction: TransformDirection::Forward,
        }
    }
}

impl LogTransform {
    /// Kernel parameters, validated.
    pub fn op(&self) -> OcioResult<LogOp> {
        let op = LogOp {
            base: self.base,
            log_slope: self.log_slope,
            log_offset: self.log_offset,
            lin_slope: self.lin_slope,
            lin_offset: self.lin_offset,
        };
        op.validate()?;
        Ok(op)
    }
}

/// Built-in conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedFunctionTransform {
    /// Which conversion.
    pub style: FixedFunctionStyle,
    /// Direction.
    pub direction: TransformDirection,
}

/// Exposure / contrast / gamma. Each of the three can be made dynamic.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureContrastTransform {
    /// Style.
    pub style: ExposureContrastStyle,
    /// Exposure in stops.
    pub exposure: f64,
    /// Contrast.
    pub contrast: f64,
    /// Gamma.
    pub gamma: f64,
    /// Pivot.
    pub pivot: f64,
    /// Log units per stop (Logarithmic style).
    pub log_exposure_step: f64,
    /// Log mid-grey (Logarithmic style).
    pub log_midgray: f64,
    /// Exposure can be changed after compilation.
    pub dynamic_exposure: bool,
    /// Contrast can be changed after compilation.
    pub dynamic_contrast: bool,
    /// Gamma can be changed after compilation.
    pub dynamic_gamma: bool,
    /// Direction.
    pub direction: TransformDirection,
}

impl Default for ExposureContrastTransform {
    fn default() -> Self {
        Self {
            style: ExposureContrastStyle::Linear,
            exposure: 0.0,
            contrast: 1.0,
            gamma: 1.0,
            pivot: 0.18,
            log_exposure_step: LOG_EXPOSURE_STEP_DEFAULT,
            log_midgray: LOG_MIDGRAY_DEFAULT,
            dynamic_exposure: false,
            dynamic_contrast: false,
            dynamic_gamma: false,
            direction: TransformDirection::Forward,
        }
    }
}

impl ExposureContrastTransform {
    /// Kernel parameters.
    pub fn params(&self) -> ExposureContrast {
        ExposureContrast {
            style: self.style,
            exposure: self.exposure,
            contrast: self.contrast,
            gamma: self.gamma,
            pivot: self.pivot,
            log_exposure_step: self.log_exposure_step,
            log_midgray: self.log_midgray,
        }
    }

    /// True when any parameter is dynamic.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic_exposure || self.dynamic_contrast || self.dynamic_gamma
    }
}

/// Uniform or log2 allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationTransform {
    /// Encoding.
    pub allocation: Allocation,
    /// `[]`, `[min, max]` or `[min, max, offset]`.
    pub vars: Vec<f64>,
    /// Direction.
    pub direction: TransformDirection,
}

impl AllocationTransform {
    /// Validated allocation op.
    pub fn op(&self) -> OcioResult<AllocationOp> {
        Ok(AllocationOp::from_vars(self.allocation, &self.vars)?)
    }
}

impl From<AllocationOp> for AllocationTransform {
    fn from(op: AllocationOp) -> Self {
        Self {
            allocation: op.allocation,
            vars: op.vars().to_vec(),
            direction: TransformDirection::Forward,
        }
    }
}

/// RGB and master curves.
///
/// Curves are only reachable through setters, which validate every change.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingRgbCurveTransform {
    style: GradingStyle,
    curves: GradingRgbCurves,
    bypass_lin_to_log: bool,
    dynamic: bool,
    direction: TransformDirection,
}

impl GradingRgbCurveTransform {
    /// Identity curves for `style`.
    pub fn new(style: GradingStyle) -> Self {
        Self {
            style,
            curves: GradingRgbCurves::default_for(style),
            bypass_lin_to_log: false,
            dynamic: false,
            direction: TransformDirection::Forward,
        }
    }

    /// Replaces all curves.
    pub fn with_curves(mut self, curves: GradingRgbCurves) -> Self {
        self.curves = curves;
        self
    }

    /// Style.
    pub fn style(&self) -> GradingStyle {
        self.style
    }

    /// Curves.
    pub fn curves(&self) -> &GradingRgbCurves {
        &self.curves
    }

    /// Replaces one curve.
    pub fn set_curve(&mut self, channel: RgbCurveChannel, curve: GradingBSplineCurve) {
        self.curves.set_curve(channel, curve);
    }

    /// Replaces one curve from flat `[x0, y0, x1, y1, ...]` coordinates.
    pub fn set_curve_points(&mut self, channel: RgbCurveChannel, xy: &[f32]) -> OcioResult<()> {
        let curve = GradingBSplineCurve::from_xy(xy)?;
        self.curves.set_curve(channel, curve);
        Ok(())
    }

    /// Moves one control point. The curve is unchanged on error.
    pub fn set_control_point(
        &mut self,
        channel: RgbCurveChannel,
        index: usize,
        point: ControlPoint,
    ) -> OcioResult<()> {
        self.curves.curve_mut(channel).set_point(index, point)?;
        Ok(())
    }

    /// Replaces one curve's slopes.
    pub fn set_slopes(&mut self, channel: RgbCurveChannel, slopes: Vec<f32>) -> OcioResult<()> {
        self.curves.curve_mut(channel).set_slopes(slopes)?;
        Ok(())
    }

    /// Skip the lin/log wrap of the `Linear` style.
    pub fn bypass_lin_to_log(&self) -> bool {
        self.bypass_lin_to_log
    }

    /// Sets [`Self::bypass_lin_to_log`].
    pub fn set_bypass_lin_to_log(&mut self, bypass: bool) {
        self.bypass_lin_to_log = bypass;
    }

    /// Curves can be replaced after compilation.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Sets [`Self::is_dynamic`].
    pub fn set_dynamic(&mut self, dynamic: bool) {
        self.dynamic = dynamic;
    }

    /// Direction.
    pub fn direction(&self) -> TransformDirection {
        self.direction
    }

    /// Sets the direction.
    pub fn set_direction(&mut self, direction: TransformDirection) {
        self.direction = direction;
    }
}

impl Default for GradingRgbCurveTransform {
    fn default() -> Self {
        Self::new(GradingStyle::Log)
    }
}

/// Reference to a conversion between two named spaces.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorSpaceTransform {
    /// Source space.
    pub src: String,
    /// Destination space.
    pub dst: String,
    /// Direction.
    pub direction: TransformDirection,
}

/// Ordered chain. Inverse runs the children backwards, each inverted.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTransform {
    /// Children.
    pub transforms: Vec<Transform>,
    /// Direction.
    pub direction: TransformDirection,
}

macro_rules! impl_from_node {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Transform {
                fn from(t: $ty) -> Self {
                    Transform::$variant(t)
                }
            }
        )*
    };
}

impl_from_node! {
    MatrixTransform => Matrix,
    ExponentTransform => Exponent,
    CdlTransform => Cdl,
    RangeTransform => Range,
    FixedFunctionTransform => FixedFunction,
    ExposureContrastTransform => ExposureContrast,
    AllocationTransform => Allocation,
    LogTransform => Log,
    GradingRgbCurveTransform => GradingRgbCurve,
    ColorSpaceTransform => ColorSpace,
    GroupTransform => Group,
}
