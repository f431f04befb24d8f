//! Processor compilation.
//!
//! A [`Processor`] is the compiled, optimized op list for one transform
//! chain. Compilation:
//!
//! 1. flattens groups and expands `ColorSpace` references through the config;
//! 2. folds each node's own direction into the requested one;
//! 3. precomputes inverses (matrix inverse, reciprocal exponents, swapped
//!    range bounds) so evaluation never branches on direction for them;
//! 4. assigns dynamic parameters a slot in the [`DynamicTable`];
//! 5. optimizes (see [`OptimizationLevel`]).
//!
//! Processors are immutable and cheap to clone; clones share ops and
//! dynamic slots.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use opal_math::Matrix44;
use opal_ops::allocation::{Allocation, AllocationOp};
use opal_ops::cdl::{Cdl, CdlStyle};
use opal_ops::exponent::{ExponentOp, NegativeStyle};
use opal_ops::exposure_contrast::ExposureContrast;
use opal_ops::fixed_function::FixedFunctionStyle;
use opal_ops::grading_rgb_curve::{GradingRgbCurvePreRender, GradingStyle};
use opal_ops::log::LogOp;
use opal_ops::range::{Range, RangeStyle};
use tracing::{debug, trace};

use crate::config::Config;
use crate::cpu::{CpuProcessor, EvalPath};
use crate::dynamic::{
    CurveState, DynamicHandle, DynamicProperty, DynamicPropertyKind, DynamicTable, DynamicValue,
};
use crate::error::{OcioError, OcioResult};
use crate::transform::{Transform, TransformDirection};

/// Deepest allowed chain of nested `ColorSpace` references.
pub const MAX_NESTING_DEPTH: usize = 32;

const MATRIX_IDENTITY_EPS: f64 = 1e-10;
const RECIPROCAL_EPS: f64 = 1e-12;

/// How much the compiler rewrites the op list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OptimizationLevel {
    /// Keep every op as compiled.
    None,
    /// Identity elision, inverse-pair cancellation and matrix folding.
    /// Every rewrite preserves the output for all inputs.
    #[default]
    Default,
}

/// One compiled op. Parameters are already oriented for evaluation.
#[derive(Debug, Clone)]
pub enum ProcessorOp {
    /// `out = m * in + offset` on RGBA.
    Matrix(Matrix44),
    /// Per-channel power on RGBA.
    Exponent(ExponentOp),
    /// ASC CDL.
    Cdl {
        /// Parameters as authored.
        cdl: Cdl,
        /// Clamping style.
        style: CdlStyle,
        /// Forward or inverse evaluation.
        forward: bool,
    },
    /// Range remap, bounds already swapped for the inverse.
    Range {
        /// Bounds.
        range: Range,
        /// Clamping style.
        style: RangeStyle,
    },
    /// Fixed function, already replaced by its opposite for the inverse.
    FixedFunction(FixedFunctionStyle),
    /// Exposure / contrast / gamma.
    ExposureContrast {
        /// Parameters at compile time.
        params: ExposureContrast,
        /// Forward or inverse evaluation.
        forward: bool,
        /// Slots for exposure, contrast and gamma, when dynamic.
        dynamic: [Option<DynamicHandle>; 3],
    },
    /// Allocation encode (`forward`) or decode.
    Allocation {
        /// Allocation.
        op: AllocationOp,
        /// Encode when true.
        forward: bool,
    },
    /// Lin to log (`forward`) or log to lin.
    Log {
        /// Parameters as authored.
        op: LogOp,
        /// Lin to log when true.
        forward: bool,
    },
    /// RGB curves.
    GradingRgbCurve {
        /// Curve domain.
        style: GradingStyle,
        /// Skip the lin/log wrap.
        bypass_lin_to_log: bool,
        /// Forward or inverse evaluation.
        forward: bool,
        /// Fitted curves at compile time.
        prerender: Arc<GradingRgbCurvePreRender>,
        /// Slot holding replacement curves, when dynamic.
        dynamic: Option<DynamicHandle>,
    },
}

impl ProcessorOp {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Matrix(_) => "matrix",
            Self::Exponent(_) => "exponent",
            Self::Cdl { .. } => "cdl",
            Self::Range { .. } => "range",
            Self::FixedFunction(_) => "fixed_function",
            Self::ExposureContrast { .. } => "exposure_contrast",
            Self::Allocation { .. } => "allocation",
            Self::Log { .. } => "log",
            Self::GradingRgbCurve { .. } => "grading_rgb_curve",
        }
    }

    /// True when some parameter lives in the dynamic table.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::ExposureContrast { dynamic, .. } => dynamic.iter().any(Option::is_some),
            Self::GradingRgbCurve { dynamic, .. } => dynamic.is_some(),
            _ => false,
        }
    }

    /// True when the op leaves every pixel unchanged. Dynamic ops and ops
    /// that clamp are never identities.
    pub fn is_identity(&self) -> bool {
        if self.is_dynamic() {
            return false;
        }
        match self {
            Self::Matrix(m) => m.is_identity(MATRIX_IDENTITY_EPS),
            Self::Exponent(e) => e.is_identity(),
            Self::Cdl { cdl, style, .. } => *style == CdlStyle::NoClamp && cdl.is_identity(),
            Self::Range { range, style } => range.is_identity(*style),
            Self::FixedFunction(_) | Self::Log { .. } => false,
            Self::ExposureContrast { params, .. } => params.is_identity(),
            Self::Allocation { op, .. } => op.is_identity(),
            Self::GradingRgbCurve { prerender, .. } => prerender.is_bypass(),
        }
    }

    /// True when `self` followed by `next` is exactly the identity.
    fn cancels(&self, next: &ProcessorOp) -> bool {
        if self.is_dynamic() || next.is_dynamic() {
            return false;
        }
        match (self, next) {
            (Self::Matrix(a), Self::Matrix(b)) => a.then(b).is_identity(MATRIX_IDENTITY_EPS),
            (Self::Exponent(a), Self::Exponent(b)) => {
                a.negative_style == b.negative_style
                    && a.negative_style != NegativeStyle::Clamp
                    && a.value
                        .iter()
                        .zip(&b.value)
                        .all(|(x, y)| (x * y - 1.0).abs() < RECIPROCAL_EPS)
            }
            (
                Self::Cdl {
                    cdl: a,
                    style: CdlStyle::NoClamp,
                    forward: fa,
                },
                Self::Cdl {
                    cdl: b,
                    style: CdlStyle::NoClamp,
                    forward: fb,
                },
            ) => a == b && fa != fb,
            (
                Self::Range {
                    range: a,
                    style: RangeStyle::NoClamp,
                },
                Self::Range {
                    range: b,
                    style: RangeStyle::NoClamp,
                },
            ) => {
                (a.scale() * b.scale() - 1.0).abs() < RECIPROCAL_EPS
                    && (a.offset() * b.scale() + b.offset()).abs() < RECIPROCAL_EPS
            }
            (Self::FixedFunction(a), Self::FixedFunction(b)) => a.inverse() == *b,
            (
                Self::Allocation {
                    op: a,
                    forward: fa,
                },
                Self::Allocation {
                    op: b,
                    forward: fb,
                },
            ) => a == b && a.allocation == Allocation::Uniform && fa != fb,
            _ => false,
        }
    }
}

/// Turns transform trees into a flat op list.
pub(crate) struct Compiler<'a> {
    config: Option<&'a Config>,
    ops: Vec<ProcessorOp>,
    dynamic: DynamicTable,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(config: Option<&'a Config>) -> Self {
        Self {
            config,
            ops: Vec::new(),
            dynamic: DynamicTable::default(),
        }
    }

    fn push(&mut self, op: ProcessorOp) {
        trace!(op = op.name(), dynamic = op.is_dynamic(), "compiled op");
        self.ops.push(op);
    }

    pub(crate) fn compile(
        &mut self,
        transform: &Transform,
        applied: TransformDirection,
        depth: usize,
    ) -> OcioResult<()> {
        let dir = transform.direction().combine(applied);
        let forward = dir == TransformDirection::Forward;

        match transform {
            Transform::Matrix(t) => {
                let m = if forward {
                    t.matrix
                } else {
                    t.matrix.inverse().ok_or(OcioError::UnsupportedInversion {
                        op: "matrix",
                        reason: "matrix is singular".into(),
                    })?
                };
                self.push(ProcessorOp::Matrix(m));
            }
            Transform::Exponent(t) => {
                let op = ExponentOp::new(t.value).with_negative_style(t.negative_style);
                let op = if forward {
                    op
                } else {
                    op.inverse()
                        .map_err(|e| OcioError::from_inversion("exponent", e))?
                };
                self.push(ProcessorOp::Exponent(op));
            }
            Transform::Cdl(t) => {
                let cdl = Cdl {
                    slope: t.slope,
                    offset: t.offset,
                    power: t.power,
                    saturation: t.saturation,
                };
                if !forward {
                    cdl.check_invertible()
                        .map_err(|e| OcioError::from_inversion("cdl", e))?;
                }
                self.push(ProcessorOp::Cdl {
                    cdl,
                    style: t.style,
                    forward,
                });
            }
            Transform::Range(t) => {
                let range = Range {
                    min_in: t.min_in,
                    max_in: t.max_in,
                    min_out: t.min_out,
                    max_out: t.max_out,
                };
                let range = if forward {
                    range.validate()?;
                    range
                } else {
                    let inv = range
                        .inverse()
                        .map_err(|e| OcioError::from_inversion("range", e))?;
                    range.validate()?;
                    inv
                };
                self.push(ProcessorOp::Range {
                    range,
                    style: t.style,
                });
            }
            Transform::FixedFunction(t) => {
                let style = if forward { t.style } else { t.style.inverse() };
                self.push(ProcessorOp::FixedFunction(style));
            }
            Transform::ExposureContrast(t) => {
                let params = t.params();
                let mut slot = |on: bool, kind, value| {
                    on.then(|| self.dynamic.push(kind, DynamicValue::Double(value)))
                };
                let dynamic = [
                    slot(t.dynamic_exposure, DynamicPropertyKind::Exposure, params.exposure),
                    slot(t.dynamic_contrast, DynamicPropertyKind::Contrast, params.contrast),
                    slot(t.dynamic_gamma, DynamicPropertyKind::Gamma, params.gamma),
                ];
                self.push(ProcessorOp::ExposureContrast {
                    params,
                    forward,
                    dynamic,
                });
            }
            Transform::Allocation(t) => {
                let op = t.op()?;
                self.push(ProcessorOp::Allocation { op, forward });
            }
            Transform::Log(t) => {
                let op = t.op()?;
                self.push(ProcessorOp::Log { op, forward });
            }
            Transform::GradingRgbCurve(t) => {
                let state = CurveState::new(t.curves().clone());
                let prerender = Arc::clone(&state.prerender);
                let dynamic = t.is_dynamic().then(|| {
                    self.dynamic
                        .push(DynamicPropertyKind::GradingRgbCurve, DynamicValue::Curves(state))
                });
                self.push(ProcessorOp::GradingRgbCurve {
                    style: t.style(),
                    bypass_lin_to_log: t.bypass_lin_to_log(),
                    forward,
                    prerender,
                    dynamic,
                });
            }
            Transform::ColorSpace(t) => {
                let Some(config) = self.config else {
                    return Err(OcioError::ProcessorCompilation {
                        reason: format!(
                            "colorspace reference '{}' -> '{}' needs a config",
                            t.src, t.dst
                        ),
                    });
                };
                if depth >= MAX_NESTING_DEPTH {
                    return Err(OcioError::colorspace(
                        t.src.as_str(),
                        format!("references nest deeper than {MAX_NESTING_DEPTH}; circular reference?"),
                    ));
                }
                let (src, dst) = if forward {
                    (&t.src, &t.dst)
                } else {
                    (&t.dst, &t.src)
                };
                for node in config.resolve(src, dst, &[])? {
                    self.compile(&node, TransformDirection::Forward, depth + 1)?;
                }
            }
            Transform::Group(t) => {
                if forward {
                    for child in &t.transforms {
                        self.compile(child, TransformDirection::Forward, depth)?;
                    }
                } else {
                    for child in t.transforms.iter().rev() {
                        self.compile(child, TransformDirection::Inverse, depth)?;
                    }
                }
            }
        }
        Ok(())
    }

    pub(crate) fn finish(self, level: OptimizationLevel) -> Processor {
        let ops = optimize(self.ops, level);
        Processor::new(ops, self.dynamic)
    }
}

/// Runs the optimization passes. Never fails.
pub(crate) fn optimize(ops: Vec<ProcessorOp>, level: OptimizationLevel) -> Vec<ProcessorOp> {
    if level == OptimizationLevel::None {
        return ops;
    }
    let before = ops.len();

    let mut stack: Vec<ProcessorOp> = Vec::with_capacity(ops.len());
    for op in ops {
        if op.is_identity() {
            continue;
        }
        if stack.last().is_some_and(|top| top.cancels(&op)) {
            stack.pop();
            continue;
        }
        stack.push(op);
    }

    let mut out: Vec<ProcessorOp> = Vec::with_capacity(stack.len());
    for op in stack {
        match (out.last_mut(), &op) {
            (Some(ProcessorOp::Matrix(prev)), ProcessorOp::Matrix(next)) => {
                *prev = prev.then(next);
            }
            _ => out.push(op),
        }
    }
    out.retain(|op| !matches!(op, ProcessorOp::Matrix(m) if m.is_identity(MATRIX_IDENTITY_EPS)));

    debug!(before, after = out.len(), "optimized processor");
    out
}

/// A compiled transform chain.
#[derive(Debug, Clone)]
pub struct Processor {
    ops: Arc<[ProcessorOp]>,
    dynamic: Arc<DynamicTable>,
    cache_id: String,
}

impl Processor {
    fn new(ops: Vec<ProcessorOp>, dynamic: DynamicTable) -> Self {
        let mut hasher = DefaultHasher::new();
        for op in &ops {
            format!("{op:?}").hash(&mut hasher);
        }
        Self {
            ops: ops.into(),
            dynamic: Arc::new(dynamic),
            cache_id: format!("{:016x}", hasher.finish()),
        }
    }

    /// Compiles a standalone transform. `ColorSpace` nodes need a config;
    /// use [`Config::processor_from_transform`] for those.
    pub fn from_transform(transform: &Transform, direction: TransformDirection) -> OcioResult<Self> {
        Self::from_transform_with_level(transform, direction, OptimizationLevel::default())
    }

    /// [`Self::from_transform`] with an explicit optimization level.
    pub fn from_transform_with_level(
        transform: &Transform,
        direction: TransformDirection,
        level: OptimizationLevel,
    ) -> OcioResult<Self> {
        Self::build(None, transform, direction, level)
    }

    pub(crate) fn build(
        config: Option<&Config>,
        transform: &Transform,
        direction: TransformDirection,
        level: OptimizationLevel,
    ) -> OcioResult<Self> {
        let mut compiler = Compiler::new(config);
        compiler.compile(transform, direction, 0)?;
        Ok(compiler.finish(level))
    }

    /// True when the processor leaves pixels unchanged.
    pub fn is_noop(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of compiled ops.
    pub fn num_ops(&self) -> usize {
        self.ops.len()
    }

    /// Compiled ops.
    pub fn ops(&self) -> &[ProcessorOp] {
        &self.ops
    }

    /// True when some op has a dynamic parameter.
    pub fn has_dynamic_properties(&self) -> bool {
        !self.dynamic.is_empty()
    }

    /// Identifier derived from the compiled ops; equal chains share it.
    pub fn cache_id(&self) -> &str {
        &self.cache_id
    }

    /// Accessor for the first dynamic parameter of `kind`.
    pub fn dynamic_property(&self, kind: DynamicPropertyKind) -> OcioResult<DynamicProperty> {
        let handle = self.dynamic.first_of(kind).ok_or_else(|| {
            OcioError::invalid_parameter(
                "dynamic_property",
                format!("processor has no dynamic {} property", kind.name()),
            )
        })?;
        Ok(DynamicProperty::new(Arc::clone(&self.dynamic), handle))
    }

    /// CPU evaluator on the SIMD path.
    pub fn default_cpu_processor(&self) -> CpuProcessor {
        self.cpu_processor(EvalPath::default())
    }

    /// CPU evaluator on the chosen path.
    pub fn cpu_processor(&self, path: EvalPath) -> CpuProcessor {
        CpuProcessor::new(&self.ops, Arc::clone(&self.dynamic), path)
    }
}
