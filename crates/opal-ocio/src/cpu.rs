//! CPU evaluation of a compiled [`Processor`](crate::Processor).
//!
//! Buffers are processed op by op. Each op resolves its dynamic parameters
//! once per call, then runs over the whole buffer. The SIMD path handles
//! four pixels per step with `wide::f32x4` for matrix, exponent, range,
//! allocation and log ops; every other op, and the tail of the buffer, runs
//! the scalar kernel.
//!
//! RGB buffers are evaluated as RGBA with alpha 1. Alpha lives in a scratch
//! block for the whole op chain and is dropped on the way out.

use std::borrow::Cow;
use std::sync::Arc;

use opal_math::simd::{
    Pixel4, clamp_x4, exp2_x4, log2_x4, matrix_x4, mul_add_x4, pow_clamped_x4, pow_mirror_x4,
    pow_passthru_x4,
};
use opal_ops::allocation::{Allocation, AllocationOp, apply_allocation_fwd, apply_allocation_inv};
use opal_ops::cdl::{Cdl, CdlStyle};
use opal_ops::exponent::{NegativeStyle, apply_exponent};
use opal_ops::exposure_contrast::ExposureContrast;
use opal_ops::fixed_function::FixedFunctionStyle;
use opal_ops::grading_rgb_curve::{
    GradingRgbCurvePreRender, GradingStyle, apply_grading_rgb_curve,
};
use opal_ops::log::LogParams;
use opal_ops::range::RangeParams;
use wide::f32x4;

use crate::dynamic::{DynamicHandle, DynamicTable};
use crate::processor::ProcessorOp;

/// Pixels per RGBA scratch block when evaluating RGB buffers.
const RGB_SCRATCH: usize = 256;

/// Pixels per rayon task.
#[cfg(feature = "parallel")]
const PAR_CHUNK: usize = 4096;

/// Evaluation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EvalPath {
    /// One pixel at a time.
    Scalar,
    /// Four pixels at a time where the op has a vector kernel.
    #[default]
    Simd,
}

#[derive(Debug, Clone)]
enum CpuOp {
    Matrix {
        m: [f32; 16],
        offset: [f32; 4],
    },
    Exponent {
        value: [f32; 4],
        style: NegativeStyle,
    },
    Cdl {
        cdl: Cdl,
        style: CdlStyle,
        forward: bool,
    },
    Range(RangeParams),
    FixedFunction(FixedFunctionStyle),
    ExposureContrast {
        params: ExposureContrast,
        forward: bool,
        dynamic: [Option<DynamicHandle>; 3],
    },
    Allocation {
        op: AllocationOp,
        forward: bool,
    },
    Log {
        params: LogParams,
        forward: bool,
    },
    GradingRgbCurve {
        style: GradingStyle,
        bypass_lin_to_log: bool,
        forward: bool,
        prerender: Arc<GradingRgbCurvePreRender>,
        dynamic: Option<DynamicHandle>,
    },
}

#[inline]
fn map_rgb(px: &mut [f32; 4], f: impl FnOnce([f32; 3]) -> [f32; 3]) {
    let [r, g, b] = f([px[0], px[1], px[2]]);
    px[0] = r;
    px[1] = g;
    px[2] = b;
}

impl CpuOp {
    fn from_op(op: &ProcessorOp) -> Self {
        match op {
            ProcessorOp::Matrix(m) => {
                let (m, offset) = m.to_f32();
                Self::Matrix { m, offset }
            }
            ProcessorOp::Exponent(e) => Self::Exponent {
                value: e.value_f32(),
                style: e.negative_style,
            },
            ProcessorOp::Cdl {
                cdl,
                style,
                forward,
            } => Self::Cdl {
                cdl: *cdl,
                style: *style,
                forward: *forward,
            },
            ProcessorOp::Range { range, style } => Self::Range(range.params(*style)),
            ProcessorOp::FixedFunction(style) => Self::FixedFunction(*style),
            ProcessorOp::ExposureContrast {
                params,
                forward,
                dynamic,
            } => Self::ExposureContrast {
                params: *params,
                forward: *forward,
                dynamic: *dynamic,
            },
            ProcessorOp::Allocation { op, forward } => Self::Allocation {
                op: *op,
                forward: *forward,
            },
            ProcessorOp::Log { op, forward } => Self::Log {
                params: op.params(),
                forward: *forward,
            },
            ProcessorOp::GradingRgbCurve {
                style,
                bypass_lin_to_log,
                forward,
                prerender,
                dynamic,
            } => Self::GradingRgbCurve {
                style: *style,
                bypass_lin_to_log: *bypass_lin_to_log,
                forward: *forward,
                prerender: Arc::clone(prerender),
                dynamic: *dynamic,
            },
        }
    }

    /// Substitutes the current dynamic values.
    fn resolve(&self, table: &DynamicTable) -> Cow<'_, CpuOp> {
        match self {
            Self::ExposureContrast {
                params,
                forward,
                dynamic,
            } if dynamic.iter().any(Option::is_some) => {
                let mut params = *params;
                if let Some(h) = dynamic[0] {
                    params.exposure = table.read_f64(h);
                }
                if let Some(h) = dynamic[1] {
                    params.contrast = table.read_f64(h);
                }
                if let Some(h) = dynamic[2] {
                    params.gamma = table.read_f64(h);
                }
                Cow::Owned(Self::ExposureContrast {
                    params,
                    forward: *forward,
                    dynamic: [None; 3],
                })
            }
            Self::GradingRgbCurve {
                style,
                bypass_lin_to_log,
                forward,
                dynamic: Some(h),
                ..
            } => Cow::Owned(Self::GradingRgbCurve {
                style: *style,
                bypass_lin_to_log: *bypass_lin_to_log,
                forward: *forward,
                prerender: table.read_prerender(*h),
                dynamic: None,
            }),
            _ => Cow::Borrowed(self),
        }
    }

    fn apply_scalar(&self, px: &mut [f32; 4]) {
        match self {
            Self::Matrix { m, offset } => {
                let [r, g, b, a] = *px;
                for (row, out) in px.iter_mut().enumerate() {
                    let k = row * 4;
                    *out = r * m[k] + g * m[k + 1] + b * m[k + 2] + a * m[k + 3] + offset[row];
                }
            }
            Self::Exponent { value, style } => apply_exponent(value, *style, px),
            Self::Cdl {
                cdl,
                style,
                forward,
            } => map_rgb(px, |rgb| {
                if *forward {
                    cdl.apply(*style, rgb)
                } else {
                    cdl.apply_inverse(*style, rgb)
                }
            }),
            Self::Range(params) => map_rgb(px, |mut rgb| {
                params.apply(&mut rgb);
                rgb
            }),
            Self::FixedFunction(style) => map_rgb(px, |rgb| style.apply(rgb)),
            Self::ExposureContrast {
                params, forward, ..
            } => map_rgb(px, |rgb| params.apply(rgb, *forward)),
            Self::Allocation { op, forward } => map_rgb(px, |mut rgb| {
                if *forward {
                    apply_allocation_fwd(op, &mut rgb);
                } else {
                    apply_allocation_inv(op, &mut rgb);
                }
                rgb
            }),
            Self::Log { params, forward } => map_rgb(px, |mut rgb| {
                if *forward {
                    params.apply_fwd(&mut rgb);
                } else {
                    params.apply_inv(&mut rgb);
                }
                rgb
            }),
            Self::GradingRgbCurve {
                style,
                bypass_lin_to_log,
                forward,
                prerender,
                ..
            } => map_rgb(px, |mut rgb| {
                apply_grading_rgb_curve(*style, *bypass_lin_to_log, prerender, *forward, &mut rgb);
                rgb
            }),
        }
    }

    fn apply_x4(&self, px: &mut Pixel4) {
        let s = f32x4::splat;
        match self {
            Self::Matrix { m, offset } => matrix_x4(m, offset, px),
            Self::Exponent { value, style } => {
                let pow = match style {
                    NegativeStyle::Clamp => pow_clamped_x4,
                    NegativeStyle::Mirror => pow_mirror_x4,
                    NegativeStyle::PassThru => pow_passthru_x4,
                };
                px.r = pow(px.r, s(value[0]));
                px.g = pow(px.g, s(value[1]));
                px.b = pow(px.b, s(value[2]));
                px.a = pow(px.a, s(value[3]));
            }
            Self::Range(p) => {
                let f = |v| {
                    let v = mul_add_x4(v, s(p.scale), s(p.offset));
                    if p.clamps { clamp_x4(v, p.lower, p.upper) } else { v }
                };
                px.r = f(px.r);
                px.g = f(px.g);
                px.b = f(px.b);
            }
            Self::Allocation { op, forward } => {
                let min = op.min as f32;
                let span = (op.max - op.min) as f32;
                let offset = op.offset as f32;
                let f = |v: f32x4| match (op.allocation, *forward) {
                    (Allocation::Uniform, true) => (v - s(min)) * s(1.0 / span),
                    (Allocation::Uniform, false) => mul_add_x4(v, s(span), s(min)),
                    (Allocation::Lg2, true) => {
                        let l = log2_x4((v + s(offset)).max(s(f32::MIN_POSITIVE)));
                        (l - s(min)) * s(1.0 / span)
                    }
                    (Allocation::Lg2, false) => exp2_x4(mul_add_x4(v, s(span), s(min))) - s(offset),
                };
                px.r = f(px.r);
                px.g = f(px.g);
                px.b = f(px.b);
            }
            Self::Log { params: p, forward } => {
                let f = |v: f32x4, c: usize| {
                    if *forward {
                        let arg = mul_add_x4(v, s(p.m[c]), s(p.b[c])).max(s(f32::MIN_POSITIVE));
                        mul_add_x4(log2_x4(arg), s(p.k[c]), s(p.kb[c]))
                    } else {
                        let lin = exp2_x4((v - s(p.kb[c])) / s(p.k[c]));
                        (lin - s(p.b[c])) / s(p.m[c])
                    }
                };
                px.r = f(px.r, 0);
                px.g = f(px.g, 1);
                px.b = f(px.b, 2);
            }
            _ => {
                let mut lanes = [[0.0_f32; 4]; 4];
                for (i, lane) in lanes.iter_mut().enumerate() {
                    *lane = px.lane(i);
                    self.apply_scalar(lane);
                }
                *px = Pixel4::from_lanes(lanes);
            }
        }
    }
}

/// Evaluator bound to one processor.
///
/// Cheap to clone. Shares dynamic slots with the processor it came from.
#[derive(Debug, Clone)]
pub struct CpuProcessor {
    ops: Arc<[CpuOp]>,
    dynamic: Arc<DynamicTable>,
    path: EvalPath,
}

impl CpuProcessor {
    pub(crate) fn new(ops: &[ProcessorOp], dynamic: Arc<DynamicTable>, path: EvalPath) -> Self {
        Self {
            ops: ops.iter().map(CpuOp::from_op).collect(),
            dynamic,
            path,
        }
    }

    /// Evaluation path.
    pub fn path(&self) -> EvalPath {
        self.path
    }

    /// True when evaluation leaves pixels unchanged.
    pub fn is_noop(&self) -> bool {
        self.ops.is_empty()
    }

    /// Applies to one RGB pixel.
    pub fn apply_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        let mut buf = [rgb];
        self.apply_rgb_buffer(&mut buf);
        buf[0]
    }

    /// Applies to one RGBA pixel.
    pub fn apply_rgba(&self, rgba: [f32; 4]) -> [f32; 4] {
        let mut buf = [rgba];
        self.apply_rgba_buffer(&mut buf);
        buf[0]
    }

    /// Applies in place to packed RGB pixels.
    ///
    /// Pixels go through an RGBA scratch block with alpha 1, so an alpha an
    /// op writes is seen by later ops exactly as in [`Self::apply_rgba_buffer`].
    pub fn apply_rgb_buffer(&self, pixels: &mut [[f32; 3]]) {
        if self.ops.is_empty() {
            return;
        }
        let mut scratch = [[0.0f32; 4]; RGB_SCRATCH];
        for chunk in pixels.chunks_mut(RGB_SCRATCH) {
            let block = &mut scratch[..chunk.len()];
            for (dst, src) in block.iter_mut().zip(chunk.iter()) {
                *dst = [src[0], src[1], src[2], 1.0];
            }
            self.apply_rgba_buffer(block);
            for (dst, src) in chunk.iter_mut().zip(block.iter()) {
                *dst = [src[0], src[1], src[2]];
            }
        }
    }

    /// Applies in place to packed RGBA pixels.
    pub fn apply_rgba_buffer(&self, pixels: &mut [[f32; 4]]) {
        for op in self.ops.iter() {
            let op = op.resolve(&self.dynamic);
            let tail = if self.path == EvalPath::Simd {
                let mut chunks = pixels.chunks_exact_mut(4);
                for chunk in &mut chunks {
                    let Ok(block) = <&mut [[f32; 4]; 4]>::try_from(chunk) else {
                        continue;
                    };
                    let mut lanes = Pixel4::load_rgba(block);
                    op.apply_x4(&mut lanes);
                    lanes.store_rgba(block);
                }
                chunks.into_remainder()
            } else {
                &mut pixels[..]
            };
            for px in tail.iter_mut() {
                op.apply_scalar(px);
            }
        }
    }

    /// Splits an RGBA buffer across the rayon pool.
    ///
    /// Each task reads dynamic values on its own, so a concurrent write may
    /// land between tasks.
    #[cfg(feature = "parallel")]
    pub fn par_apply_rgba_buffer(&self, pixels: &mut [[f32; 4]]) {
        use rayon::prelude::*;
        pixels
            .par_chunks_mut(PAR_CHUNK)
            .for_each(|chunk| self.apply_rgba_buffer(chunk));
    }

    /// RGB variant of [`Self::par_apply_rgba_buffer`].
    #[cfg(feature = "parallel")]
    pub fn par_apply_rgb_buffer(&self, pixels: &mut [[f32; 3]]) {
        use rayon::prelude::*;
        pixels
            .par_chunks_mut(PAR_CHUNK)
            .for_each(|chunk| self.apply_rgb_buffer(chunk));
    }
}
