//! Per-pixel application, including the lin/log wrap for linear data.

use super::eval::{eval_curve, eval_curve_rev};
use super::prerender::GradingRgbCurvePreRender;
use super::types::RgbCurveChannel;

/// Encoding the curves are authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum GradingStyle {
    /// Log-encoded data; curves apply directly.
    #[default]
    Log,
    /// Scene-linear data; curves apply in a log domain.
    Linear,
    /// Video-encoded data; curves apply directly.
    Video,
}

#[allow(clippy::excessive_precision)]
mod linlog {
    pub const XBRK: f32 = 0.0041318374739483946;
    pub const SHIFT: f32 = -0.000157849851665374;
    pub const M: f32 = 1.0 / (0.18 + SHIFT);
    pub const GAIN: f32 = 363.034608563;
    pub const OFFS: f32 = -7.0;
    pub const YBRK: f32 = -5.5;
    /// `1 / ln 2`
    pub const BASE2: f32 = std::f32::consts::LOG2_E;
}

/// Scene-linear to the curve log domain; mid-grey lands on 0.
#[inline]
pub fn lin_to_log(x: f32) -> f32 {
    if x < linlog::XBRK {
        x * linlog::GAIN + linlog::OFFS
    } else {
        linlog::BASE2 * ((x + linlog::SHIFT) * linlog::M).ln()
    }
}

/// Inverse of [`lin_to_log`].
#[inline]
pub fn log_to_lin(x: f32) -> f32 {
    if x < linlog::YBRK {
        (x - linlog::OFFS) / linlog::GAIN
    } else {
        x.exp2() * (0.18 + linlog::SHIFT) - linlog::SHIFT
    }
}

/// Red, green and blue curves, then master on all three.
#[inline]
pub fn apply_rgb_curves_fwd(pr: &GradingRgbCurvePreRender, rgb: &mut [f32; 3]) {
    rgb[0] = eval_curve(pr.get(RgbCurveChannel::Red), rgb[0]);
    rgb[1] = eval_curve(pr.get(RgbCurveChannel::Green), rgb[1]);
    rgb[2] = eval_curve(pr.get(RgbCurveChannel::Blue), rgb[2]);

    let master = pr.get(RgbCurveChannel::Master);
    for v in rgb.iter_mut() {
        *v = eval_curve(master, *v);
    }
}

/// Master inverse first, then the per-channel inverses.
#[inline]
pub fn apply_rgb_curves_rev(pr: &GradingRgbCurvePreRender, rgb: &mut [f32; 3]) {
    let master = pr.get(RgbCurveChannel::Master);
    for v in rgb.iter_mut() {
        *v = eval_curve_rev(master, *v);
    }

    rgb[0] = eval_curve_rev(pr.get(RgbCurveChannel::Red), rgb[0]);
    rgb[1] = eval_curve_rev(pr.get(RgbCurveChannel::Green), rgb[1]);
    rgb[2] = eval_curve_rev(pr.get(RgbCurveChannel::Blue), rgb[2]);
}

/// Applies the curves to one pixel.
///
/// `Linear` wraps the curves in [`lin_to_log`] / [`log_to_lin`] unless
/// `bypass_lin_to_log` is set.
pub fn apply_grading_rgb_curve(
    style: GradingStyle,
    bypass_lin_to_log: bool,
    pr: &GradingRgbCurvePreRender,
    forward: bool,
    rgb: &mut [f32; 3],
) {
    if pr.is_bypass() {
        return;
    }
    let linlog = style == GradingStyle::Linear && !bypass_lin_to_log;

    if linlog {
        *rgb = rgb.map(lin_to_log);
    }
    if forward {
        apply_rgb_curves_fwd(pr, rgb);
    } else {
        apply_rgb_curves_rev(pr, rgb);
    }
    if linlog {
        *rgb = rgb.map(log_to_lin);
    }
}
