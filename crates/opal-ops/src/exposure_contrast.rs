//! Exposure / contrast / gamma around a pivot.
//!
//! Three styles:
//! - Linear: scene-linear data, exposure is a gain in stops
//! - Video: video-encoded data; exposure and pivot go through the video OETF power
//! - Logarithmic: log-encoded data; exposure is an offset of `log_exposure_step` per stop
//!
//! Contrast and gamma multiply into a single power (or slope, for log).

/// `1 / 1.83`, approximating the BT.709 camera curve.
pub const VIDEO_OETF_POWER: f32 = 0.546_448_1;

/// Pivot floor.
pub const MIN_PIVOT: f32 = 0.001;

/// Combined contrast floor.
pub const MIN_CONTRAST: f32 = 0.001;

/// Default log exposure step (Cineon-style).
pub const LOG_EXPOSURE_STEP_DEFAULT: f64 = 0.088;

/// Default log mid-grey position.
pub const LOG_MIDGRAY_DEFAULT: f64 = 0.435;

/// Encoding the controls are interpreted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ExposureContrastStyle {
    /// Scene-linear.
    #[default]
    Linear,
    /// Video (gamma) encoded.
    Video,
    /// Log encoded.
    Logarithmic,
}

/// Parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureContrast {
    /// Style.
    pub style: ExposureContrastStyle,
    /// Exposure in stops.
    pub exposure: f64,
    /// Contrast, 1 for none.
    pub contrast: f64,
    /// Gamma, 1 for none.
    pub gamma: f64,
    /// Pivot the contrast rotates around.
    pub pivot: f64,
    /// Log units per stop (Logarithmic style).
    pub log_exposure_step: f64,
    /// Log value of mid-grey (Logarithmic style).
    pub log_midgray: f64,
}

impl Default for ExposureContrast {
    fn default() -> Self {
        Self {
            style: ExposureContrastStyle::Linear,
            exposure: 0.0,
            contrast: 1.0,
            gamma: 1.0,
            pivot: 0.18,
            log_exposure_step: LOG_EXPOSURE_STEP_DEFAULT,
            log_midgray: LOG_MIDGRAY_DEFAULT,
        }
    }
}

impl ExposureContrast {
    /// True when exposure is 0 and contrast and gamma are 1.
    pub fn is_identity(&self) -> bool {
        self.exposure == 0.0 && self.contrast == 1.0 && self.gamma == 1.0
    }

    fn combined_contrast(&self) -> f32 {
        ((self.contrast * self.gamma) as f32).max(MIN_CONTRAST)
    }

    /// Applies forward or inverse.
    #[inline]
    pub fn apply(&self, rgb: [f32; 3], forward: bool) -> [f32; 3] {
        match self.style {
            ExposureContrastStyle::Linear => self.apply_power(rgb, forward, 1.0),
            ExposureContrastStyle::Video => self.apply_power(rgb, forward, VIDEO_OETF_POWER),
            ExposureContrastStyle::Logarithmic => self.apply_log(rgb, forward),
        }
    }

    /// Linear and video: `out = pivot * (in * gain / pivot) ^ contrast`, with
    /// gain and pivot raised to `oetf` first.
    fn apply_power(&self, rgb: [f32; 3], forward: bool, oetf: f32) -> [f32; 3] {
        let contrast = self.combined_contrast();
        let gain = (self.exposure as f32).exp2().powf(oetf);
        let pivot = (self.pivot as f32).max(MIN_PIVOT).powf(oetf);

        if forward {
            if contrast == 1.0 {
                return rgb.map(|v| v * gain);
            }
            let k = gain / pivot;
            rgb.map(|v| (v * k).max(0.0).powf(contrast) * pivot)
        } else {
            if contrast == 1.0 {
                return rgb.map(|v| v / gain);
            }
            let inv_contrast = 1.0 / contrast;
            let k = pivot / gain;
            rgb.map(|v| (v / pivot).max(0.0).powf(inv_contrast) * k)
        }
    }

    /// Log: `out = (in + exposure * step - log_pivot) * contrast + log_pivot`.
    fn apply_log(&self, rgb: [f32; 3], forward: bool) -> [f32; 3] {
        let pivot = (self.pivot as f32).max(MIN_PIVOT);
        let step = self.log_exposure_step as f32;
        let log_pivot = ((pivot / 0.18).log2() * step + self.log_midgray as f32).max(0.0);
        let contrast = self.combined_contrast();
        let shift = self.exposure as f32 * step;

        if forward {
            let offset = (shift - log_pivot) * contrast + log_pivot;
            rgb.map(|v| v * contrast + offset)
        } else {
            let inv = 1.0 / contrast;
            let offset = log_pivot - log_pivot * inv - shift;
            rgb.map(|v| v * inv + offset)
        }
    }
}
