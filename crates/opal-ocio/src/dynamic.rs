//! Dynamic properties: op parameters that stay settable after compilation.
//!
//! Compilation gives every dynamic parameter a slot in a [`DynamicTable`]
//! shared by the [`crate::Processor`] and all CPU processors made from it.
//! Ops hold only a [`DynamicHandle`]. Each `apply*` call reads the slots it
//! needs once, so a whole buffer sees one consistent set of values.
//!
//! # Example
//!
//! ```
//! use opal_ocio::{Config, DynamicPropertyKind, ExposureContrastTransform, Transform, TransformDirection};
//!
//! let ec = Transform::ExposureContrast(ExposureContrastTransform {
//!     dynamic_exposure: true,
//!     ..Default::default()
//! });
//! let proc = Config::new("dyn").processor_from_transform(&ec, TransformDirection::Forward)?;
//! let cpu = proc.default_cpu_processor();
//!
//! let exposure = proc.dynamic_property(DynamicPropertyKind::Exposure)?;
//! exposure.set_f64(1.0)?;
//! assert!((cpu.apply_rgb([0.25; 3])[0] - 0.5).abs() < 1e-6);
//! # Ok::<(), opal_ocio::OcioError>(())
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use opal_ops::grading_rgb_curve::{GradingRgbCurvePreRender, GradingRgbCurves};

use crate::error::{OcioError, OcioResult};

/// What a dynamic slot controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DynamicPropertyKind {
    /// Exposure in stops.
    Exposure,
    /// Contrast.
    Contrast,
    /// Gamma.
    Gamma,
    /// A full RGB curve set.
    GradingRgbCurve,
}

impl DynamicPropertyKind {
    /// Lower-case name for messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Exposure => "exposure",
            Self::Contrast => "contrast",
            Self::Gamma => "gamma",
            Self::GradingRgbCurve => "grading_rgb_curve",
        }
    }
}

/// Index of a slot in a [`DynamicTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DynamicHandle(pub(crate) usize);

/// Curves plus their fitted splines.
#[derive(Debug, Clone)]
pub(crate) struct CurveState {
    pub(crate) curves: GradingRgbCurves,
    pub(crate) prerender: Arc<GradingRgbCurvePreRender>,
}

impl CurveState {
    pub(crate) fn new(curves: GradingRgbCurves) -> Self {
        let prerender = Arc::new(GradingRgbCurvePreRender::new(&curves));
        Self { curves, prerender }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum DynamicValue {
    Double(f64),
    Curves(CurveState),
}

#[derive(Debug)]
struct Slot {
    kind: DynamicPropertyKind,
    value: RwLock<DynamicValue>,
}

/// Side table of dynamic slots.
///
/// Filled while compiling, then frozen behind an `Arc`; only slot values
/// change afterwards.
#[derive(Debug, Default)]
pub struct DynamicTable {
    slots: Vec<Slot>,
}

impl DynamicTable {
    pub(crate) fn push(&mut self, kind: DynamicPropertyKind, value: DynamicValue) -> DynamicHandle {
        self.slots.push(Slot {
            kind,
            value: RwLock::new(value),
        });
        DynamicHandle(self.slots.len() - 1)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when nothing is dynamic.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn first_of(&self, kind: DynamicPropertyKind) -> Option<DynamicHandle> {
        self.slots
            .iter()
            .position(|s| s.kind == kind)
            .map(DynamicHandle)
    }

    fn read(&self, handle: DynamicHandle) -> DynamicValue {
        self.slots[handle.0]
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write(&self, handle: DynamicHandle, value: DynamicValue) {
        *self.slots[handle.0]
            .value
            .write()
            .unwrap_or_else(PoisonError::into_inner) = value;
    }

    /// Scalar value of a slot; curve slots read as 0.
    pub(crate) fn read_f64(&self, handle: DynamicHandle) -> f64 {
        match self.read(handle) {
            DynamicValue::Double(v) => v,
            DynamicValue::Curves(_) => 0.0,
        }
    }

    /// Fitted curves of a slot; scalar slots read as a bypass.
    pub(crate) fn read_prerender(&self, handle: DynamicHandle) -> Arc<GradingRgbCurvePreRender> {
        match self.read(handle) {
            DynamicValue::Curves(state) => state.prerender,
            DynamicValue::Double(_) => Arc::new(GradingRgbCurvePreRender::default()),
        }
    }
}

/// Accessor for one dynamic slot of a processor.
///
/// Writes are visible to every CPU processor built from the same
/// [`crate::Processor`] on their next `apply*` call.
#[derive(Debug, Clone)]
pub struct DynamicProperty {
    table: Arc<DynamicTable>,
    handle: DynamicHandle,
    kind: DynamicPropertyKind,
}

impl DynamicProperty {
    pub(crate) fn new(table: Arc<DynamicTable>, handle: DynamicHandle) -> Self {
        let kind = table.slots[handle.0].kind;
        Self {
            table,
            handle,
            kind,
        }
    }

    /// Kind of the slot.
    pub fn kind(&self) -> DynamicPropertyKind {
        self.kind
    }

    fn expect_kind(&self, wants_curves: bool) -> OcioResult<()> {
        let is_curves = self.kind == DynamicPropertyKind::GradingRgbCurve;
        if is_curves != wants_curves {
            return Err(OcioError::invalid_parameter(
                "dynamic_property",
                format!(
                    "{} property does not hold {}",
                    self.kind.name(),
                    if wants_curves { "curves" } else { "a number" }
                ),
            ));
        }
        Ok(())
    }

    /// Sets exposure, contrast or gamma.
    pub fn set_f64(&self, value: f64) -> OcioResult<()> {
        self.expect_kind(false)?;
        if !value.is_finite() {
            return Err(OcioError::invalid_parameter(
                "dynamic_property",
                format!("{} must be finite, got {value}", self.kind.name()),
            ));
        }
        self.table.write(self.handle, DynamicValue::Double(value));
        Ok(())
    }

    /// Current exposure, contrast or gamma.
    pub fn value_f64(&self) -> OcioResult<f64> {
        self.expect_kind(false)?;
        Ok(self.table.read_f64(self.handle))
    }

    /// Replaces the curve set; the splines are refitted here, not per pixel.
    pub fn set_grading_rgb_curves(&self, curves: &GradingRgbCurves) -> OcioResult<()> {
        self.expect_kind(true)?;
        self.table
            .write(self.handle, DynamicValue::Curves(CurveState::new(curves.clone())));
        Ok(())
    }

    /// Current curve set.
    pub fn grading_rgb_curves(&self) -> OcioResult<GradingRgbCurves> {
        self.expect_kind(true)?;
        match self.table.read(self.handle) {
            DynamicValue::Curves(state) => Ok(state.curves),
            DynamicValue::Double(_) => Err(OcioError::invalid_parameter(
                "dynamic_property",
                "curve slot holds a number",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> (Arc<DynamicTable>, DynamicHandle, DynamicHandle) {
        let mut t = DynamicTable::default();
        let e = t.push(DynamicPropertyKind::Exposure, DynamicValue::Double(0.0));
        let c = t.push(
            DynamicPropertyKind::GradingRgbCurve,
            DynamicValue::Curves(CurveState::new(GradingRgbCurves::default())),
        );
        (Arc::new(t), e, c)
    }

    #[test]
    fn scalar_slot_roundtrip() {
        let (t, e, _) = table();
        let prop = DynamicProperty::new(t.clone(), e);
        assert_eq!(prop.kind(), DynamicPropertyKind::Exposure);
        prop.set_f64(1.5).unwrap();
        assert_eq!(prop.value_f64().unwrap(), 1.5);
        assert_eq!(t.read_f64(e), 1.5);
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let (t, e, c) = table();
        let exposure = DynamicProperty::new(t.clone(), e);
        assert!(exposure.grading_rgb_curves().is_err());

        let curves = DynamicProperty::new(t, c);
        let err = curves.set_f64(2.0).unwrap_err();
        assert!(
            matches!(err, OcioError::InvalidParameter { .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let (t, e, _) = table();
        assert!(DynamicProperty::new(t, e).set_f64(f64::NAN).is_err());
    }

    #[test]
    fn first_of_finds_slot() {
        let (t, e, c) = table();
        assert_eq!(t.first_of(DynamicPropertyKind::Exposure), Some(e));
        assert_eq!(t.first_of(DynamicPropertyKind::GradingRgbCurve), Some(c));
        assert_eq!(t.first_of(DynamicPropertyKind::Gamma), None);
        assert!(t.read_prerender(c).is_bypass());
    }
}
