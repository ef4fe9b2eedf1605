//! Pixel-to-physical scale calibration.
//!
//! Two strategies exist:
//!
//! - **Manual reference**: the user draws a segment over an object of known
//!   length (1 cm by default). The scale is the segment's pixel length divided
//!   by that physical length.
//! - **Device density**: the scale is derived from the display's pixel ratio
//!   at a 96 DPI baseline. This needs no interaction but describes the
//!   screen, not the photograph, so it is only a rough stand-in for a real
//!   reference.
//!
//! Recalibrating never touches stored region pixel areas; it only changes the
//! physical values derived from them afterwards.

use serde::{Deserialize, Serialize};

use crate::constants::{BASELINE_DPI, CM_PER_INCH, DEFAULT_REFERENCE_LENGTH_CM, MIN_REFERENCE_DISTANCE};
use crate::error::{MeasureError, MeasureResult, ensure_positive};
use crate::model::Point;

/// Image pixels per physical unit (centimeter). Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct CalibrationScale(f64);

impl CalibrationScale {
    /// Wrap a raw pixels-per-unit value.
    pub fn new(pixels_per_unit: f64) -> MeasureResult<Self> {
        ensure_positive("calibration scale", pixels_per_unit).map(Self)
    }

    /// Pixels per physical unit.
    pub fn pixels_per_unit(&self) -> f64 {
        self.0
    }

    /// Convert a pixel length to physical units.
    pub fn to_physical_length(&self, pixels: f64) -> f64 {
        pixels / self.0
    }

    /// Convert a pixel area to square physical units.
    pub fn to_physical_area(&self, area_pixels: f64) -> f64 {
        area_pixels / (self.0 * self.0)
    }
}

impl TryFrom<f64> for CalibrationScale {
    type Error = MeasureError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CalibrationScale> for f64 {
    fn from(scale: CalibrationScale) -> Self {
        scale.0
    }
}

/// How the session obtains its calibration scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CalibrationStrategy {
    /// Wait for the user to draw a reference segment of this length (cm).
    Manual {
        #[serde(default = "default_reference_length")]
        reference_length_cm: f64,
    },
    /// Compute once from the display's device pixel ratio.
    DeviceDensity {
        #[serde(default = "default_device_pixel_ratio")]
        device_pixel_ratio: f64,
    },
}

fn default_reference_length() -> f64 {
    DEFAULT_REFERENCE_LENGTH_CM
}

fn default_device_pixel_ratio() -> f64 {
    1.0
}

impl Default for CalibrationStrategy {
    fn default() -> Self {
        CalibrationStrategy::Manual {
            reference_length_cm: DEFAULT_REFERENCE_LENGTH_CM,
        }
    }
}

impl CalibrationStrategy {
    /// Get the display name for this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            CalibrationStrategy::Manual { .. } => "Manual reference",
            CalibrationStrategy::DeviceDensity { .. } => "Device density",
        }
    }

    /// Scale available before any user interaction, if the strategy provides one.
    pub fn initial_scale(&self) -> MeasureResult<Option<CalibrationScale>> {
        match self {
            CalibrationStrategy::Manual { .. } => Ok(None),
            CalibrationStrategy::DeviceDensity { device_pixel_ratio } => {
                calibrate_device(*device_pixel_ratio).map(Some)
            }
        }
    }

    /// Physical length a drawn reference segment stands for.
    pub fn reference_length(&self) -> f64 {
        match self {
            CalibrationStrategy::Manual {
                reference_length_cm,
            } => *reference_length_cm,
            CalibrationStrategy::DeviceDensity { .. } => DEFAULT_REFERENCE_LENGTH_CM,
        }
    }
}

/// Scale from a two-point reference segment of known physical length.
pub fn calibrate_reference(p1: Point, p2: Point, physical_length: f64) -> MeasureResult<CalibrationScale> {
    let physical_length = ensure_positive("reference length", physical_length)?;
    let distance = p1.distance_to(&p2);
    if !distance.is_finite() || distance < MIN_REFERENCE_DISTANCE {
        return Err(MeasureError::DegenerateReference);
    }

    let scale = CalibrationScale::new(distance / physical_length)?;
    log::info!(
        "Calibrated from reference: {:.2} px over {} units = {:.4} px/unit",
        distance,
        physical_length,
        scale.pixels_per_unit()
    );
    Ok(scale)
}

/// Scale from a freehand reference stroke; only its first and last points count.
pub fn calibrate_stroke(points: &[Point], physical_length: f64) -> MeasureResult<CalibrationScale> {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() >= 2 => {
            calibrate_reference(*first, *last, physical_length)
        }
        _ => Err(MeasureError::InsufficientPoints {
            found: points.len(),
            required: 2,
        }),
    }
}

/// Scale from display density: `device_pixel_ratio * 96 / 2.54` pixels per cm.
pub fn calibrate_device(device_pixel_ratio: f64) -> MeasureResult<CalibrationScale> {
    let ratio = ensure_positive("device pixel ratio", device_pixel_ratio)?;
    let scale = CalibrationScale::new(ratio * BASELINE_DPI / CM_PER_INCH)?;
    log::info!(
        "Calibrated from device density (ratio {}): {:.4} px/cm",
        ratio,
        scale.pixels_per_unit()
    );
    Ok(scale)
}
