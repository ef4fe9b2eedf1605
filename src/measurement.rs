//! Derived per-region measurements.
//!
//! Nothing here is stored. Physical area, density and count are recomputed
//! from the region's stored pixel area and the current calibration every
//! time, so recalibrating updates every figure without touching the regions.

use crate::count::estimate_count;
use crate::density::{DensitySource, resolve_density};
use crate::error::MeasureResult;
use crate::geometry::{CalibrationScale, physical_area};
use crate::model::{DensityTable, Point, Region, RegionId, Rgb};

/// Session-wide inputs that turn a pixel area into physical figures.
#[derive(Debug, Clone, Copy)]
pub struct MeasurementContext<'a> {
    /// Color to density table
    pub table: &'a DensityTable,
    /// Current calibration, if any
    pub scale: Option<CalibrationScale>,
    /// Empirical device correction multiplier
    pub correction_factor: f64,
    /// User-supplied count correction
    pub reference_factor: f64,
}

/// Physical figures for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMeasurement {
    /// Stored area in square image pixels
    pub area_pixels: f64,
    /// Area in square physical units (cm²)
    pub area_physical: f64,
    /// Density used for the count
    pub density: f64,
    /// Where the density came from
    pub density_source: DensitySource,
    /// Estimated count (grafts)
    pub count: u64,
}

/// Compute the derived figures for `region`.
pub fn derive_measurement(region: &Region, ctx: &MeasurementContext<'_>) -> MeasureResult<DerivedMeasurement> {
    let area_physical = physical_area(region.area_pixels(), ctx.scale, ctx.correction_factor)?;
    let (density, density_source) = resolve_density(region, ctx.table)?;
    let count = estimate_count(area_physical, density, ctx.reference_factor)?;

    Ok(DerivedMeasurement {
        area_pixels: region.area_pixels(),
        area_physical,
        density,
        density_source,
        count,
    })
}

/// What the display layer needs to draw and describe one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSummary {
    pub id: RegionId,
    pub boundary: Vec<Point>,
    pub color: Rgb,
    pub area_physical: f64,
    pub count: u64,
    /// Matched table label (or hex color), or "custom" for an override
    pub label: String,
}

impl RegionSummary {
    /// Build the summary for `region`.
    pub fn new(region: &Region, ctx: &MeasurementContext<'_>) -> MeasureResult<Self> {
        let m = derive_measurement(region, ctx)?;
        let label = match &m.density_source {
            DensitySource::Custom => format!("custom {}/cm²", m.density),
            DensitySource::Table(entry) => entry.display_name(),
        };

        Ok(Self {
            id: region.id(),
            boundary: region.boundary().to_vec(),
            color: region.color(),
            area_physical: m.area_physical,
            count: m.count,
            label,
        })
    }

    /// Single-line description, e.g. `4 points – 1.00 cm² – 40 grafts (matched to Red)`.
    pub fn describe(&self) -> String {
        format!(
            "{} points – {:.2} cm² – {} grafts (matched to {})",
            self.boundary.len(),
            self.area_physical,
            self.count,
            self.label
        )
    }
}
