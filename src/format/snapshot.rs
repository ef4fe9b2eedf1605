//! Session snapshot data structures.
//!
//! A snapshot is a flat, versionless record of everything needed to
//! reproduce a session's measurements: the regions with their stored pixel
//! areas, the density table, the calibration scale and the two correction
//! factors. Loading never recomputes areas, so derived figures come out
//! identical after a round trip.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::FormatError;
use crate::constants::MIN_REGION_POINTS;
use crate::geometry::CalibrationScale;
use crate::model::{DensityTable, ImageInfo, Point, Region, RegionId, RegionKind, Rgb, distinct_point_count};

fn default_factor() -> f64 {
    1.0
}

/// Complete session state for save/load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Regions in creation order.
    pub regions: Vec<RegionEntry>,

    /// Color to density table.
    pub color_density_table: DensityTable,

    /// Pixels per cm, or null before calibration.
    pub calibration_scale: Option<CalibrationScale>,

    /// Count correction multiplier.
    #[serde(default = "default_factor")]
    pub reference_factor: f64,

    /// Empirical pixel-area correction multiplier.
    #[serde(default = "default_factor")]
    pub device_correction: f64,

    /// Source image, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInfo>,
}

impl SessionSnapshot {
    /// Create an empty snapshot with the given table.
    pub fn new(color_density_table: DensityTable) -> Self {
        Self {
            regions: Vec::new(),
            color_density_table,
            calibration_scale: None,
            reference_factor: default_factor(),
            device_correction: default_factor(),
            image: None,
        }
    }

    /// Check the snapshot for content that a session could not have produced.
    pub fn validate(&self) -> Result<(), FormatError> {
        let mut ids = HashSet::new();
        for entry in &self.regions {
            if !ids.insert(entry.id) {
                return Err(FormatError::invalid_snapshot(format!(
                    "duplicate region id {}",
                    entry.id
                )));
            }
            entry.validate()?;
        }

        if !(self.reference_factor.is_finite() && self.reference_factor >= 0.0) {
            return Err(FormatError::invalid_snapshot(format!(
                "reference_factor is {}",
                self.reference_factor
            )));
        }
        if !(self.device_correction.is_finite() && self.device_correction > 0.0) {
            return Err(FormatError::invalid_snapshot(format!(
                "device_correction is {}",
                self.device_correction
            )));
        }
        Ok(())
    }

    /// Total number of boundary points across all regions.
    pub fn total_points(&self) -> usize {
        self.regions.iter().map(|r| r.boundary.len()).sum()
    }
}

/// A region as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionEntry {
    /// Region id, unique within the snapshot.
    pub id: RegionId,

    /// Fill color.
    pub color: Rgb,

    /// How the region was drawn.
    #[serde(default)]
    pub kind: RegionKind,

    /// Boundary vertices in image pixels.
    pub boundary: Vec<(f64, f64)>,

    /// Stored pixel area.
    pub area_pixels: f64,

    /// Per-region density override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_density: Option<f64>,
}

impl RegionEntry {
    /// Create from an internal Region.
    pub fn from_region(region: &Region) -> Self {
        Self {
            id: region.id(),
            color: region.color(),
            kind: region.kind(),
            boundary: region.boundary().iter().map(|p| (p.x, p.y)).collect(),
            area_pixels: region.area_pixels(),
            custom_density: region.custom_density(),
        }
    }

    fn validate(&self) -> Result<(), FormatError> {
        let points: Vec<Point> = self.boundary.iter().copied().map(Point::from).collect();
        if distinct_point_count(&points) < MIN_REGION_POINTS {
            return Err(FormatError::invalid_snapshot(format!(
                "region {} has fewer than {} distinct points",
                self.id, MIN_REGION_POINTS
            )));
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(FormatError::invalid_snapshot(format!(
                "region {} has non-finite coordinates",
                self.id
            )));
        }
        if !self.area_pixels.is_finite() || self.area_pixels < 0.0 {
            return Err(FormatError::invalid_snapshot(format!(
                "region {} has invalid area {}",
                self.id, self.area_pixels
            )));
        }
        Ok(())
    }

    /// Convert to an internal Region, keeping the stored area.
    pub fn to_region(&self) -> Result<Region, FormatError> {
        self.validate()?;
        let boundary = self.boundary.iter().copied().map(Point::from).collect();
        let mut region = Region::new(self.id, self.color, self.kind, boundary, self.area_pixels);
        region
            .set_custom_density(self.custom_density)
            .map_err(|e| FormatError::invalid_snapshot(format!("region {}: {e}", self.id)))?;
        Ok(region)
    }
}
