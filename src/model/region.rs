//! Measured region data model.

use serde::{Deserialize, Serialize};

use super::color::Rgb;
use super::point::Point;
use crate::error::{MeasureResult, ensure_positive};

/// Unique identifier for a region within a session.
pub type RegionId = u64;

/// How a region boundary was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    /// Freehand stroke, closed back to its first point.
    #[default]
    Freehand,
    /// Axis-aligned square dragged from one corner.
    Square,
}

impl RegionKind {
    /// Get the display name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            RegionKind::Freehand => "Freehand",
            RegionKind::Square => "Square",
        }
    }
}

/// A closed region drawn over the image.
///
/// The boundary and pixel area are fixed at creation. Only the custom density
/// override may change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    id: RegionId,
    color: Rgb,
    kind: RegionKind,
    boundary: Vec<Point>,
    area_pixels: f64,
    custom_density: Option<f64>,
}

impl Region {
    /// Create a region. `area_pixels` must already be computed from `boundary`.
    pub(crate) fn new(
        id: RegionId,
        color: Rgb,
        kind: RegionKind,
        boundary: Vec<Point>,
        area_pixels: f64,
    ) -> Self {
        debug_assert!(area_pixels >= 0.0);
        Self {
            id,
            color,
            kind,
            boundary,
            area_pixels,
            custom_density: None,
        }
    }

    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn kind(&self) -> RegionKind {
        self.kind
    }

    /// Boundary points in image-pixel space, in drawing order.
    pub fn boundary(&self) -> &[Point] {
        &self.boundary
    }

    /// Enclosed area in square image pixels, as computed at creation.
    pub fn area_pixels(&self) -> f64 {
        self.area_pixels
    }

    /// Per-region density override (count per cm²), if set.
    pub fn custom_density(&self) -> Option<f64> {
        self.custom_density
    }

    /// Set or clear the density override. Overrides must be positive and finite.
    pub fn set_custom_density(&mut self, density: Option<f64>) -> MeasureResult<()> {
        self.custom_density = match density {
            Some(d) => Some(ensure_positive("custom density", d)?),
            None => None,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> Region {
        Region::new(
            7,
            Rgb::new(255, 0, 0),
            RegionKind::Freehand,
            vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(0.0, 4.0),
            ],
            8.0,
        )
    }

    #[test]
    fn test_custom_density() {
        let mut r = region();
        assert_eq!(r.custom_density(), None);

        r.set_custom_density(Some(12.5)).unwrap();
        assert_eq!(r.custom_density(), Some(12.5));

        r.set_custom_density(None).unwrap();
        assert_eq!(r.custom_density(), None);
    }

    #[test]
    fn test_invalid_custom_density_keeps_previous() {
        let mut r = region();
        r.set_custom_density(Some(3.0)).unwrap();

        assert!(r.set_custom_density(Some(0.0)).is_err());
        assert!(r.set_custom_density(Some(-2.0)).is_err());
        assert!(r.set_custom_density(Some(f64::NAN)).is_err());
        assert_eq!(r.custom_density(), Some(3.0));
    }

    #[test]
    fn test_accessors() {
        let r = region();
        assert_eq!(r.id(), 7);
        assert_eq!(r.kind().name(), "Freehand");
        assert_eq!(r.boundary().len(), 3);
        assert_eq!(r.area_pixels(), 8.0);
    }
}
