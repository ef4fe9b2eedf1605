//! Region area estimation.
//!
//! Two interchangeable estimators turn a closed boundary into an area in
//! square image pixels:
//!
//! - [`ShoelaceEstimator`]: the signed polygon area formula. O(n) in the
//!   number of points and exact for simple polygons. For a self-intersecting
//!   boundary it returns the absolute value of the signed sum, which is not
//!   the enclosed area; lobes wound in opposite directions cancel.
//! - [`FillCountEstimator`]: rasterizes the boundary into an offscreen buffer
//!   the size of the image and counts covered pixels. Cost scales with image
//!   size, and self-intersecting or concave strokes are handled according to
//!   the configured [`FillRule`].
//!
//! Both agree closely on convex shapes. The buffer-based estimator clips the
//! boundary to the image, the shoelace formula does not.

use std::fmt;

use serde::{Deserialize, Serialize};
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Transform};

use super::calibration::CalibrationScale;
use super::coordinate::NativeDimensions;
use crate::constants::{DESKTOP_CORRECTION_FACTOR, MIN_REGION_POINTS, MOBILE_CORRECTION_FACTOR};
use crate::error::{MeasureError, MeasureResult, ensure_non_negative, ensure_positive};
use crate::model::{Point, distinct_point_count};

/// Selects the area estimation algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaAlgorithm {
    /// Shoelace formula on the boundary vertices
    #[default]
    Shoelace,
    /// Rasterize and count filled pixels
    FillCount,
}

impl AreaAlgorithm {
    /// Get the display name for this algorithm.
    pub fn name(&self) -> &'static str {
        match self {
            AreaAlgorithm::Shoelace => "Shoelace",
            AreaAlgorithm::FillCount => "Fill count",
        }
    }
}

/// Which pixels count as inside a self-overlapping boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    /// Inside if the winding number is non-zero (HTML canvas default)
    #[default]
    NonZero,
    /// Inside if a ray crosses the boundary an odd number of times
    EvenOdd,
}

impl From<FillRule> for tiny_skia::FillRule {
    fn from(rule: FillRule) -> Self {
        match rule {
            FillRule::NonZero => tiny_skia::FillRule::Winding,
            FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        }
    }
}

/// Empirical multiplier applied when converting pixel area to physical area.
///
/// The mobile and desktop presets were tuned by hand for one deployment and
/// are not physical constants. Treat them as per-deployment calibration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCorrection {
    /// No correction (factor 1)
    #[default]
    None,
    /// Phone/tablet preset (factor 16)
    Mobile,
    /// Desktop preset (factor 1/2.64)
    Desktop,
    /// Explicit factor
    Custom(f64),
}

impl DeviceCorrection {
    /// The dimensionless multiplier.
    pub fn factor(&self) -> f64 {
        match self {
            DeviceCorrection::None => 1.0,
            DeviceCorrection::Mobile => MOBILE_CORRECTION_FACTOR,
            DeviceCorrection::Desktop => DESKTOP_CORRECTION_FACTOR,
            DeviceCorrection::Custom(factor) => *factor,
        }
    }

    /// Recover a correction from its stored factor, recognizing the presets.
    pub fn from_factor(factor: f64) -> Self {
        if factor == 1.0 {
            DeviceCorrection::None
        } else if factor == MOBILE_CORRECTION_FACTOR {
            DeviceCorrection::Mobile
        } else if factor == DESKTOP_CORRECTION_FACTOR {
            DeviceCorrection::Desktop
        } else {
            DeviceCorrection::Custom(factor)
        }
    }
}

/// Computes the area of a closed boundary in square image pixels.
pub trait AreaEstimator: fmt::Debug {
    /// Which algorithm this estimator implements.
    fn algorithm(&self) -> AreaAlgorithm;

    /// Area enclosed by `boundary`, closing it back to the first point.
    ///
    /// Fails with [`MeasureError::InsufficientPoints`] for fewer than three
    /// distinct points.
    fn estimate_area_pixels(&mut self, boundary: &[Point]) -> MeasureResult<f64>;
}

fn ensure_region_points(boundary: &[Point]) -> MeasureResult<()> {
    if let Some(bad) = boundary
        .iter()
        .flat_map(|p| [p.x, p.y])
        .find(|v| !v.is_finite())
    {
        return Err(MeasureError::invalid_parameter("boundary coordinate", bad));
    }
    let distinct = distinct_point_count(boundary);
    if distinct < MIN_REGION_POINTS {
        return Err(MeasureError::insufficient_points(distinct));
    }
    Ok(())
}

/// Twice the signed area; positive for counter-clockwise in a y-up frame.
fn signed_double_area(boundary: &[Point]) -> f64 {
    let n = boundary.len();
    (0..n)
        .map(|i| {
            let curr = boundary[i];
            let next = boundary[(i + 1) % n];
            curr.x * next.y - next.x * curr.y
        })
        .sum()
}

/// Shoelace area of a closed boundary.
pub fn shoelace_area(boundary: &[Point]) -> MeasureResult<f64> {
    ensure_region_points(boundary)?;
    // Finite but huge coordinates can still overflow the sum
    ensure_non_negative("region area", signed_double_area(boundary).abs() / 2.0)
}

/// Estimator using the shoelace formula.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShoelaceEstimator;

impl AreaEstimator for ShoelaceEstimator {
    fn algorithm(&self) -> AreaAlgorithm {
        AreaAlgorithm::Shoelace
    }

    fn estimate_area_pixels(&mut self, boundary: &[Point]) -> MeasureResult<f64> {
        shoelace_area(boundary)
    }
}

/// Estimator that rasterizes into an owned, image-sized buffer.
///
/// The buffer is cleared before every estimate. One instance serves one
/// computation at a time; concurrent callers need their own instance.
pub struct FillCountEstimator {
    buffer: Pixmap,
    fill_rule: FillRule,
}

impl FillCountEstimator {
    /// Allocate a scratch buffer matching the image dimensions.
    pub fn new(dimensions: NativeDimensions, fill_rule: FillRule) -> MeasureResult<Self> {
        let buffer = Pixmap::new(dimensions.width, dimensions.height).ok_or(
            MeasureError::InvalidImageDimensions {
                width: dimensions.width,
                height: dimensions.height,
            },
        )?;
        log::debug!(
            "Allocated {}x{} fill-count buffer",
            dimensions.width,
            dimensions.height
        );
        Ok(Self { buffer, fill_rule })
    }

    fn build_path(boundary: &[Point]) -> Option<tiny_skia::Path> {
        let (first, rest) = boundary.split_first()?;
        let mut pb = PathBuilder::new();
        pb.move_to(first.x as f32, first.y as f32);
        for p in rest {
            pb.line_to(p.x as f32, p.y as f32);
        }
        pb.close();
        pb.finish()
    }
}

impl AreaEstimator for FillCountEstimator {
    fn algorithm(&self) -> AreaAlgorithm {
        AreaAlgorithm::FillCount
    }

    fn estimate_area_pixels(&mut self, boundary: &[Point]) -> MeasureResult<f64> {
        ensure_region_points(boundary)?;

        self.buffer.fill(Color::TRANSPARENT);

        // Collinear strokes produce no path; they enclose nothing
        let Some(path) = Self::build_path(boundary) else {
            return Ok(0.0);
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, 255);
        paint.anti_alias = false;
        self.buffer.fill_path(
            &path,
            &paint,
            self.fill_rule.into(),
            Transform::identity(),
            None,
        );

        let filled = self
            .buffer
            .pixels()
            .iter()
            .filter(|px| px.alpha() > 0)
            .count();
        log::trace!("Fill-count: {} pixels covered", filled);
        Ok(filled as f64)
    }
}

impl fmt::Debug for FillCountEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillCountEstimator")
            .field("width", &self.buffer.width())
            .field("height", &self.buffer.height())
            .field("fill_rule", &self.fill_rule)
            .finish()
    }
}

/// Build the estimator for `algorithm`.
///
/// The fill-count estimator needs the image dimensions to size its buffer.
pub fn create_estimator(
    algorithm: AreaAlgorithm,
    fill_rule: FillRule,
    dimensions: Option<NativeDimensions>,
) -> MeasureResult<Box<dyn AreaEstimator>> {
    match algorithm {
        AreaAlgorithm::Shoelace => Ok(Box::new(ShoelaceEstimator)),
        AreaAlgorithm::FillCount => {
            let dims = dimensions.ok_or(MeasureError::MissingImageDimensions)?;
            Ok(Box::new(FillCountEstimator::new(dims, fill_rule)?))
        }
    }
}

/// Convert a pixel area to physical units: `area * correction / scale²`.
pub fn physical_area(
    area_pixels: f64,
    scale: Option<CalibrationScale>,
    correction_factor: f64,
) -> MeasureResult<f64> {
    let scale = scale.ok_or(MeasureError::MissingCalibration)?;
    let correction = ensure_positive("device correction factor", correction_factor)?;
    Ok(scale.to_physical_area(area_pixels * correction))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().copied().map(Point::from).collect()
    }

    fn relative_diff(a: f64, b: f64) -> f64 {
        (a - b).abs() / a.abs().max(b.abs())
    }

    fn fill_estimator(w: u32, h: u32) -> FillCountEstimator {
        FillCountEstimator::new(NativeDimensions::new(w, h), FillRule::NonZero).unwrap()
    }

    /// Regular polygon approximating a circle.
    fn circle(cx: f64, cy: f64, r: f64, n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let t = i as f64 / n as f64 * std::f64::consts::TAU;
                Point::new(cx + r * t.cos(), cy + r * t.sin())
            })
            .collect()
    }

    #[test]
    fn test_shoelace_square_is_exact() {
        let square = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        assert_eq!(shoelace_area(&square).unwrap(), 100.0);
    }

    #[test]
    fn test_shoelace_winding_invariant() {
        let ccw = pts(&[(0.0, 0.0), (30.0, 0.0), (40.0, 25.0), (5.0, 20.0)]);
        let mut cw = ccw.clone();
        cw.reverse();
        assert_eq!(shoelace_area(&ccw).unwrap(), shoelace_area(&cw).unwrap());
    }

    #[test]
    fn test_shoelace_rotation_invariant() {
        let poly = pts(&[(2.0, 1.0), (12.0, 3.0), (14.0, 11.0), (6.0, 15.0), (1.0, 8.0)]);
        let expected = shoelace_area(&poly).unwrap();
        for k in 1..poly.len() {
            let mut rotated = poly.clone();
            rotated.rotate_left(k);
            assert!((shoelace_area(&rotated).unwrap() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_shoelace_explicit_closing_point() {
        let closed = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
        assert_eq!(shoelace_area(&closed).unwrap(), 100.0);
    }

    #[test]
    fn test_shoelace_bowtie_cancels() {
        // Two lobes wound in opposite directions: the signed sum is zero
        let bowtie = pts(&[(0.0, 0.0), (100.0, 100.0), (100.0, 0.0), (0.0, 100.0)]);
        assert_eq!(shoelace_area(&bowtie).unwrap(), 0.0);
    }

    #[test]
    fn test_insufficient_points() {
        let two = pts(&[(0.0, 0.0), (5.0, 5.0)]);
        assert_eq!(
            shoelace_area(&two),
            Err(MeasureError::InsufficientPoints {
                found: 2,
                required: 3
            })
        );

        let repeated = pts(&[(1.0, 1.0), (1.0, 1.0), (4.0, 4.0), (1.0, 1.0)]);
        assert!(shoelace_area(&repeated).is_err());

        let mut fill = fill_estimator(20, 20);
        assert!(fill.estimate_area_pixels(&two).is_err());
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        let nan = pts(&[(0.0, 0.0), (f64::NAN, 0.0), (10.0, 10.0)]);
        assert!(matches!(
            shoelace_area(&nan),
            Err(MeasureError::InvalidParameter {
                name: "boundary coordinate",
                ..
            })
        ));

        let inf = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, f64::INFINITY)]);
        assert!(shoelace_area(&inf).is_err());
        assert!(fill_estimator(20, 20).estimate_area_pixels(&inf).is_err());
    }

    #[test]
    fn test_overflowing_area_rejected() {
        let huge = pts(&[(0.0, 0.0), (1e200, 0.0), (1e200, 1e200)]);
        assert!(matches!(
            shoelace_area(&huge),
            Err(MeasureError::InvalidParameter {
                name: "region area",
                ..
            })
        ));
    }

    #[test]
    fn test_fill_count_square() {
        let mut fill = fill_estimator(200, 200);
        let square = pts(&[(10.0, 10.0), (110.0, 10.0), (110.0, 110.0), (10.0, 110.0)]);
        let area = fill.estimate_area_pixels(&square).unwrap();
        assert!(relative_diff(area, 10_000.0) < 0.02, "area = {area}");
    }

    #[test]
    fn test_fill_count_agrees_with_shoelace_on_convex() {
        let mut fill = fill_estimator(300, 300);
        let shapes = [
            circle(150.0, 150.0, 100.0, 64),
            pts(&[(20.0, 30.0), (260.0, 60.0), (120.0, 250.0)]),
            pts(&[(50.0, 50.0), (250.0, 80.0), (230.0, 200.0), (90.0, 240.0), (40.0, 150.0)]),
        ];

        for shape in &shapes {
            let exact = shoelace_area(shape).unwrap();
            let raster = fill.estimate_area_pixels(shape).unwrap();
            assert!(
                relative_diff(exact, raster) < 0.02,
                "shoelace {exact} vs fill {raster}"
            );
        }
    }

    #[test]
    fn test_fill_count_buffer_is_cleared_between_uses() {
        let mut fill = fill_estimator(100, 100);
        let big = pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
        let small = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);

        let first = fill.estimate_area_pixels(&big).unwrap();
        let second = fill.estimate_area_pixels(&small).unwrap();
        assert_eq!(first, 10_000.0);
        assert!(relative_diff(second, 100.0) < 0.05, "area = {second}");
    }

    #[test]
    fn test_fill_count_bowtie_counts_both_lobes() {
        let mut fill = fill_estimator(120, 120);
        let bowtie = pts(&[(0.0, 0.0), (100.0, 100.0), (100.0, 0.0), (0.0, 100.0)]);
        let area = fill.estimate_area_pixels(&bowtie).unwrap();
        assert!(relative_diff(area, 5_000.0) < 0.03, "area = {area}");
    }

    #[test]
    fn test_fill_rules_differ_on_overlap() {
        // Pentagram: the inner pentagon has winding number 2
        let star: Vec<Point> = (0..5)
            .map(|i| {
                let t = (i * 2) as f64 / 5.0 * std::f64::consts::TAU;
                Point::new(100.0 + 90.0 * t.sin(), 100.0 - 90.0 * t.cos())
            })
            .collect();

        let mut nonzero = fill_estimator(200, 200);
        let mut even_odd =
            FillCountEstimator::new(NativeDimensions::new(200, 200), FillRule::EvenOdd).unwrap();

        let a = nonzero.estimate_area_pixels(&star).unwrap();
        let b = even_odd.estimate_area_pixels(&star).unwrap();
        assert!(a > b * 1.2, "nonzero {a} vs even-odd {b}");
    }

    #[test]
    fn test_fill_count_clips_to_image() {
        let mut fill = fill_estimator(50, 50);
        let oversized = pts(&[(-50.0, -50.0), (150.0, -50.0), (150.0, 150.0), (-50.0, 150.0)]);
        assert_eq!(fill.estimate_area_pixels(&oversized).unwrap(), 2_500.0);
    }

    #[test]
    fn test_zero_sized_buffer_fails() {
        let err = FillCountEstimator::new(NativeDimensions::new(0, 10), FillRule::NonZero).unwrap_err();
        assert_eq!(
            err,
            MeasureError::InvalidImageDimensions {
                width: 0,
                height: 10
            }
        );
    }

    #[test]
    fn test_create_estimator() {
        let est = create_estimator(AreaAlgorithm::Shoelace, FillRule::NonZero, None).unwrap();
        assert_eq!(est.algorithm(), AreaAlgorithm::Shoelace);

        assert!(matches!(
            create_estimator(AreaAlgorithm::FillCount, FillRule::NonZero, None),
            Err(MeasureError::MissingImageDimensions)
        ));

        let est = create_estimator(
            AreaAlgorithm::FillCount,
            FillRule::EvenOdd,
            Some(NativeDimensions::new(64, 48)),
        )
        .unwrap();
        assert_eq!(est.algorithm(), AreaAlgorithm::FillCount);
    }

    #[test]
    fn test_physical_area() {
        let scale = CalibrationScale::new(10.0).unwrap();
        assert_eq!(physical_area(100.0, Some(scale), 1.0).unwrap(), 1.0);
        assert_eq!(physical_area(100.0, Some(scale), 16.0).unwrap(), 16.0);
        assert_eq!(physical_area(100.0, None, 1.0), Err(MeasureError::MissingCalibration));
        assert!(physical_area(100.0, Some(scale), 0.0).is_err());
    }

    #[test]
    fn test_device_correction_factors() {
        assert_eq!(DeviceCorrection::None.factor(), 1.0);
        assert_eq!(DeviceCorrection::Mobile.factor(), 16.0);
        assert!((DeviceCorrection::Desktop.factor() - 1.0 / 2.64).abs() < 1e-12);
        assert_eq!(DeviceCorrection::Custom(0.5).factor(), 0.5);

        let json = serde_json::to_string(&DeviceCorrection::Custom(2.0)).unwrap();
        assert_eq!(json, r#"{"custom":2.0}"#);
        let mobile: DeviceCorrection = serde_json::from_str(r#""mobile""#).unwrap();
        assert_eq!(mobile, DeviceCorrection::Mobile);
    }

    #[test]
    fn test_device_correction_from_factor() {
        for c in [
            DeviceCorrection::None,
            DeviceCorrection::Mobile,
            DeviceCorrection::Desktop,
            DeviceCorrection::Custom(3.5),
        ] {
            assert_eq!(DeviceCorrection::from_factor(c.factor()), c);
        }
    }
}
