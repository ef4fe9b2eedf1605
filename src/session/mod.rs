//! Interactive measurement session.
//!
//! A [`MeasurementSession`] owns everything a single user edits: the ordered
//! region collection, the calibration scale, the density table, the
//! correction factors and the stroke state machine. Regions form a strict
//! stack: creation order is display order, and undo removes the newest.
//!
//! Failed operations leave committed regions and the calibration untouched.

mod drawing;

pub use drawing::{DraggedSquare, DrawingState, Tool, square_from_drag};

use crate::config::MeasureConfig;
use crate::error::{MeasureError, MeasureResult, ensure_non_negative, ensure_positive};
use crate::format::{FormatError, RegionEntry, SessionSnapshot};
use crate::geometry::{
    AreaAlgorithm, AreaEstimator, CalibrationScale, CalibrationStrategy, CoordinateMapper, DeviceCorrection,
    calibrate_reference, calibrate_stroke, create_estimator,
};
use crate::measurement::{DerivedMeasurement, MeasurementContext, RegionSummary, derive_measurement};
use crate::model::{DensityTable, ImageInfo, Point, Region, RegionId, RegionKind, Rgb};

/// What a completed stroke produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeOutcome {
    /// No stroke was in progress
    Ignored,
    /// A reference stroke set a new calibration
    Calibrated(CalibrationScale),
    /// A region was committed
    RegionAdded(RegionId),
}

/// A single-user measurement session.
#[derive(Debug)]
pub struct MeasurementSession {
    regions: Vec<Region>,
    next_id: RegionId,
    calibration: Option<CalibrationScale>,
    strategy: CalibrationStrategy,
    estimator: Box<dyn AreaEstimator>,
    density_table: DensityTable,
    device_correction: DeviceCorrection,
    reference_factor: f64,
    tool: Tool,
    color: Rgb,
    drawing: DrawingState,
    image: Option<ImageInfo>,
}

impl MeasurementSession {
    /// Start a session with `config`, optionally for a known image.
    ///
    /// The fill-count algorithm needs the image dimensions. A device-density
    /// calibration is computed immediately; a manual one waits for a
    /// reference stroke.
    pub fn new(config: &MeasureConfig, image: Option<ImageInfo>) -> MeasureResult<Self> {
        let estimator = create_estimator(
            config.area_algorithm,
            config.fill_rule,
            image.as_ref().map(ImageInfo::dimensions),
        )?;
        let calibration = config.calibration.initial_scale()?;
        ensure_positive("device correction factor", config.device_correction.factor())?;
        let reference_factor = ensure_non_negative("reference factor", config.reference_factor)?;

        log::info!(
            "New session: {} area, {} calibration, {} table entries",
            config.area_algorithm.name(),
            config.calibration.name(),
            config.density_table.len()
        );

        Ok(Self {
            regions: Vec::new(),
            next_id: 1,
            calibration,
            strategy: config.calibration,
            estimator,
            density_table: config.density_table.clone(),
            device_correction: config.device_correction,
            reference_factor,
            tool: if calibration.is_some() {
                Tool::Freehand
            } else {
                Tool::Reference
            },
            color: config.region_color,
            drawing: DrawingState::Idle,
            image,
        })
    }

    /// Rebuild a session from a saved snapshot.
    ///
    /// Stored regions, table, calibration and factors replace the config's;
    /// the config still decides the algorithm used for new regions.
    pub fn from_snapshot(snapshot: SessionSnapshot, config: &MeasureConfig) -> Result<Self, FormatError> {
        snapshot.validate()?;
        let invalid = |e: MeasureError| FormatError::invalid_snapshot(e.to_string());

        let mut session = match Self::new(config, snapshot.image.clone()) {
            Ok(session) => session,
            // Fill-count needs image dimensions the snapshot may not carry
            Err(e) if config.area_algorithm == AreaAlgorithm::FillCount => {
                log::warn!("Cannot use fill-count for restored session ({}); using shoelace", e);
                let fallback = MeasureConfig {
                    area_algorithm: AreaAlgorithm::Shoelace,
                    ..config.clone()
                };
                Self::new(&fallback, snapshot.image.clone()).map_err(invalid)?
            }
            Err(e) => return Err(invalid(e)),
        };
        session.regions = snapshot
            .regions
            .iter()
            .map(RegionEntry::to_region)
            .collect::<Result<_, _>>()?;
        session.next_id = session.regions.iter().map(Region::id).max().map_or(1, |id| id + 1);
        session.calibration = snapshot.calibration_scale;
        session.density_table = snapshot.color_density_table;
        session.device_correction = DeviceCorrection::from_factor(snapshot.device_correction);
        session.reference_factor = snapshot.reference_factor;
        session.tool = if session.calibration.is_some() {
            Tool::Freehand
        } else {
            Tool::Reference
        };

        log::info!("Restored session with {} regions", session.regions.len());
        Ok(session)
    }

    /// Capture the session as a snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            regions: self.regions.iter().map(RegionEntry::from_region).collect(),
            color_density_table: self.density_table.clone(),
            calibration_scale: self.calibration,
            reference_factor: self.reference_factor,
            device_correction: self.device_correction.factor(),
            image: self.image.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Tools and stroke handling
    // ------------------------------------------------------------------

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools, discarding any stroke in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.drawing.is_drawing() {
            log::debug!("Tool change discards stroke in progress");
            self.drawing = DrawingState::Idle;
        }
        self.tool = tool;
    }

    /// Color used for new regions.
    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn drawing_state(&self) -> &DrawingState {
        &self.drawing
    }

    /// Start a stroke at an image-space point with the current tool.
    pub fn begin_stroke(&mut self, point: Point) {
        if self.drawing.is_drawing() {
            log::warn!("Stroke started while another was in progress; restarting");
        }
        log::debug!("Begin {} stroke at ({:.1}, {:.1})", self.tool.name(), point.x, point.y);
        self.drawing = DrawingState::start(self.tool, point);
    }

    /// Add a pointer sample to the stroke in progress.
    pub fn extend_stroke(&mut self, point: Point) {
        if self.drawing.extend(point) {
            log::trace!("Stroke sample ({:.1}, {:.1})", point.x, point.y);
        }
    }

    /// Abandon the stroke in progress.
    pub fn cancel_stroke(&mut self) {
        if self.drawing.is_drawing() {
            log::debug!("Stroke cancelled");
        }
        self.drawing = DrawingState::Idle;
    }

    /// Finish the stroke in progress. The state machine always returns to idle.
    ///
    /// A reference stroke recalibrates and switches to the freehand tool. A
    /// region stroke with too few points is discarded with
    /// [`MeasureError::InsufficientPoints`].
    pub fn end_stroke(&mut self) -> MeasureResult<StrokeOutcome> {
        match std::mem::take(&mut self.drawing) {
            DrawingState::Idle => Ok(StrokeOutcome::Ignored),
            DrawingState::CalibratingReference { points } => {
                let scale = calibrate_stroke(&points, self.strategy.reference_length())
                    .inspect_err(|e| log::warn!("Reference stroke discarded: {}", e))?;
                self.calibration = Some(scale);
                self.tool = Tool::Freehand;
                Ok(StrokeOutcome::Calibrated(scale))
            }
            DrawingState::DrawingRegion { points } => {
                let id = self
                    .add_region(self.color, points)
                    .inspect_err(|e| log::warn!("Region stroke discarded: {}", e))?;
                Ok(StrokeOutcome::RegionAdded(id))
            }
            DrawingState::DrawingSquare { start, current } => {
                let id = self
                    .add_square(self.color, start, current)
                    .inspect_err(|e| log::warn!("Square discarded: {}", e))?;
                Ok(StrokeOutcome::RegionAdded(id))
            }
        }
    }

    /// [`begin_stroke`](Self::begin_stroke) from viewport coordinates.
    pub fn pointer_down(&mut self, mapper: &CoordinateMapper, client_x: f64, client_y: f64) {
        self.begin_stroke(mapper.map(client_x, client_y));
    }

    /// [`extend_stroke`](Self::extend_stroke) from viewport coordinates.
    pub fn pointer_move(&mut self, mapper: &CoordinateMapper, client_x: f64, client_y: f64) {
        self.extend_stroke(mapper.map(client_x, client_y));
    }

    // ------------------------------------------------------------------
    // Regions
    // ------------------------------------------------------------------

    /// Commit a freehand region, computing its pixel area once.
    pub fn add_region(&mut self, color: Rgb, boundary: Vec<Point>) -> MeasureResult<RegionId> {
        let area = self.estimator.estimate_area_pixels(&boundary)?;
        Ok(self.push_region(color, RegionKind::Freehand, boundary, area))
    }

    /// Commit a square dragged from `start` towards `corner`.
    pub fn add_square(&mut self, color: Rgb, start: Point, corner: Point) -> MeasureResult<RegionId> {
        let square = square_from_drag(start, corner).ok_or(MeasureError::insufficient_points(1))?;
        Ok(self.push_region(color, RegionKind::Square, square.corners().to_vec(), square.area()))
    }

    fn push_region(&mut self, color: Rgb, kind: RegionKind, boundary: Vec<Point>, area: f64) -> RegionId {
        let id = self.next_id;
        self.next_id += 1;
        log::debug!(
            "Added {} region {} ({} points, {:.1} px²)",
            kind.name(),
            id,
            boundary.len(),
            area
        );
        self.regions.push(Region::new(id, color, kind, boundary, area));
        id
    }

    /// Remove and return the most recently created region. No-op when empty.
    pub fn undo(&mut self) -> Option<Region> {
        let region = self.regions.pop()?;
        log::debug!("Undid region {}", region.id());
        Some(region)
    }

    /// Remove every region and any stroke in progress.
    pub fn clear(&mut self) {
        log::debug!("Cleared {} regions", self.regions.len());
        self.regions.clear();
        self.drawing = DrawingState::Idle;
    }

    /// Regions in creation order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id() == id)
    }

    /// Set or clear a region's density override.
    pub fn set_custom_density(&mut self, id: RegionId, density: Option<f64>) -> MeasureResult<()> {
        let region = self
            .regions
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(MeasureError::UnknownRegion { id })?;
        region.set_custom_density(density)
    }

    /// Remove a region's density override, falling back to the table.
    pub fn clear_custom_density(&mut self, id: RegionId) -> MeasureResult<()> {
        self.set_custom_density(id, None)
    }

    // ------------------------------------------------------------------
    // Calibration and factors
    // ------------------------------------------------------------------

    pub fn calibration(&self) -> Option<CalibrationScale> {
        self.calibration
    }

    /// Calibrate from a two-point reference segment of known physical length.
    ///
    /// Like a completed reference stroke, this switches to the freehand tool.
    pub fn calibrate(&mut self, p1: Point, p2: Point, physical_length: f64) -> MeasureResult<CalibrationScale> {
        let scale = calibrate_reference(p1, p2, physical_length)?;
        self.calibration = Some(scale);
        self.set_tool(Tool::Freehand);
        Ok(scale)
    }

    /// Replace the calibration scale directly.
    pub fn set_calibration(&mut self, scale: CalibrationScale) {
        self.calibration = Some(scale);
    }

    pub fn density_table(&self) -> &DensityTable {
        &self.density_table
    }

    pub fn density_table_mut(&mut self) -> &mut DensityTable {
        &mut self.density_table
    }

    pub fn device_correction(&self) -> DeviceCorrection {
        self.device_correction
    }

    pub fn set_device_correction(&mut self, correction: DeviceCorrection) -> MeasureResult<()> {
        ensure_positive("device correction factor", correction.factor())?;
        self.device_correction = correction;
        Ok(())
    }

    pub fn reference_factor(&self) -> f64 {
        self.reference_factor
    }

    pub fn set_reference_factor(&mut self, factor: f64) -> MeasureResult<()> {
        self.reference_factor = ensure_non_negative("reference factor", factor)?;
        Ok(())
    }

    pub fn image(&self) -> Option<&ImageInfo> {
        self.image.as_ref()
    }

    /// Algorithm used to compute the pixel area of new regions.
    pub fn area_algorithm(&self) -> AreaAlgorithm {
        self.estimator.algorithm()
    }

    // ------------------------------------------------------------------
    // Derived measurements
    // ------------------------------------------------------------------

    /// Inputs for turning stored pixel areas into physical figures.
    pub fn context(&self) -> MeasurementContext<'_> {
        MeasurementContext {
            table: &self.density_table,
            scale: self.calibration,
            correction_factor: self.device_correction.factor(),
            reference_factor: self.reference_factor,
        }
    }

    /// Physical area, density and count for one region.
    pub fn measure(&self, id: RegionId) -> MeasureResult<DerivedMeasurement> {
        let region = self.region(id).ok_or(MeasureError::UnknownRegion { id })?;
        derive_measurement(region, &self.context())
    }

    /// Display summaries for every region, in creation order.
    pub fn summaries(&self) -> MeasureResult<Vec<RegionSummary>> {
        let ctx = self.context();
        self.regions.iter().map(|r| RegionSummary::new(r, &ctx)).collect()
    }

    /// Sum of all region counts.
    pub fn total_count(&self) -> MeasureResult<u64> {
        let ctx = self.context();
        self.regions
            .iter()
            .map(|r| derive_measurement(r, &ctx).map(|m| m.count))
            .sum()
    }
}
