//! Graftmeter - Area and Graft Count Estimation
//!
//! Measures closed regions drawn over a scalp photograph. A reference stroke
//! (or the display's pixel density) calibrates pixels to centimeters, each
//! region's pixel area is computed once when it is drawn, and the region's
//! color picks a grafts-per-cm² density from a configurable table. Physical
//! area and graft count are derived on demand, so recalibrating updates
//! every figure without touching the regions.

pub mod config;
pub mod constants;
pub mod count;
pub mod density;
pub mod error;
pub mod format;
pub mod geometry;
pub mod measurement;
pub mod model;
pub mod session;

pub use config::{ConfigError, LogLevel, MeasureConfig};
pub use error::{MeasureError, MeasureResult};
pub use format::{FormatError, SessionSnapshot};
pub use geometry::{
    AreaAlgorithm, CalibrationScale, CalibrationStrategy, CoordinateMapper, DeviceCorrection,
    FillRule,
};
pub use measurement::{DerivedMeasurement, RegionSummary};
pub use model::{ColorDensityEntry, DensityTable, ImageInfo, Point, Region, RegionId, Rgb};
pub use session::{MeasurementSession, StrokeOutcome, Tool};
