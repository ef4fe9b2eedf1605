//! Coordinate mapping, scale calibration and area estimation.

pub mod area;
pub mod calibration;
pub mod coordinate;

pub use area::{
    AreaAlgorithm, AreaEstimator, DeviceCorrection, FillCountEstimator, FillRule,
    ShoelaceEstimator, create_estimator, physical_area, shoelace_area,
};
pub use calibration::{
    CalibrationScale, CalibrationStrategy, calibrate_device, calibrate_reference,
    calibrate_stroke,
};
pub use coordinate::{CoordinateMapper, DisplayBounds, NativeDimensions, map_to_image_space};
