//! Error types for measurement operations.
//!
//! Every variant describes a local, recoverable condition. The caller reports
//! it to the user and drops the action in progress; committed regions and the
//! current calibration are never touched by a failed operation.

use thiserror::Error;

/// Errors raised by the calibration, area, density and count engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// The rendered surface has a zero (or non-finite) width or height
    #[error("Invalid display state: rendered surface is {width}x{height}")]
    InvalidDisplayState {
        /// Rendered width in display units
        width: f64,
        /// Rendered height in display units
        height: f64,
    },

    /// Fill-count estimation was requested without knowing the image size
    #[error("Fill-count area needs the image dimensions")]
    MissingImageDimensions,

    /// No scratch buffer can be allocated for these image dimensions
    #[error("Cannot allocate a {width}x{height} fill-count buffer")]
    InvalidImageDimensions {
        /// Native image width in pixels
        width: u32,
        /// Native image height in pixels
        height: u32,
    },

    /// The reference segment has (nearly) zero length
    #[error("Reference segment is degenerate: its endpoints coincide")]
    DegenerateReference,

    /// Not enough points to form a closed region
    #[error("Region needs at least {required} points, got {found}")]
    InsufficientPoints {
        /// Number of points supplied
        found: usize,
        /// Minimum number of points required
        required: usize,
    },

    /// A physical measurement was requested before any calibration exists
    #[error("No calibration scale: draw a reference segment first")]
    MissingCalibration,

    /// Density lookup against a table with no entries
    #[error("Density table is empty")]
    EmptyDensityTable,

    /// No region with this id exists in the session
    #[error("Region {id} not found")]
    UnknownRegion {
        /// Requested region id
        id: u64,
    },

    /// A numeric parameter is out of its valid range
    #[error("Invalid value for {name}: {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },
}

impl MeasureError {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, value: f64) -> Self {
        Self::InvalidParameter { name, value }
    }

    /// Create an insufficient points error for a region boundary.
    pub fn insufficient_points(found: usize) -> Self {
        Self::InsufficientPoints {
            found,
            required: crate::constants::MIN_REGION_POINTS,
        }
    }
}

/// Result alias for measurement operations.
pub type MeasureResult<T> = Result<T, MeasureError>;

/// Reject values that are not finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> MeasureResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MeasureError::invalid_parameter(name, value))
    }
}

/// Reject values that are not finite and non-negative.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> MeasureResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(MeasureError::invalid_parameter(name, value))
    }
}
