//! Data models for graftmeter.

mod color;
mod density;
mod image_info;
mod point;
mod region;

pub use color::{ColorParseError, Rgb};
pub use density::{ColorDensityEntry, DensityTable, DensityTableError};
pub use image_info::ImageInfo;
pub use point::{Point, distinct_point_count, points_from_flat};
pub use region::{Region, RegionId, RegionKind};
