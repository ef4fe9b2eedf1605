//! Session snapshot save/load.
//!
//! A snapshot captures the regions, density table, calibration and
//! correction factors of a session as one flat JSON record.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use graftmeter::format;
//!
//! let snapshot = session.snapshot();
//! format::export(&snapshot, path)?;
//!
//! let loaded = format::import(path)?;
//! let session = MeasurementSession::from_snapshot(loaded, &config)?;
//! ```

mod error;
mod json;
mod snapshot;

#[cfg(test)]
mod tests;

pub use error::FormatError;
pub use json::{SNAPSHOT_EXTENSION, export, export_to_bytes, import, import_from_bytes};
pub use snapshot::{RegionEntry, SessionSnapshot};
