//! JSON snapshot files.
//!
//! Snapshots are pretty-printed JSON. Floats are written with enough digits
//! (and parsed with `float_roundtrip`) that every stored coordinate, area and
//! scale reloads bit-for-bit.

use std::path::Path;

use super::error::FormatError;
use super::snapshot::SessionSnapshot;

/// File extension for saved sessions.
pub const SNAPSHOT_EXTENSION: &str = "json";

/// Serialize a snapshot to JSON bytes.
pub fn export_to_bytes(snapshot: &SessionSnapshot) -> Result<Vec<u8>, FormatError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    log::debug!(
        "Serialized snapshot: {} regions, {} points",
        snapshot.regions.len(),
        snapshot.total_points()
    );
    Ok(json.into_bytes())
}

/// Write a snapshot to `path`.
pub fn export(snapshot: &SessionSnapshot, path: &Path) -> Result<(), FormatError> {
    log::info!("Saving session snapshot to {:?}", path);
    let bytes = export_to_bytes(snapshot)?;
    std::fs::write(path, &bytes)?;
    log::info!("Saved {} regions", snapshot.regions.len());
    Ok(())
}

/// Parse and validate a snapshot from JSON bytes.
pub fn import_from_bytes(bytes: &[u8]) -> Result<SessionSnapshot, FormatError> {
    let snapshot: SessionSnapshot = serde_json::from_slice(bytes)?;
    snapshot.validate()?;

    if snapshot.calibration_scale.is_none() && !snapshot.regions.is_empty() {
        log::warn!(
            "Snapshot has {} regions but no calibration; physical areas unavailable until recalibrated",
            snapshot.regions.len()
        );
    }
    Ok(snapshot)
}

/// Read a snapshot from `path`.
pub fn import(path: &Path) -> Result<SessionSnapshot, FormatError> {
    log::info!("Loading session snapshot from {:?}", path);
    let bytes = std::fs::read(path)?;
    let snapshot = import_from_bytes(&bytes)?;
    log::info!("Loaded {} regions", snapshot.regions.len());
    Ok(snapshot)
}
