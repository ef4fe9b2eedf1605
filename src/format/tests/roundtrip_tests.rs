//! Round-trip tests from a live session through JSON and back.
//!
//! Loading never recomputes pixel areas, so every derived figure must come
//! out bit-for-bit identical.

use crate::config::MeasureConfig;
use crate::format::{SNAPSHOT_EXTENSION, export, export_to_bytes, import, import_from_bytes};
use crate::geometry::{AreaAlgorithm, DeviceCorrection};
use crate::model::{ColorDensityEntry, ImageInfo, Point, Rgb};
use crate::session::MeasurementSession;

/// A session with awkward floating point values everywhere.
fn create_comprehensive_session() -> MeasurementSession {
    let config = MeasureConfig {
        area_algorithm: AreaAlgorithm::FillCount,
        ..MeasureConfig::default()
    };
    let image = ImageInfo::new("crown.jpg", 300, 200);
    let mut session = MeasurementSession::new(&config, Some(image)).unwrap();

    session
        .calibrate(Point::new(12.3, 45.6), Point::new(78.9, 101.1), 1.0 / 3.0)
        .unwrap();
    session.set_reference_factor(0.1 + 0.2).unwrap();
    session.set_device_correction(DeviceCorrection::Desktop).unwrap();
    session
        .density_table_mut()
        .insert(ColorDensityEntry::new(Rgb::new(255, 128, 0), 37.7).with_label("Orange"))
        .unwrap();

    session
        .add_region(
            Rgb::new(250, 10, 10),
            vec![
                Point::new(10.1, 10.7),
                Point::new(120.33, 14.2),
                Point::new(99.999, 150.5),
                Point::new(15.25, 130.125),
            ],
        )
        .unwrap();
    let id = session
        .add_region(
            Rgb::new(255, 120, 0),
            vec![
                Point::new(150.0, 20.0),
                Point::new(290.7, 60.3),
                Point::new(220.1, 190.9),
            ],
        )
        .unwrap();
    session.set_custom_density(id, Some(1.0 / 7.0)).unwrap();
    session
        .add_square(Rgb::new(128, 0, 128), Point::new(200.5, 100.25), Point::new(170.0, 140.0))
        .unwrap();

    session
}

#[test]
fn test_session_roundtrip_is_exact() {
    let session = create_comprehensive_session();
    let bytes = export_to_bytes(&session.snapshot()).unwrap();
    let snapshot = import_from_bytes(&bytes).unwrap();
    assert_eq!(snapshot, session.snapshot());

    let restored = MeasurementSession::from_snapshot(snapshot, &MeasureConfig::default()).unwrap();
    assert_eq!(restored.regions(), session.regions());

    for region in session.regions() {
        let before = session.measure(region.id()).unwrap();
        let after = restored.measure(region.id()).unwrap();
        assert_eq!(
            before.area_physical.to_bits(),
            after.area_physical.to_bits(),
            "area of region {}",
            region.id()
        );
        assert_eq!(before.count, after.count);
        assert_eq!(before.density_source, after.density_source);
    }
    assert_eq!(restored.total_count().unwrap(), session.total_count().unwrap());
}

#[test]
fn test_second_roundtrip_is_stable() {
    let session = create_comprehensive_session();
    let first = export_to_bytes(&session.snapshot()).unwrap();
    let restored = MeasurementSession::from_snapshot(import_from_bytes(&first).unwrap(), &MeasureConfig::default())
        .unwrap();
    let second = export_to_bytes(&restored.snapshot()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_restored_session_keeps_image_algorithm() {
    let session = create_comprehensive_session();
    let config = MeasureConfig {
        area_algorithm: AreaAlgorithm::FillCount,
        ..MeasureConfig::default()
    };
    let restored = MeasurementSession::from_snapshot(session.snapshot(), &config).unwrap();
    assert_eq!(restored.area_algorithm(), AreaAlgorithm::FillCount);
    assert_eq!(restored.image().unwrap().name, "crown.jpg");
}

#[test]
fn test_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("session.{}", SNAPSHOT_EXTENSION));

    let session = create_comprehensive_session();
    export(&session.snapshot(), &path).unwrap();
    let loaded = import(&path).unwrap();
    assert_eq!(loaded, session.snapshot());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = import(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(crate::format::FormatError::Io(_))));
}
