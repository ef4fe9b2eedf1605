//! Global constants for graftmeter

/// CSS reference resolution: one CSS inch is 96 device-independent pixels.
pub const BASELINE_DPI: f64 = 96.0;

/// Centimeters per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Physical length of the reference segment when the user does not say otherwise (cm).
pub const DEFAULT_REFERENCE_LENGTH_CM: f64 = 1.0;

/// Minimum number of boundary points for a measurable region.
pub const MIN_REGION_POINTS: usize = 3;

/// Reference segments shorter than this (in image pixels) are treated as degenerate.
pub const MIN_REFERENCE_DISTANCE: f64 = 1e-9;

/// Empirical area correction used on phones and tablets.
///
/// These values were tuned by hand against photographs in one deployment and
/// have no derivation. Recalibrate before relying on them elsewhere.
pub const MOBILE_CORRECTION_FACTOR: f64 = 16.0;

/// Empirical area correction used on desktop browsers. See [`MOBILE_CORRECTION_FACTOR`].
pub const DESKTOP_CORRECTION_FACTOR: f64 = 1.0 / 2.64;

/// Default color table: (hex color, grafts per cm², label).
pub const DEFAULT_DENSITY_TABLE: &[(&str, f64, &str)] = &[
    ("#FF0000", 40.0, "Red"),
    ("#FFFF00", 35.0, "Yellow"),
    ("#0000FF", 30.0, "Blue"),
    ("#00FF00", 25.0, "Green"),
    ("#800080", 20.0, "Purple"),
];
