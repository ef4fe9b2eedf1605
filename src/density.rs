//! Nearest-color density lookup.
//!
//! A region's fill color is matched against the density table by Euclidean
//! distance in RGB space. On equal distances the earlier table entry wins, so
//! the result is deterministic for a given table order.

use crate::error::{MeasureError, MeasureResult};
use crate::model::{ColorDensityEntry, DensityTable, Region, Rgb};

/// The table entry closest to `color`.
pub fn nearest_entry<'a>(color: &Rgb, table: &'a DensityTable) -> MeasureResult<&'a ColorDensityEntry> {
    let mut entries = table.iter();
    let mut best = entries.next().ok_or(MeasureError::EmptyDensityTable)?;
    let mut best_distance = color.distance_to(&best.color);

    for entry in entries {
        let distance = color.distance_to(&entry.color);
        if distance < best_distance {
            best = entry;
            best_distance = distance;
        }
    }

    Ok(best)
}

/// Density of the table entry closest to `color`.
pub fn match_density(color: &Rgb, table: &DensityTable) -> MeasureResult<f64> {
    nearest_entry(color, table).map(|entry| entry.density)
}

/// Where a region's density came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DensitySource {
    /// The region's own override
    Custom,
    /// Nearest table entry
    Table(ColorDensityEntry),
}

/// Density for a region: its override if set, otherwise the nearest table entry.
///
/// The table is not consulted when an override exists, so an empty table is
/// only an error for regions without one.
pub fn resolve_density(region: &Region, table: &DensityTable) -> MeasureResult<(f64, DensitySource)> {
    if let Some(density) = region.custom_density() {
        return Ok((density, DensitySource::Custom));
    }
    let entry = nearest_entry(&region.color(), table)?;
    Ok((entry.density, DensitySource::Table(entry.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Point, RegionKind};

    fn two_color_table() -> DensityTable {
        DensityTable::from_entries(vec![
            ColorDensityEntry::new(Rgb::new(255, 0, 0), 40.0),
            ColorDensityEntry::new(Rgb::new(0, 0, 255), 30.0),
        ])
        .unwrap()
    }

    fn region(color: Rgb) -> Region {
        Region::new(
            1,
            color,
            RegionKind::Freehand,
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)],
            0.5,
        )
    }

    #[test]
    fn test_exact_match() {
        let table = DensityTable::builtin();
        assert_eq!(match_density(&Rgb::new(0, 255, 0), &table), Ok(25.0));
        assert_eq!(match_density(&Rgb::new(128, 0, 128), &table), Ok(20.0));
    }

    #[test]
    fn test_closer_to_second_entry() {
        let table = two_color_table();
        assert_eq!(match_density(&Rgb::new(20, 10, 200), &table), Ok(30.0));
    }

    #[test]
    fn test_off_palette_color() {
        // Orange is nearest to red in the builtin table
        let table = DensityTable::builtin();
        let entry = nearest_entry(&Rgb::new(255, 100, 0), &table).unwrap();
        assert_eq!(entry.color, Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_tie_prefers_first_entry() {
        let table = two_color_table();
        // Equidistant from red and blue
        let purple = Rgb::new(128, 0, 128);
        assert_eq!(match_density(&purple, &table), Ok(40.0));

        let reversed = DensityTable::from_entries(vec![
            ColorDensityEntry::new(Rgb::new(0, 0, 255), 30.0),
            ColorDensityEntry::new(Rgb::new(255, 0, 0), 40.0),
        ])
        .unwrap();
        assert_eq!(match_density(&purple, &reversed), Ok(30.0));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(
            match_density(&Rgb::new(1, 2, 3), &DensityTable::new()),
            Err(MeasureError::EmptyDensityTable)
        );
    }

    #[test]
    fn test_custom_density_takes_precedence() {
        let mut r = region(Rgb::new(255, 0, 0));
        r.set_custom_density(Some(55.0)).unwrap();

        let (density, source) = resolve_density(&r, &DensityTable::new()).unwrap();
        assert_eq!(density, 55.0);
        assert_eq!(source, DensitySource::Custom);
    }

    #[test]
    fn test_resolve_from_table() {
        let r = region(Rgb::new(250, 5, 5));
        let (density, source) = resolve_density(&r, &two_color_table()).unwrap();
        assert_eq!(density, 40.0);
        assert!(matches!(source, DensitySource::Table(e) if e.color == Rgb::new(255, 0, 0)));
    }
}
