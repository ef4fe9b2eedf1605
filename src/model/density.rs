//! Color to density table.
//!
//! Each entry maps a fill color to a count per unit area (grafts per cm²).
//! Colors are unique keys; iteration order is insertion order and decides
//! ties during nearest-color lookup.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::color::Rgb;
use crate::constants::DEFAULT_DENSITY_TABLE;

/// A single table entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorDensityEntry {
    /// Key color
    pub color: Rgb,
    /// Count per unit area, always positive
    pub density: f64,
    /// Optional display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ColorDensityEntry {
    /// Create an entry without a label.
    pub fn new(color: Rgb, density: f64) -> Self {
        Self {
            color,
            density,
            label: None,
        }
    }

    /// Set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label if set, otherwise the hex color.
    pub fn display_name(&self) -> String {
        self.label.clone().unwrap_or_else(|| self.color.to_hex())
    }
}

/// Errors raised while building a density table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DensityTableError {
    /// Two entries share a color
    #[error("Duplicate density table color {0}")]
    DuplicateColor(Rgb),

    /// Density is zero, negative or not finite
    #[error("Invalid density {density} for color {color}")]
    InvalidDensity {
        /// Entry color
        color: Rgb,
        /// Offending density
        density: f64,
    },
}

/// Ordered color to density mapping with unique colors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColorDensityEntry>", into = "Vec<ColorDensityEntry>")]
pub struct DensityTable {
    entries: Vec<ColorDensityEntry>,
}

impl DensityTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from entries, rejecting duplicate colors and bad densities.
    pub fn from_entries(entries: Vec<ColorDensityEntry>) -> Result<Self, DensityTableError> {
        let mut table = Self::new();
        for entry in entries {
            if table.get(&entry.color).is_some() {
                return Err(DensityTableError::DuplicateColor(entry.color));
            }
            table.insert(entry)?;
        }
        Ok(table)
    }

    /// The built-in table: red 40, yellow 35, blue 30, green 25, purple 20.
    pub fn builtin() -> Self {
        let entries = DEFAULT_DENSITY_TABLE
            .iter()
            .filter_map(|(hex, density, label)| {
                Rgb::from_hex(hex)
                    .ok()
                    .map(|color| ColorDensityEntry::new(color, *density).with_label(*label))
            })
            .collect();
        Self { entries }
    }

    /// Insert an entry. An existing entry with the same color is replaced in place.
    pub fn insert(&mut self, entry: ColorDensityEntry) -> Result<(), DensityTableError> {
        if !(entry.density.is_finite() && entry.density > 0.0) {
            return Err(DensityTableError::InvalidDensity {
                color: entry.color,
                density: entry.density,
            });
        }

        match self.entries.iter_mut().find(|e| e.color == entry.color) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        Ok(())
    }

    /// Remove the entry for a color, returning it if present.
    pub fn remove(&mut self, color: &Rgb) -> Option<ColorDensityEntry> {
        let index = self.entries.iter().position(|e| e.color == *color)?;
        Some(self.entries.remove(index))
    }

    /// Exact-color lookup.
    pub fn get(&self, color: &Rgb) -> Option<&ColorDensityEntry> {
        self.entries.iter().find(|e| e.color == *color)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ColorDensityEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<ColorDensityEntry>> for DensityTable {
    type Error = DensityTableError;

    fn try_from(entries: Vec<ColorDensityEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<DensityTable> for Vec<ColorDensityEntry> {
    fn from(table: DensityTable) -> Self {
        table.entries
    }
}
