//! Source image metadata.

use serde::{Deserialize, Serialize};

use crate::geometry::NativeDimensions;

/// Name and native size of the photograph being measured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// File name without directories
    pub name: String,
    /// Native width in pixels
    pub width: u32,
    /// Native height in pixels
    pub height: u32,
}

impl ImageInfo {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    /// Build from a path, keeping only the file name.
    pub fn from_path(path: &std::path::Path, width: u32, height: u32) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        Self::new(name, width, height)
    }

    pub fn dimensions(&self) -> NativeDimensions {
        NativeDimensions::new(self.width, self.height)
    }
}
