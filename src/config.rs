//! Configuration file support for graftmeter.
//!
//! Every measurement setting lives here and is handed to the session when it
//! is created: area algorithm, calibration strategy, device correction,
//! reference factor and the color to density table.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::geometry::{AreaAlgorithm, CalibrationStrategy, DeviceCorrection, FillRule};
use crate::model::{DensityTable, Rgb};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Measurement settings for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Area estimation algorithm for new regions
    #[serde(default)]
    pub area_algorithm: AreaAlgorithm,

    /// Fill rule used by the fill-count algorithm
    #[serde(default)]
    pub fill_rule: FillRule,

    /// How the calibration scale is obtained
    #[serde(default)]
    pub calibration: CalibrationStrategy,

    /// Empirical pixel-area correction
    #[serde(default)]
    pub device_correction: DeviceCorrection,

    /// Count correction multiplier
    #[serde(default = "default_reference_factor")]
    pub reference_factor: f64,

    /// Color of newly drawn regions
    #[serde(default = "default_region_color")]
    pub region_color: Rgb,

    /// Color to density table
    #[serde(default = "DensityTable::builtin")]
    pub density_table: DensityTable,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_reference_factor() -> f64 {
    crate::count::NO_REFERENCE_CORRECTION
}

fn default_region_color() -> Rgb {
    Rgb::new(255, 0, 0)
}

impl MeasureConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            area_algorithm: AreaAlgorithm::default(),
            fill_rule: FillRule::default(),
            calibration: CalibrationStrategy::default(),
            device_correction: DeviceCorrection::default(),
            reference_factor: default_reference_factor(),
            region_color: default_region_color(),
            density_table: DensityTable::builtin(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Read configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Write configuration to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "graftmeter-config.json"
    }

    /// Get the default config file path.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("graftmeter").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home| {
                home.join(".config")
                    .join("graftmeter")
                    .join(Self::default_filename())
            })
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn default_path() -> Option<PathBuf> {
        None
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save(&path)
    }
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
