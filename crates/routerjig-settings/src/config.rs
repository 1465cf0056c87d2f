//! Configuration and settings management for RouterJig
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in the platform configuration directory.
//!
//! Configuration is organized into logical sections:
//! - Joint layout limits (minimum finger width)
//! - Figure margins
//! - Wood pattern images
//! - Unit defaults (system, increments, English separator)
//! - Debug output

use crate::error::{ConfigError, SettingsError, SettingsResult};
use routerjig_core::UnitSystem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use routerjig_core::units::MeasurementSystem;

/// Application directory name under the platform config directory
pub const APP_DIR: &str = "routerjig";

/// Default configuration file name
pub const CONFIG_FILE: &str = "config.toml";

/// Figure margins and the vertical separation between drawn objects.
///
/// All distances are in increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    /// Separation between the template and board B, and board B and board A
    pub sep: i64,
    pub left: i64,
    pub right: i64,
    pub bottom: i64,
    pub top: i64,
}

impl Margins {
    /// Every margin set to `value`
    pub fn uniform(value: i64) -> Self {
        Self {
            sep: value,
            left: value,
            right: value,
            bottom: value,
            top: value,
        }
    }

    pub fn with_sep(mut self, sep: i64) -> Self {
        self.sep = sep;
        self
    }

    pub fn with_left(mut self, left: i64) -> Self {
        self.left = left;
        self
    }

    pub fn with_right(mut self, right: i64) -> Self {
        self.right = right;
        self
    }

    pub fn with_bottom(mut self, bottom: i64) -> Self {
        self.bottom = bottom;
        self
    }

    pub fn with_top(mut self, top: i64) -> Self {
        self.top = top;
        self
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(8).with_bottom(16)
    }
}

/// Unit defaults for new designs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSettings {
    /// Measurement system (Metric or English)
    #[serde(default)]
    pub system: MeasurementSystem,
    /// Increments per inch (English) or per mm (metric); unset uses the
    /// system default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_increments: Option<u32>,
    /// Text between the whole part and the fraction of English lengths
    #[serde(default = "default_separator")]
    pub english_separator: String,
}

fn default_separator() -> String {
    " ".to_string()
}

impl Default for UnitSettings {
    fn default() -> Self {
        Self {
            system: MeasurementSystem::default(),
            num_increments: None,
            english_separator: default_separator(),
        }
    }
}

impl UnitSettings {
    /// Unit system described by these settings
    pub fn unit_system(&self) -> UnitSystem {
        UnitSystem::new(self.system, self.num_increments).with_separator(&self.english_separator)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fingers narrower than this are avoided, in increments. For English
    /// units at 32 per inch, 2 is 1/16".
    pub min_finger_width: i64,
    /// Emit diagnostic output; never changes behavior
    pub debug: bool,
    /// Figure margins
    pub margins: Margins,
    /// Unit defaults
    pub units: UnitSettings,
    /// Wood menu entries: display name to pattern image file
    pub woods: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let woods = [
            ("Cherry", "black-cherry-sealed.png"),
            ("Maple", "hard-maple.png"),
            ("Walnut", "black-walnut-sealed.png"),
        ]
        .into_iter()
        .map(|(name, file)| (name.to_string(), file.to_string()))
        .collect();

        Self {
            min_finger_width: 2,
            debug: false,
            margins: Margins::default(),
            units: UnitSettings::default(),
            woods,
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform location of the configuration file
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string())
        })?;
        Ok(dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path` when given, else from the default location if a
    /// file exists there, else return the defaults.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Ok(path) if path.exists() => Self::load_from_file(&path),
            _ => {
                debug!("no configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_finger_width <= 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "min_finger_width".to_string(),
                value: self.min_finger_width.to_string(),
            });
        }

        let m = &self.margins;
        for (key, value) in [
            ("margins.sep", m.sep),
            ("margins.left", m.left),
            ("margins.right", m.right),
            ("margins.bottom", m.bottom),
            ("margins.top", m.top),
        ] {
            if value < 0 {
                return Err(ConfigError::ValueOutOfRange {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }

        if self.units.num_increments == Some(0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "units.num_increments".to_string(),
                value: "0".to_string(),
            });
        }

        let sep = &self.units.english_separator;
        if sep.is_empty() {
            return Err(ConfigError::InvalidSetting {
                key: "units.english_separator".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if sep.chars().any(|c| c == '/' || c == '.' || c.is_ascii_digit()) {
            return Err(ConfigError::InvalidSetting {
                key: "units.english_separator".to_string(),
                reason: "must not contain digits, '/' or '.'".to_string(),
            });
        }

        Ok(())
    }

    /// Unit system for new designs
    pub fn unit_system(&self) -> UnitSystem {
        self.units.unit_system()
    }

    /// Pattern image for a wood name
    pub fn wood_image(&self, name: &str) -> Option<&str> {
        self.woods.get(name).map(String::as_str)
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
