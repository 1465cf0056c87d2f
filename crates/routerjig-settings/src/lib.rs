//! RouterJig Settings Crate
//!
//! Handles application configuration: loading, saving and validating the
//! options that shape a joint layout and its display.

pub mod config;
pub mod error;

pub use config::{Config, Margins, MeasurementSystem, UnitSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
