//! # RouterJig Core
//!
//! Core types and utilities for RouterJig.
//! Provides the increment-based length model, exact fractions for English
//! units, label translation, and numbered output file discovery.

pub mod error;
pub mod file_index;
pub mod fraction;
pub mod translate;
pub mod units;

pub use error::LengthParseError;
pub use file_index::next_file_index;
pub use fraction::FractionValue;
pub use translate::{CatalogTranslator, IdentityTranslator, SharedTranslator, Translator};
pub use units::{LengthInput, MeasurementSystem, UnitSystem};

/// Release version written into saved designs
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
