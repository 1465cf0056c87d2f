//! # RouterJig
//!
//! Box joint templates for router jigs.
//!
//! ## Architecture
//!
//! RouterJig is organized as a workspace with multiple crates:
//!
//! 1. **routerjig-core** - Length increments, exact fractions, unit formatting
//! 2. **routerjig-settings** - Configuration files and validation
//! 3. **routerjig-joint** - Router bit, boards, joint layouts, saved designs, pass tables
//! 4. **routerjig** - Command-line front end that ties the crates together

pub mod cli;

pub use routerjig_core::{
    next_file_index, FractionValue, LengthInput, LengthParseError, MeasurementSystem,
    UnitSystem,
};
pub use routerjig_joint::{
    load_design, print_table, save_design, serialize, unserialize, Board, Cut, DecodeError,
    DecodedDesign, JointError, JointSpacing, PassTable, RouterBit, Spacing, SpacingKind,
};
pub use routerjig_settings::{Config, ConfigError, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Log lines go to stderr so command output stays clean. `RUST_LOG` is
/// honoured; the floor is INFO, or DEBUG when `debug` is set.
pub fn init_logging(debug: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(debug)
        .with_level(true)
        .with_line_number(debug);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
