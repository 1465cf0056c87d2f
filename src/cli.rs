//! Command-line interface

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use routerjig_core::{next_file_index, MeasurementSystem, UnitSystem};
use routerjig_joint::{
    board_set, load_design, print_table, save_design, DecodedDesign, EqualParams, EqualSpacing,
    JointFrame, JointSpacing, RouterBit, Spacing, SpacingKind, VariableParams, VariableSpacing,
};
use routerjig_settings::Config;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output files of `table` without `--out` are `table{N}.txt`
pub const TABLE_PREFIX: &str = "table";
pub const TABLE_SUFFIX: &str = "txt";

/// RouterJig - box joint templates for router jigs
#[derive(Parser, Debug)]
#[command(name = "routerjig")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (.toml or .json); defaults to the platform config path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit diagnostic output
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new joint design
    New(NewArgs),

    /// Describe a saved design
    Info {
        /// Design file
        design: PathBuf,
    },

    /// Write the router pass table of a saved design
    Table(TableArgs),
}

/// Layouts that can be created from the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutArg {
    Equal,
    Variable,
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Design file to write
    pub out: PathBuf,

    /// Use millimeters instead of the configured unit system
    #[arg(long)]
    pub metric: bool,

    /// Increments per inch (English) or per millimeter (metric)
    #[arg(long)]
    pub increments: Option<u32>,

    /// Board width, e.g. `7 1/2` or `190.5`
    #[arg(long)]
    pub board_width: String,

    /// Router bit width
    #[arg(long)]
    pub bit_width: String,

    /// Router bit depth of cut
    #[arg(long)]
    pub bit_depth: String,

    /// Dovetail angle in degrees; 0 for a straight bit
    #[arg(long, default_value_t = 0.0)]
    pub bit_angle: f64,

    /// Number of board slots; slots beyond the first two are cauls
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub boards: u8,

    /// Joint layout
    #[arg(long, value_enum, default_value_t = LayoutArg::Equal)]
    pub spacing: LayoutArg,

    /// Equal layout: width of each cut
    #[arg(long)]
    pub cut_width: Option<String>,

    /// Equal layout: gap between cuts
    #[arg(long)]
    pub gap: Option<String>,

    /// Equal layout: start at the left end instead of centring
    #[arg(long)]
    pub left: bool,

    /// Variable layout: number of fingers
    #[arg(long)]
    pub fingers: Option<i64>,
}

#[derive(Args, Debug)]
pub struct TableArgs {
    /// Design file
    pub design: PathBuf,

    /// Output file; defaults to the next free table{N}.txt in the current directory
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Title line of the table
    #[arg(short, long)]
    pub title: Option<String>,

    /// Include the caul boards of the design
    #[arg(long)]
    pub cauls: bool,
}

/// Run a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    config.debug |= cli.debug;
    debug!("configuration: {:?}", config);

    match cli.command {
        Commands::New(args) => new_design(&args, &config),
        Commands::Info { design } => {
            let decoded = load_design(&design, &config)
                .with_context(|| format!("failed to read design {}", design.display()))?;
            print!("{}", describe(&decoded));
            Ok(())
        }
        Commands::Table(args) => {
            let cwd = std::env::current_dir().context("no current directory")?;
            let path = write_table(&args, &config, &cwd)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn new_design(args: &NewArgs, config: &Config) -> Result<()> {
    let system = if args.metric {
        MeasurementSystem::Metric
    } else {
        config.units.system
    };
    let increments = args.increments.or(config.units.num_increments);
    let units =
        UnitSystem::new(system, increments).with_separator(&config.units.english_separator);

    let length = |what: &str, text: &str| {
        units
            .string_to_increments(text)
            .with_context(|| format!("invalid {}", what))
    };

    let board_width = length("board width", &args.board_width)?;
    let bit = RouterBit::new(
        units.clone(),
        length("bit width", &args.bit_width)?,
        length("bit depth", &args.bit_depth)?,
        args.bit_angle,
    );
    let boards = board_set(&bit, board_width, args.boards as usize);
    let frame = JointFrame::from_boards(&bit, &boards, config)?;
    frame.validate()?;

    let spacing = match args.spacing {
        LayoutArg::Equal => {
            let mut params = EqualParams::for_bit(&bit);
            if let Some(text) = &args.cut_width {
                params.width = length("cut width", text)?;
            }
            if let Some(text) = &args.gap {
                params.spacing = length("gap", text)?;
            }
            params.centered = !args.left;
            params.validate(&frame)?;
            Spacing::Equal(EqualSpacing::with_params(frame, params))
        }
        LayoutArg::Variable => match args.fingers {
            Some(fingers) => {
                let params = VariableParams { fingers };
                params.validate(&frame)?;
                Spacing::Variable(VariableSpacing::with_params(frame, params))
            }
            None => Spacing::new(SpacingKind::Variable, frame),
        },
    };

    save_design(&args.out, &bit, &boards, &spacing, config)
        .with_context(|| format!("failed to save design {}", args.out.display()))?;
    info!(
        "saved {} with {} cuts to {}",
        spacing.description(),
        spacing.cuts().len(),
        args.out.display()
    );
    Ok(())
}

/// Human readable summary of a decoded design
pub fn describe(design: &DecodedDesign) -> String {
    let bit = &design.bit;
    let units = &bit.units;
    let mut out = String::new();

    let _ = writeln!(out, "Version:  {}", design.version);
    let _ = writeln!(
        out,
        "Units:    {} ({} increments per {})",
        units.system(),
        units.num_increments(),
        if units.is_metric() { "mm" } else { "inch" }
    );
    let _ = writeln!(
        out,
        "Bit:      width {}, depth {}, angle {}",
        units.increments_to_string(bit.width, true),
        units.increments_to_string(bit.depth, true),
        bit.angle
    );
    let active = design.boards.iter().filter(|b| b.active).count();
    let _ = writeln!(
        out,
        "Boards:   {} ({} active), width {}",
        design.boards.len(),
        active,
        design
            .boards
            .first()
            .map(|b| units.increments_to_string(b.width, true))
            .unwrap_or_default()
    );
    let _ = writeln!(out, "Spacing:  {}", design.spacing.description());
    for (i, cut) in design.spacing.cuts().iter().enumerate() {
        let passes: Vec<String> = cut
            .passes
            .iter()
            .map(|p| units.increments_to_string(*p, false))
            .collect();
        let _ = writeln!(
            out,
            "  cut {:>2}: {} to {}, passes at {}",
            i + 1,
            units.increments_to_string(cut.xmin, false),
            units.increments_to_string(cut.xmax, false),
            passes.join(", ")
        );
    }
    out
}

/// Where `table` writes when no `--out` is given
pub fn default_table_path(dir: &Path) -> Result<PathBuf> {
    let index = next_file_index(dir, TABLE_PREFIX, TABLE_SUFFIX)
        .with_context(|| format!("failed to scan {}", dir.display()))?;
    Ok(dir.join(format!("{}{}.{}", TABLE_PREFIX, index, TABLE_SUFFIX)))
}

/// Load a design, lay its cuts onto the boards and write the pass table.
/// Returns the path written.
pub fn write_table(args: &TableArgs, config: &Config, dir: &Path) -> Result<PathBuf> {
    let mut design = load_design(&args.design, config)
        .with_context(|| format!("failed to read design {}", args.design.display()))?;

    design.spacing.apply_to_boards(&mut design.boards);
    for caul in design.boards.iter_mut().skip(2) {
        caul.set_active(args.cauls);
    }

    let path = match &args.out {
        Some(path) => path.clone(),
        None => default_table_path(dir)?,
    };
    let title = args
        .title
        .clone()
        .unwrap_or_else(|| format!("RouterJig {}: {}", crate::VERSION, args.design.display()));

    print_table(&path, &design.boards, &title)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote pass table to {}", path.display());
    Ok(path)
}
