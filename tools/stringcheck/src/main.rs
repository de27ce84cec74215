//! stringcheck - PV string sizing check for VoltageEMS
//!
//! Loads a design file (panel, inverter, design temperature), applies the
//! NEC 690.7 cold-temperature Voc correction and reports whether a string
//! length stays within the inverter's maximum DC input voltage.

mod report;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use voltage_common::config::{load_sizing_config, save_config_to_file, SizingConfig};
use voltage_common::logging::{init_logging, LogConfigBuilder, LogFormat, WorkerGuard};
use voltage_sizing::StringSizer;

use crate::report::OutputFormat;

const EXIT_OK: u8 = 0;

/// Exit code when the checked string exceeds the inverter limit
const EXIT_CRITICAL: u8 = 2;

/// Widest range accepted by `sweep`
const MAX_SWEEP_ROWS: i64 = 1000;

#[derive(Parser)]
#[command(name = "stringcheck")]
#[command(about = "VoltageEMS PV string sizing check (NEC 690.7)")]
#[command(long_about = "VoltageEMS PV string sizing check (NEC 690.7)

Corrects module Voc for the coldest design temperature and checks the
series string voltage against the inverter's maximum DC input voltage.

Examples:
  stringcheck init                        # Write an example design file
  stringcheck validate -n 12              # Check a 12-module string
  stringcheck max-modules                 # Longest safe string
  stringcheck sweep --from 8 --to 16      # Table of string lengths
  PV_SIZING_MIN_TEMP_C=-25 stringcheck validate

Exit status of 'validate' is 2 when the string exceeds the limit.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Design file (.yaml, .yml, .toml or .json)
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        default_value = "stringcheck.yaml"
    )]
    config: PathBuf,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Also write logs to this file (rolled daily)
    #[arg(long = "log-file", global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a string length against the inverter limit
    Validate {
        /// Modules in series (default: modules_per_string from the design file)
        #[arg(short = 'n', long = "modules", allow_negative_numbers = true)]
        modules: Option<i64>,
    },

    /// Print the corrected maximum string voltage
    Voltage {
        /// Modules in series
        #[arg(short = 'n', long = "modules", allow_negative_numbers = true)]
        modules: i64,
    },

    /// Print the longest string that stays within the limit
    MaxModules,

    /// Validate every string length in a range
    Sweep {
        /// First string length
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        from: i64,

        /// Last string length (inclusive)
        #[arg(long, allow_negative_numbers = true)]
        to: i64,
    },

    /// Write an example design file
    Init {
        /// Output path (format chosen by extension)
        #[arg(short, long, default_value = "stringcheck.yaml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Configure colored output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
            return ExitCode::FAILURE;
        },
    };

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
            ExitCode::FAILURE
        },
    }
}

/// Install the log subscriber
///
/// Failing to open a requested `--log-file` is an error; any other setup
/// failure only costs console logs and is reported as a warning.
fn setup_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let mut log_config = LogConfigBuilder::new()
        .level(if cli.verbose { "debug" } else { "warn" })
        .format(LogFormat::Compact)
        .ansi(!cli.no_color);
    if let Some(path) = &cli.log_file {
        log_config = log_config.file(path);
    }

    match init_logging(&log_config.build()) {
        Ok(guard) => Ok(guard),
        Err(e) => match &cli.log_file {
            Some(path) => {
                Err(e).with_context(|| format!("Cannot write log file {}", path.display()))
            },
            None => {
                eprintln!("{} {}", "WARN".yellow(), e);
                Ok(None)
            },
        },
    }
}

fn load_design(cli: &Cli) -> Result<(SizingConfig, StringSizer)> {
    let design = load_sizing_config(&cli.config)
        .with_context(|| format!("Failed to load design {}", cli.config.display()))?;
    let sizer = design
        .build_sizer()
        .context("Design values rejected by the sizer")?;
    Ok((design, sizer))
}

/// Pick the string length from the flag, falling back to the design file
fn resolve_modules(flag: Option<i64>, design: &SizingConfig) -> Result<i64> {
    match flag.or(design.modules_per_string) {
        Some(modules) => Ok(modules),
        None => bail!("No string length given: pass -n/--modules or set modules_per_string"),
    }
}

/// Execute the parsed command, returning the process exit status
fn run(cli: &Cli) -> Result<u8> {
    match &cli.command {
        Commands::Validate { modules } => {
            let (design, sizer) = load_design(cli)?;
            let modules = resolve_modules(*modules, &design)?;
            let result = sizer.validate(modules);
            println!(
                "{}",
                report::render_validation(&sizer, modules, &result, cli.format)?
            );
            if result.valid {
                Ok(EXIT_OK)
            } else {
                Ok(EXIT_CRITICAL)
            }
        },
        Commands::Voltage { modules } => {
            let (_, sizer) = load_design(cli)?;
            let voltage = sizer.compute_corrected_voltage(*modules);
            println!("{}", report::render_voltage(*modules, voltage, cli.format)?);
            Ok(EXIT_OK)
        },
        Commands::MaxModules => {
            let (_, sizer) = load_design(cli)?;
            println!("{}", report::render_max_modules(&sizer, cli.format)?);
            Ok(EXIT_OK)
        },
        Commands::Sweep { from, to } => {
            check_sweep_range(*from, *to)?;
            let (_, sizer) = load_design(cli)?;
            let rows: Vec<_> = (*from..=*to).map(|n| (n, sizer.validate(n))).collect();
            debug!(from, to, rows = rows.len(), "sweep evaluated");
            println!("{}", report::render_sweep(&sizer, &rows, cli.format)?);
            Ok(EXIT_OK)
        },
        Commands::Init { output, force } => {
            if output.exists() && !force {
                bail!(
                    "{} already exists, use --force to overwrite",
                    output.display()
                );
            }
            save_config_to_file(&SizingConfig::example(), output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!(path = %output.display(), "example design written");
            println!(
                "{} {}",
                "Example design written to".bright_green(),
                output.display()
            );
            Ok(EXIT_OK)
        },
    }
}

fn check_sweep_range(from: i64, to: i64) -> Result<()> {
    if from > to {
        bail!("--from ({}) must not be greater than --to ({})", from, to);
    }
    if to.saturating_sub(from) >= MAX_SWEEP_ROWS {
        bail!("Sweep range is limited to {} rows", MAX_SWEEP_ROWS);
    }
    Ok(())
}
