//! `sar`: SAR workbook to configuration and bill of materials.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use catc_utils::{init_logging, AppConfig, ReportFormat};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sar",
    version,
    about = "Derive Cloud at Customer configurations and BOMs from SAR workbooks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Parts catalog JSON (overrides the configured parts_file)
    #[arg(short = 'p', long = "partsfile", global = true)]
    parts_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the configuration extracted from a SAR workbook as JSON
    Config {
        /// Path to the SAR workbook
        sarfile: PathBuf,
    },
    /// Print the BOM derived for every rack
    Bom {
        /// Path to the SAR workbook
        sarfile: PathBuf,
        /// Output format (text, json, csv)
        #[arg(long, default_value = "text")]
        format: ReportFormat,
    },
    /// Compare the BOM transcribed in the workbook with the derived one
    Diff {
        /// Path to the SAR workbook
        sarfile: PathBuf,
    },
    /// Print the parts catalog as JSON
    Partslist,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = AppConfig::load().context("Failed to load configuration")?;
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }
    if let Some(parts_file) = cli.parts_file {
        settings.parts_file = parts_file;
    }

    init_logging(&settings.logging)?;

    match cli.command {
        Commands::Config { sarfile } => commands::config::execute(&sarfile),
        Commands::Bom { sarfile, format } => {
            commands::bom::execute(&sarfile, &settings.parts_file, format)
        }
        Commands::Diff { sarfile } => commands::diff::execute(&sarfile, &settings.parts_file),
        Commands::Partslist => commands::partslist::execute(&settings.parts_file),
    }
}
