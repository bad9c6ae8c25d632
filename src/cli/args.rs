//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    analyze::AnalyzeArgs, completions::CompletionsArgs, cpk::CpkArgs, stations::StationsArgs,
    yields::YieldArgs,
};
use crate::core::Config;

#[derive(Parser)]
#[command(name = "sqt")]
#[command(author, version, about = "Station Quality Toolkit")]
#[command(long_about = "A toolkit for deriving per-station yield and process capability (CPK) reports from manufacturing test station workbooks.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress per-sheet status output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Station catalog file (default: built-in catalog)
    #[arg(long, global = true)]
    pub stations: Option<PathBuf>,
}

impl GlobalOpts {
    /// Apply the configured default format when the flag was left at auto.
    pub fn resolve_format(&mut self, config: &Config) {
        if self.format == OutputFormat::Auto {
            if let Some(name) = config.default_format.as_deref() {
                if let Ok(format) = OutputFormat::from_str(name, true) {
                    self.format = format;
                }
            }
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a workbook: print both report tables, optionally write
    /// a report workbook
    Analyze(AnalyzeArgs),

    /// Print the per-station yield table for a workbook
    Yield(YieldArgs),

    /// Print the per-dimension CPK table for a workbook
    Cpk(CpkArgs),

    /// Show the station catalog
    Stations(StationsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned columns for terminals
    #[default]
    Auto,
    /// Tab-separated values (for piping)
    Tsv,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// JSON format (for programming)
    Json,
}
