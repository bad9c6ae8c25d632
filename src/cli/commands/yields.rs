//! `sqt yield` command - Per-station yield summary

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::commands::utils::run_analysis;
use crate::cli::table::{yield_row, TableFormatter, TableRow, YIELD_COLUMNS};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct YieldArgs {
    /// Workbook to analyze (.xlsx, .xls, .xlsb, or .ods)
    pub workbook: PathBuf,
}

pub fn run(args: YieldArgs, global: &GlobalOpts) -> Result<()> {
    let analysis = run_analysis(&args.workbook, global)?;

    if global.format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&analysis.yields).into_diagnostic()?;
        println!("{}", json);
        return Ok(());
    }

    if analysis.yields.is_empty() {
        println!(
            "{}",
            style("No station sheets with OK/NG verdicts found.").yellow()
        );
        return Ok(());
    }

    let rows: Vec<TableRow> = analysis.yields.iter().map(yield_row).collect();
    TableFormatter::new(&YIELD_COLUMNS, "station").output(&rows, global.format)
}
