//! `sqt cpk` command - Process capability by dimension and build group

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::commands::utils::run_analysis;
use crate::cli::table::{cpk_row, TableFormatter, TableRow, CPK_COLUMNS};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct CpkArgs {
    /// Workbook to analyze (.xlsx, .xls, .xlsb, or .ods)
    pub workbook: PathBuf,

    /// Only show rows for this station (canonical name, case-insensitive)
    #[arg(long, short = 's')]
    pub station: Option<String>,
}

pub fn run(args: CpkArgs, global: &GlobalOpts) -> Result<()> {
    let analysis = run_analysis(&args.workbook, global)?;

    let records: Vec<_> = match &args.station {
        Some(wanted) => analysis
            .cpks
            .iter()
            .filter(|r| r.station.eq_ignore_ascii_case(wanted))
            .collect(),
        None => analysis.cpks.iter().collect(),
    };

    if global.format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&records).into_diagnostic()?;
        println!("{}", json);
        return Ok(());
    }

    if records.is_empty() {
        println!(
            "{}",
            style("No dimension measurements with headers found.").yellow()
        );
        return Ok(());
    }

    let rows: Vec<TableRow> = records.iter().map(|r| cpk_row(r)).collect();
    TableFormatter::new(&CPK_COLUMNS, "capability row").output(&rows, global.format)
}
