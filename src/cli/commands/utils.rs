//! Shared utilities for CLI commands

use console::style;
use miette::Result;
use std::path::Path;

use crate::analysis::{Analysis, Analyzer, SkipReason};
use crate::cli::GlobalOpts;
use crate::core::Config;

/// Load the station catalog, open the workbook, and run the full analysis.
///
/// Per-sheet status goes to stderr so the data output stays pipeable.
pub fn run_analysis(workbook: &Path, global: &GlobalOpts) -> Result<Analysis> {
    let config = Config::load();
    let catalog = config.catalog(global.stations.as_deref())?;

    let analyzer = Analyzer::new(&catalog);
    let analysis = analyzer.analyze_path(workbook)?;

    if !global.quiet {
        print_outcomes(&analysis, global.verbose);
    }

    Ok(analysis)
}

/// Report per-sheet dispositions and a one-line summary on stderr.
///
/// Unreadable sheets are always warned about; matched and unmatched
/// sheets are only listed under --verbose.
fn print_outcomes(analysis: &Analysis, verbose: bool) {
    for outcome in &analysis.outcomes {
        match (&outcome.station, &outcome.skip) {
            (Some(station), None) => {
                if verbose {
                    let mut notes: Vec<String> = Vec::new();
                    if outcome.yield_found {
                        notes.push("yield".to_string());
                    }
                    if outcome.cpk_records > 0 {
                        notes.push(format!("{} cpk", outcome.cpk_records));
                    }
                    let detail = if notes.is_empty() {
                        "no data".to_string()
                    } else {
                        notes.join(", ")
                    };
                    eprintln!(
                        "{} {} as {} ({})",
                        style("✓").green(),
                        outcome.sheet,
                        style(station).cyan(),
                        detail
                    );
                }
            }
            (_, Some(reason)) => {
                let warn = matches!(reason, SkipReason::Unreadable(_));
                if verbose || warn {
                    let mark = if warn {
                        style("⚠").yellow()
                    } else {
                        style("○").dim()
                    };
                    eprintln!("{} {} ({})", mark, style(&outcome.sheet).dim(), reason);
                }
            }
            (None, None) => {}
        }
    }

    eprintln!(
        "{} sheet(s) analyzed, {} skipped, {} yield row(s), {} capability row(s)",
        style(analysis.processed_sheets()).cyan(),
        analysis.skipped_sheets(),
        analysis.yields.len(),
        analysis.cpks.len()
    );
}
