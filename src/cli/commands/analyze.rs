//! `sqt analyze` command - Combined yield and capability report

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::analysis::Analysis;
use crate::cli::commands::utils::run_analysis;
use crate::cli::table::{cpk_row, yield_row, TableFormatter, TableRow, CPK_COLUMNS, YIELD_COLUMNS};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::report::excel;

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// Workbook to analyze (.xlsx, .xls, .xlsb, or .ods)
    pub workbook: PathBuf,

    /// Write an Excel report (Yield Summary and CPK Detail sheets) to this path
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: AnalyzeArgs, global: &GlobalOpts) -> Result<()> {
    let analysis = run_analysis(&args.workbook, global)?;

    if let Some(ref path) = args.output {
        excel::write_report(path, &analysis.yields, &analysis.cpks)?;
        if !global.quiet {
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => print_json(&analysis),
        OutputFormat::Md => {
            print!("{}", render_markdown(&analysis));
            Ok(())
        }
        OutputFormat::Csv => print_csv(&analysis),
        _ => print_tables(&analysis, global.format),
    }
}

fn print_json(analysis: &Analysis) -> Result<()> {
    let combined = serde_json::json!({
        "yield": analysis.yields,
        "cpk": analysis.cpks,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&combined).into_diagnostic()?
    );
    Ok(())
}

fn print_csv(analysis: &Analysis) -> Result<()> {
    let yield_rows: Vec<TableRow> = analysis.yields.iter().map(yield_row).collect();
    let cpk_rows: Vec<TableRow> = analysis.cpks.iter().map(cpk_row).collect();

    let yields = TableFormatter::new(&YIELD_COLUMNS, "station").render_csv(&yield_rows)?;
    let cpks = TableFormatter::new(&CPK_COLUMNS, "capability row").render_csv(&cpk_rows)?;

    // Two tables on one stream, separated by a blank line.
    print!("{}", yields);
    println!();
    print!("{}", cpks);
    Ok(())
}

fn print_tables(analysis: &Analysis, format: OutputFormat) -> Result<()> {
    println!("{}", style("Yield Summary").bold());
    println!();
    if analysis.yields.is_empty() {
        println!(
            "{}",
            style("No station sheets with OK/NG verdicts found.").yellow()
        );
    } else {
        let rows: Vec<TableRow> = analysis.yields.iter().map(yield_row).collect();
        TableFormatter::new(&YIELD_COLUMNS, "station").output(&rows, format)?;
    }

    println!();
    println!("{}", style("Process Capability").bold());
    println!();
    if analysis.cpks.is_empty() {
        println!(
            "{}",
            style("No dimension measurements with headers found.").yellow()
        );
    } else {
        let rows: Vec<TableRow> = analysis.cpks.iter().map(cpk_row).collect();
        TableFormatter::new(&CPK_COLUMNS, "capability row").output(&rows, format)?;
    }

    Ok(())
}

fn render_markdown(analysis: &Analysis) -> String {
    let mut output = String::new();
    output.push_str("# Station Quality Report\n\n");

    output.push_str("## Yield Summary\n\n");
    if analysis.yields.is_empty() {
        output.push_str("No station sheets with OK/NG verdicts.\n");
    } else {
        let mut builder = Builder::default();
        builder.push_record(["Station", "Total Qty", "OK Qty", "NG Qty", "Yield"]);
        for record in &analysis.yields {
            builder.push_record([
                record.station.clone(),
                record.total().to_string(),
                record.ok.to_string(),
                record.ng.to_string(),
                record.percentage(),
            ]);
        }
        output.push_str(&builder.build().with(Style::markdown()).to_string());
        output.push('\n');
    }

    output.push_str("\n## Process Capability\n\n");
    if analysis.cpks.is_empty() {
        output.push_str("No dimension measurements with headers.\n");
    } else {
        let mut builder = Builder::default();
        builder.push_record([
            "Station",
            "Dim No",
            "config",
            "Date",
            "Sample Size",
            "USL",
            "LSL",
            "CPK",
        ]);
        for record in &analysis.cpks {
            builder.push_record([
                record.station.clone(),
                record.dimension.clone(),
                record.config.clone(),
                record.date.clone(),
                record.sample_size.to_string(),
                record
                    .usl
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                record
                    .lsl
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                record
                    .cpk_rounded()
                    .map(|v| format!("{:.3}", v))
                    .unwrap_or_else(|| "-".to_string()),
            ]);
        }
        output.push_str(&builder.build().with(Style::markdown()).to_string());
        output.push('\n');
    }

    output.push_str(&format!(
        "\n---\n\n*Generated: {}*\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::capability::Capability;
    use crate::report::{CpkRecord, YieldRecord};

    #[test]
    fn test_render_markdown_sections() {
        let analysis = Analysis {
            yields: vec![YieldRecord {
                station: "DE OQC".to_string(),
                ok: 39,
                ng: 1,
            }],
            cpks: vec![CpkRecord {
                station: "DE OQC".to_string(),
                dimension: "G1".to_string(),
                config: "CFG-A".to_string(),
                date: "2025-03-01".to_string(),
                sample_size: 3,
                usl: Some(13.0),
                lsl: Some(7.0),
                cpk: Capability::Computed(1.0),
            }],
            outcomes: Vec::new(),
        };

        let md = render_markdown(&analysis);
        assert!(md.starts_with("# Station Quality Report\n"));
        assert!(md.contains("## Yield Summary"));
        assert!(md.contains("## Process Capability"));
        assert!(md.contains("| DE OQC"));
        assert!(md.contains("97.50%"));
        assert!(md.contains("*Generated: "));
    }

    #[test]
    fn test_render_markdown_empty_analysis() {
        let md = render_markdown(&Analysis::default());
        assert!(md.contains("No station sheets with OK/NG verdicts.\n"));
        assert!(md.contains("No dimension measurements with headers.\n"));
    }
}
