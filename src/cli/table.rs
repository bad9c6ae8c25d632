//! Table formatting utilities for CLI report output
//!
//! Both report tables flow through one formatter so every output format
//! agrees on columns and cell rendering. Aligned terminal output colors
//! the quality figures; CSV and Markdown renderings are plain.

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;
use crate::report::{CpkRecord, YieldRecord};

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Canonical station name (cyan colored)
    Station(String),
    /// Plain text, truncated to the column in aligned output
    Text(String),
    /// Group date (YYYY-MM-DD)
    Date(String),
    /// Unit or sample count
    Count(u64),
    /// Specification limit, blank when absent
    Limit(Option<f64>),
    /// Cpk value with color coding (>=1.33 green, >=1.0 yellow, else red)
    Cpk(Option<f64>),
    /// Yield ratio shown as a percentage (>=99.73% green, >=95% yellow, else red)
    YieldPct(f64),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Format for aligned output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Station(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", style(&truncated).cyan(), width = width)
            }
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", truncated, width = width)
            }
            CellValue::Date(s) => {
                format!("{:<width$}", s, width = width)
            }
            CellValue::Count(n) => {
                format!("{:>width$}", n, width = width)
            }
            CellValue::Limit(opt) => match opt {
                Some(v) => format!("{:>width$}", v, width = width),
                None => format!("{:>width$}", "-", width = width),
            },
            CellValue::Cpk(opt) => {
                let styled = match opt {
                    Some(c) => {
                        let s = format!("{:.3}", c);
                        if *c >= 1.33 {
                            style(s).green()
                        } else if *c >= 1.0 {
                            style(s).yellow()
                        } else {
                            style(s).red()
                        }
                    }
                    None => style("-".to_string()).dim(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::YieldPct(ratio) => {
                let s = format!("{:.2}%", ratio * 100.0);
                let styled = if *ratio >= 0.9973 {
                    style(s).green()
                } else if *ratio >= 0.95 {
                    style(s).yellow()
                } else {
                    style(s).red()
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Empty => format!("{:<width$}", "-", width = width),
        }
    }

    /// Plain value for CSV output; the writer handles quoting
    pub fn format_csv(&self) -> String {
        match self {
            CellValue::Station(s) | CellValue::Text(s) | CellValue::Date(s) => s.clone(),
            CellValue::Count(n) => n.to_string(),
            CellValue::Limit(opt) => opt.map(|v| v.to_string()).unwrap_or_default(),
            CellValue::Cpk(opt) => opt.map(|c| format!("{:.3}", c)).unwrap_or_default(),
            CellValue::YieldPct(ratio) => format!("{:.2}%", ratio * 100.0),
            CellValue::Empty => String::new(),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        let raw = match self {
            CellValue::Station(s) | CellValue::Text(s) | CellValue::Date(s) => s.clone(),
            CellValue::Count(n) => n.to_string(),
            CellValue::Limit(opt) => opt
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
            CellValue::Cpk(opt) => opt
                .map(|c| format!("{:.3}", c))
                .unwrap_or_else(|| "-".to_string()),
            CellValue::YieldPct(ratio) => format!("{:.2}%", ratio * 100.0),
            CellValue::Empty => "-".to_string(),
        };
        raw.replace('|', "\\|")
    }

    /// Get the display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Station(s) | CellValue::Text(s) | CellValue::Date(s) => s.chars().count(),
            CellValue::Count(n) => n.to_string().len(),
            CellValue::Limit(opt) => opt.map_or(1, |v| v.to_string().len()),
            CellValue::Cpk(opt) => opt.map_or(1, |c| format!("{:.3}", c).len()),
            CellValue::YieldPct(_) => 7, // "100.00%"
            CellValue::Empty => 1,
        }
    }
}

/// Column definition with header label and width cap
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
#[derive(Default)]
pub struct TableRow {
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    row_noun: &'static str,
    show_summary: bool,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], row_noun: &'static str) -> Self {
        Self {
            columns,
            row_noun,
            show_summary: true,
        }
    }

    /// Disable the trailing summary line (for piping or embedding)
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }

    /// Output rows in the specified format
    pub fn output(&self, rows: &[TableRow], format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Csv => print!("{}", self.render_csv(rows)?),
            OutputFormat::Md => print!("{}", self.render_md(rows)),
            _ => self.output_tsv(rows),
        }
        Ok(())
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let header_len = col.header.len();
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(|v| v.display_width())
                    .max()
                    .unwrap_or(0);

                // +2 buffer matches the truncation margin of text cells.
                // The defined width caps expansion; shrinking is fine.
                let natural_width = header_len.max(max_content.saturating_add(2));
                natural_width.min(col.width)
            })
            .collect()
    }

    fn output_tsv(&self, rows: &[TableRow]) {
        let widths = self.calculate_widths(rows);

        let header_parts: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, width)| format!("{:<width$}", style(col.header).bold(), width = width))
            .collect();
        println!("{}", header_parts.join(" "));

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        println!("{}", "-".repeat(total_width));

        for row in rows {
            let row_parts: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, width)| match row.get(col.key) {
                    Some(value) => value.format_tsv(*width),
                    None => format!("{:<width$}", "-", width = width),
                })
                .collect();
            println!("{}", row_parts.join(" "));
        }

        if self.show_summary {
            println!();
            println!("{} {}(s)", style(rows.len()).cyan(), self.row_noun);
        }
    }

    /// CSV rendering, exposed for capture in tests
    pub fn render_csv(&self, rows: &[TableRow]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(self.columns.iter().map(|c| c.header))
            .into_diagnostic()?;
        for row in rows {
            let record: Vec<String> = self
                .columns
                .iter()
                .map(|col| row.get(col.key).map(CellValue::format_csv).unwrap_or_default())
                .collect();
            writer.write_record(&record).into_diagnostic()?;
        }
        let data = writer
            .into_inner()
            .map_err(|e| miette::miette!("cannot finish CSV output: {e}"))?;
        String::from_utf8(data).into_diagnostic()
    }

    /// Markdown rendering, exposed for capture in tests
    pub fn render_md(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();

        let headers: Vec<&str> = self.columns.iter().map(|c| c.header).collect();
        out.push_str(&format!("| {} |\n", headers.join(" | ")));

        let separators: Vec<&str> = headers.iter().map(|_| "---").collect();
        out.push_str(&format!("|{}|\n", separators.join("|")));

        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|col| {
                    row.get(col.key)
                        .map(CellValue::format_md)
                        .unwrap_or_else(|| "-".to_string())
                })
                .collect();
            out.push_str(&format!("| {} |\n", values.join(" | ")));
        }

        out
    }
}

pub const YIELD_COLUMNS: [ColumnDef; 5] = [
    ColumnDef::new("station", "Station", 32),
    ColumnDef::new("total", "Total Qty", 10),
    ColumnDef::new("ok", "OK Qty", 8),
    ColumnDef::new("ng", "NG Qty", 8),
    ColumnDef::new("yield", "Yield", 9),
];

pub const CPK_COLUMNS: [ColumnDef; 8] = [
    ColumnDef::new("station", "Station", 32),
    ColumnDef::new("dim_no", "Dim No", 16),
    ColumnDef::new("config", "config", 14),
    ColumnDef::new("date", "Date", 10),
    ColumnDef::new("samples", "Sample Size", 11),
    ColumnDef::new("usl", "USL", 9),
    ColumnDef::new("lsl", "LSL", 9),
    ColumnDef::new("cpk", "CPK", 8),
];

pub fn yield_row(record: &YieldRecord) -> TableRow {
    TableRow::new()
        .cell("station", CellValue::Station(record.station.clone()))
        .cell("total", CellValue::Count(u64::from(record.total())))
        .cell("ok", CellValue::Count(u64::from(record.ok)))
        .cell("ng", CellValue::Count(u64::from(record.ng)))
        .cell("yield", CellValue::YieldPct(record.ratio()))
}

pub fn cpk_row(record: &CpkRecord) -> TableRow {
    TableRow::new()
        .cell("station", CellValue::Station(record.station.clone()))
        .cell("dim_no", CellValue::Text(record.dimension.clone()))
        .cell("config", CellValue::Text(record.config.clone()))
        .cell("date", CellValue::Date(record.date.clone()))
        .cell("samples", CellValue::Count(record.sample_size as u64))
        .cell("usl", CellValue::Limit(record.usl))
        .cell("lsl", CellValue::Limit(record.lsl))
        .cell("cpk", CellValue::Cpk(record.cpk_rounded()))
}
