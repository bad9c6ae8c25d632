//! Report workbook serialization
//!
//! Writes the two result tables into a fresh workbook: a "Yield
//! Summary" sheet and a "CPK Detail" sheet. Counts, limits, and indices
//! are written as numbers so downstream spreadsheets can keep
//! calculating with them; the yield percentage is written as text to
//! preserve its fixed two-decimal rendering.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;

use crate::report::{CpkRecord, YieldRecord};

const YIELD_SHEET: &str = "Yield Summary";
const CPK_SHEET: &str = "CPK Detail";

const YIELD_HEADERS: [&str; 5] = ["Station", "Total Qty", "OK Qty", "NG Qty", "Yield"];
const CPK_HEADERS: [&str; 8] = [
    "Station",
    "Dim No",
    "config",
    "Date",
    "Sample Size",
    "USL",
    "LSL",
    "CPK",
];

#[derive(Debug, Error, Diagnostic)]
#[error("cannot write report workbook: {path}")]
#[diagnostic(code(sqt::report::write))]
pub struct ReportError {
    pub path: PathBuf,
    #[source]
    pub source: XlsxError,
}

/// Write both result tables to `path`.
pub fn write_report(
    path: &Path,
    yields: &[YieldRecord],
    cpks: &[CpkRecord],
) -> Result<(), ReportError> {
    build_report(yields, cpks)
        .and_then(|mut workbook| workbook.save(path))
        .map_err(|source| ReportError {
            path: path.to_path_buf(),
            source,
        })
}

fn build_report(yields: &[YieldRecord], cpks: &[CpkRecord]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet().set_name(YIELD_SHEET)?;
    for (col, title) in YIELD_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }
    for (idx, record) in yields.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, &record.station)?;
        sheet.write_number(row, 1, f64::from(record.total()))?;
        sheet.write_number(row, 2, f64::from(record.ok))?;
        sheet.write_number(row, 3, f64::from(record.ng))?;
        sheet.write_string(row, 4, record.percentage())?;
    }
    sheet.set_column_width(0, 32)?;

    let sheet = workbook.add_worksheet().set_name(CPK_SHEET)?;
    for (col, title) in CPK_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }
    for (idx, record) in cpks.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, &record.station)?;
        sheet.write_string(row, 1, &record.dimension)?;
        sheet.write_string(row, 2, &record.config)?;
        sheet.write_string(row, 3, &record.date)?;
        sheet.write_number(row, 4, record.sample_size as f64)?;
        if let Some(usl) = record.usl {
            sheet.write_number(row, 5, usl)?;
        }
        if let Some(lsl) = record.lsl {
            sheet.write_number(row, 6, lsl)?;
        }
        if let Some(cpk) = record.cpk_rounded() {
            sheet.write_number(row, 7, cpk)?;
        }
    }
    sheet.set_column_width(0, 32)?;
    sheet.set_column_width(1, 14)?;

    Ok(workbook)
}
