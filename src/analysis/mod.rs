//! Analysis module - the per-sheet pipeline
//!
//! A workbook run is best effort: the workbook itself must open, but a
//! sheet that cannot be matched, read, or parsed only skips that sheet.
//! Every sheet leaves an outcome behind for status reporting.

pub mod capability;
pub mod dimensions;
pub mod groups;
pub mod schema;
pub mod yields;

use std::fmt;
use std::path::Path;

use crate::core::StationCatalog;
use crate::report::{self, CpkRecord, YieldRecord};
use crate::workbook::{SheetGrid, Workbook, WorkbookError};

/// Why a sheet was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Sheet name resolved to no station.
    NoStationMatch,
    /// Sheet could not be read from the workbook.
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoStationMatch => write!(f, "no station match"),
            SkipReason::Unreadable(message) => write!(f, "unreadable: {message}"),
        }
    }
}

/// Processing summary for one sheet.
#[derive(Debug, Clone)]
pub struct SheetOutcome {
    /// Sheet name as it appears in the workbook.
    pub sheet: String,
    /// Canonical station, when the name resolved.
    pub station: Option<String>,
    /// Present when the sheet contributed nothing.
    pub skip: Option<SkipReason>,
    /// Whether a judgement column was found.
    pub yield_found: bool,
    /// Capability records contributed by the sheet.
    pub cpk_records: usize,
}

/// Everything one workbook produced.
#[derive(Debug, Default)]
pub struct Analysis {
    pub yields: Vec<YieldRecord>,
    pub cpks: Vec<CpkRecord>,
    pub outcomes: Vec<SheetOutcome>,
}

impl Analysis {
    pub fn processed_sheets(&self) -> usize {
        self.outcomes.iter().filter(|o| o.skip.is_none()).count()
    }

    pub fn skipped_sheets(&self) -> usize {
        self.outcomes.iter().filter(|o| o.skip.is_some()).count()
    }
}

/// Workbook analyzer. The station catalog is fixed at construction, so
/// every sheet of a run is matched against the same catalog.
pub struct Analyzer<'a> {
    catalog: &'a StationCatalog,
}

impl<'a> Analyzer<'a> {
    pub fn new(catalog: &'a StationCatalog) -> Self {
        Self { catalog }
    }

    /// Open and analyze a workbook file.
    pub fn analyze_path(&self, path: &Path) -> Result<Analysis, WorkbookError> {
        let mut workbook = Workbook::open(path)?;
        Ok(self.analyze(&mut workbook))
    }

    /// Analyze every sheet of an opened workbook. Result tables come out
    /// in report order: yield rows by station order, capability rows by
    /// station order, dimension label, then date.
    pub fn analyze(&self, workbook: &mut Workbook) -> Analysis {
        let mut analysis = Analysis::default();
        for name in workbook.sheet_names().to_vec() {
            let Some(station) = self.catalog.resolve(&name).map(str::to_string) else {
                analysis.outcomes.push(SheetOutcome {
                    sheet: name,
                    station: None,
                    skip: Some(SkipReason::NoStationMatch),
                    yield_found: false,
                    cpk_records: 0,
                });
                continue;
            };
            let grid = match workbook.sheet(&name) {
                Ok(grid) => grid,
                Err(err) => {
                    analysis.outcomes.push(SheetOutcome {
                        sheet: name,
                        station: Some(station),
                        skip: Some(SkipReason::Unreadable(err.to_string())),
                        yield_found: false,
                        cpk_records: 0,
                    });
                    continue;
                }
            };
            let (yield_record, cpk_records) = self.analyze_sheet(&station, &grid);
            analysis.outcomes.push(SheetOutcome {
                sheet: name,
                station: Some(station),
                skip: None,
                yield_found: yield_record.is_some(),
                cpk_records: cpk_records.len(),
            });
            analysis.yields.extend(yield_record);
            analysis.cpks.extend(cpk_records);
        }
        report::sort_yield_records(&mut analysis.yields, self.catalog);
        report::sort_cpk_records(&mut analysis.cpks, self.catalog);
        analysis
    }

    /// Yield and capability extraction for one matched sheet. Each half
    /// degrades independently: a sheet without a judgement column can
    /// still produce capability rows and vice versa.
    fn analyze_sheet(&self, station: &str, grid: &SheetGrid) -> (Option<YieldRecord>, Vec<CpkRecord>) {
        let yield_record = yields::extract_yield(grid).map(|counts| YieldRecord {
            station: station.to_string(),
            ok: counts.ok,
            ng: counts.ng,
        });
        let cpk_records = match schema::HeaderSchema::resolve(grid) {
            Some(schema) => {
                let dims = dimensions::DimensionTable::extract(grid, &schema);
                groups::aggregate(station, grid, &schema, &dims)
            }
            None => Vec::new(),
        };
        (yield_record, cpk_records)
    }
}
