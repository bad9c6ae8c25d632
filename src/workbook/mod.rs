//! Workbook module - opening files and reading sheets

pub mod grid;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Reader, Sheets};
use miette::Diagnostic;
use thiserror::Error;

pub use grid::SheetGrid;

#[derive(Debug, Error, Diagnostic)]
pub enum WorkbookError {
    #[error("cannot open workbook: {path}")]
    #[diagnostic(
        code(sqt::workbook::open),
        help("expected a readable .xlsx, .xls, .xlsb, or .ods file")
    )]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("cannot read sheet: {name}")]
    #[diagnostic(code(sqt::workbook::sheet))]
    Sheet {
        name: String,
        #[source]
        source: calamine::Error,
    },
}

/// An opened workbook. Sheet ranges are read on demand.
pub struct Workbook {
    sheets: Sheets<BufReader<File>>,
    names: Vec<String>,
}

impl std::fmt::Debug for Workbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook")
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

impl Workbook {
    /// Open a workbook of any supported format, detected by extension.
    pub fn open(path: &Path) -> Result<Self, WorkbookError> {
        let sheets = open_workbook_auto(path).map_err(|source| WorkbookError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let names = sheets.sheet_names().to_vec();
        Ok(Self { sheets, names })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> &[String] {
        &self.names
    }

    /// Read one sheet's used area as a grid.
    pub fn sheet(&mut self, name: &str) -> Result<SheetGrid, WorkbookError> {
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|source| WorkbookError::Sheet {
                name: name.to_string(),
                source,
            })?;
        Ok(SheetGrid::new(range))
    }
}
