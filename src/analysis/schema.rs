//! Header row location and per-sheet schema resolution
//!
//! Station sheets bury their header rows under preamble (titles, logos,
//! merged banner rows), at a different depth per sheet. The schema is
//! located once by keyword scan and then handed unchanged to every later
//! stage, so all stages agree on where the data region starts.

use std::sync::OnceLock;

use regex::Regex;

use crate::workbook::SheetGrid;

/// Accepted spellings of the dimension-label header.
const DIMENSION_KEYWORDS: [&str; 3] = ["dim. no", "dim no", "dim.no"];
const USL_KEYWORDS: [&str; 1] = ["usl"];
const LSL_KEYWORDS: [&str; 1] = ["lsl"];

/// Header rows are expected within this many rows of the top.
const HEADER_SCAN_ROWS: usize = 60;

/// Header labels marking the configuration column.
const CONFIG_KEYWORDS: [&str; 4] = ["config", "model", "type", "description"];

/// Only the leftmost columns are considered for the date column.
const DATE_SCAN_COLS: usize = 15;

static DATE_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Matches ISO-style dates of this decade anywhere in a cell, including
/// inside datetime renderings like "2025-03-01 14:02:11".
pub fn date_pattern() -> &'static Regex {
    DATE_PATTERN.get_or_init(|| Regex::new(r"202\d-\d{2}-\d{2}").expect("valid regex"))
}

/// First date found in a cell's text.
pub fn extract_date(text: &str) -> Option<String> {
    date_pattern().find(text).map(|m| m.as_str().to_string())
}

/// Layout of one sheet, resolved once per sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSchema {
    /// Row holding the dimension labels.
    pub dimension_row: usize,
    /// Row holding upper specification limits, when present.
    pub usl_row: Option<usize>,
    /// Row holding lower specification limits, when present.
    pub lsl_row: Option<usize>,
    /// Column holding the configuration, when present.
    pub config_col: Option<usize>,
    /// Column holding dates, when present.
    pub date_col: Option<usize>,
    /// First row of the data region, just below the deepest header row.
    pub data_start: usize,
}

impl HeaderSchema {
    /// Locate the header rows and key columns of a sheet. Returns None
    /// when no dimension row exists, which disables capability
    /// extraction for the sheet.
    pub fn resolve(grid: &SheetGrid) -> Option<Self> {
        let dimension_row = find_keyword_row(grid, &DIMENSION_KEYWORDS)?;
        let usl_row = find_keyword_row(grid, &USL_KEYWORDS);
        let lsl_row = find_keyword_row(grid, &LSL_KEYWORDS);
        let deepest = [Some(dimension_row), usl_row, lsl_row]
            .into_iter()
            .flatten()
            .max()
            .unwrap_or(dimension_row);
        let data_start = deepest + 1;
        Some(Self {
            dimension_row,
            usl_row,
            lsl_row,
            config_col: find_config_column(grid, dimension_row),
            date_col: find_date_column(grid, data_start),
            data_start,
        })
    }
}

/// Topmost row within the scan window whose joined text contains any of
/// the keywords.
fn find_keyword_row(grid: &SheetGrid, keywords: &[&str]) -> Option<usize> {
    let rows = grid.height().min(HEADER_SCAN_ROWS);
    (0..rows).find(|&row| {
        let text = grid.row_text(row);
        keywords.iter().any(|keyword| text.contains(keyword))
    })
}

/// Leftmost header cell naming a configuration-like column.
fn find_config_column(grid: &SheetGrid, header_row: usize) -> Option<usize> {
    (0..grid.width()).find(|&col| {
        let label = grid.cell_text(header_row, col).trim().to_lowercase();
        CONFIG_KEYWORDS.iter().any(|keyword| label.contains(keyword))
    })
}

/// Leftmost scanned column with a date anywhere in its data region.
fn find_date_column(grid: &SheetGrid, data_start: usize) -> Option<usize> {
    let re = date_pattern();
    let cols = grid.width().min(DATE_SCAN_COLS);
    (0..cols).find(|&col| {
        (data_start..grid.height()).any(|row| re.is_match(&grid.cell_text(row, col)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Range};

    fn text_grid(rows: &[&[&str]]) -> SheetGrid {
        let height = rows.len().max(1) as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(1) as u32;
        let mut range = Range::new((0, 0), (height - 1, width.max(1) - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if !cell.is_empty() {
                    range.set_value((r as u32, c as u32), Data::String((*cell).to_string()));
                }
            }
        }
        SheetGrid::new(range)
    }

    #[test]
    fn test_resolve_locates_header_rows() {
        let grid = text_grid(&[
            &["Station Report"],
            &[""],
            &["Dim. No", "P1", "P2"],
            &["USL", "13", "5.5"],
            &["LSL", "7", "4.5"],
            &["1", "9.1", "5.0"],
        ]);
        let schema = HeaderSchema::resolve(&grid).unwrap();
        assert_eq!(schema.dimension_row, 2);
        assert_eq!(schema.usl_row, Some(3));
        assert_eq!(schema.lsl_row, Some(4));
        assert_eq!(schema.data_start, 5);
    }

    #[test]
    fn test_resolve_accepts_keywords_spanning_cells() {
        let grid = text_grid(&[&["Dim", "No", "P1"], &["1", "x", "9.1"]]);
        let schema = HeaderSchema::resolve(&grid).unwrap();
        assert_eq!(schema.dimension_row, 0);
        assert_eq!(schema.data_start, 1);
    }

    #[test]
    fn test_resolve_without_limit_rows() {
        let grid = text_grid(&[&["Dim No", "P1"], &["1", "9.1"]]);
        let schema = HeaderSchema::resolve(&grid).unwrap();
        assert_eq!(schema.usl_row, None);
        assert_eq!(schema.lsl_row, None);
        assert_eq!(schema.data_start, 1);
    }

    #[test]
    fn test_resolve_fails_without_dimension_row() {
        let grid = text_grid(&[&["Some", "other", "sheet"], &["1", "2", "3"]]);
        assert_eq!(HeaderSchema::resolve(&grid), None);
    }

    #[test]
    fn test_resolve_ignores_headers_below_scan_window() {
        let mut rows: Vec<Vec<&str>> = (0..70).map(|_| vec![""]).collect();
        rows[65] = vec!["Dim. No"];
        let refs: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        assert_eq!(HeaderSchema::resolve(&text_grid(&refs)), None);
    }

    #[test]
    fn test_config_column_detection() {
        let grid = text_grid(&[
            &["Dim. No", "Model", "P1"],
            &["1", "CFG-A", "9.1"],
        ]);
        let schema = HeaderSchema::resolve(&grid).unwrap();
        assert_eq!(schema.config_col, Some(1));
    }

    #[test]
    fn test_date_column_detection() {
        let grid = text_grid(&[
            &["Dim. No", "Date", "P1"],
            &["1", "2025-03-01", "9.1"],
            &["2", "2025-03-02 10:15:00", "9.3"],
        ]);
        let schema = HeaderSchema::resolve(&grid).unwrap();
        assert_eq!(schema.date_col, Some(1));
    }

    #[test]
    fn test_date_column_requires_date_shaped_data() {
        let grid = text_grid(&[
            &["Dim. No", "Date", "P1"],
            &["1", "March 1st", "9.1"],
        ]);
        let schema = HeaderSchema::resolve(&grid).unwrap();
        assert_eq!(schema.date_col, None);
    }

    #[test]
    fn test_extract_date_takes_first_match() {
        assert_eq!(extract_date("2025-03-01 14:02:11"), Some("2025-03-01".to_string()));
        assert_eq!(
            extract_date("from 2025-03-01 to 2025-03-05"),
            Some("2025-03-01".to_string())
        );
        assert_eq!(extract_date("no date here"), None);
        assert_eq!(extract_date("2019-03-01"), None);
    }
}
