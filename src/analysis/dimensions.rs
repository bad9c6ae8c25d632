//! Dimension and specification limit extraction

use std::collections::BTreeMap;

use crate::analysis::schema::HeaderSchema;
use crate::workbook::SheetGrid;

/// Header labels that never denote a measured dimension. Compared
/// against the trimmed, lowercased label.
const LABEL_DENYLIST: [&str; 16] = [
    "date",
    "time",
    "no.",
    "remark",
    "judge",
    "note",
    "supplier",
    "station",
    "model",
    "lot",
    "cavity",
    "nan",
    "",
    "config",
    "configuration",
    "type",
];

/// A measured dimension column with its specification limits.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    /// Column index in the sheet.
    pub column: usize,
    /// Label from the dimension header row, trimmed.
    pub label: String,
    pub usl: Option<f64>,
    pub lsl: Option<f64>,
}

/// All retained dimensions of a sheet, in column order.
#[derive(Debug, Default)]
pub struct DimensionTable {
    dimensions: Vec<Dimension>,
}

impl DimensionTable {
    /// Walk the dimension header row and pair each retained label with
    /// the limits parsed from the same column of the limit rows. A limit
    /// cell that fails to parse leaves that side open rather than
    /// discarding the dimension.
    pub fn extract(grid: &SheetGrid, schema: &HeaderSchema) -> Self {
        let usl_by_col = schema
            .usl_row
            .map(|row| limit_row(grid, row))
            .unwrap_or_default();
        let lsl_by_col = schema
            .lsl_row
            .map(|row| limit_row(grid, row))
            .unwrap_or_default();

        let mut dimensions = Vec::new();
        for col in 0..grid.width() {
            let label = grid.cell_text(schema.dimension_row, col).trim().to_string();
            if !is_dimension_label(&label) {
                continue;
            }
            dimensions.push(Dimension {
                column: col,
                label,
                usl: usl_by_col.get(&col).copied(),
                lsl: lsl_by_col.get(&col).copied(),
            });
        }
        Self { dimensions }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.iter()
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
}

/// Per-column numeric limits parsed from one limit row.
fn limit_row(grid: &SheetGrid, row: usize) -> BTreeMap<usize, f64> {
    (0..grid.width())
        .filter_map(|col| grid.cell_number(row, col).map(|value| (col, value)))
        .collect()
}

/// Labels must be longer than one character and off the denylist.
fn is_dimension_label(label: &str) -> bool {
    let lowered = label.to_lowercase();
    label.chars().count() > 1 && !LABEL_DENYLIST.contains(&lowered.as_str())
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
    fn test_extract_pairs_labels_with_limits() {
        let grid = text_grid(&[
            &["Dim. No", "P1", "P2", "Date"],
            &["USL", "13", "5.5", ""],
            &["LSL", "7", "", ""],
            &["1", "9.1", "5.0", "2025-03-01"],
        ]);
        let schema = HeaderSchema::resolve(&grid).unwrap();
        let table = DimensionTable::extract(&grid, &schema);

        let labels: Vec<&str> = table.iter().map(|d| d.label.as_str()).collect();
        // "Dim. No" is an ordinary label here; "Date" is denylisted.
        assert_eq!(labels, ["Dim. No", "P1", "P2"]);

        let p1 = table.iter().find(|d| d.label == "P1").unwrap();
        assert_eq!((p1.usl, p1.lsl), (Some(13.0), Some(7.0)));

        let p2 = table.iter().find(|d| d.label == "P2").unwrap();
        assert_eq!((p2.usl, p2.lsl), (Some(5.5), None));

        // The label column has header text in the limit rows, not numbers.
        let dim_no = table.iter().find(|d| d.label == "Dim. No").unwrap();
        assert_eq!((dim_no.usl, dim_no.lsl), (None, None));
    }

    #[test]
    fn test_denylisted_and_short_labels_are_dropped() {
        let grid = text_grid(&[
            &["Dim No", "Judge", "Remark", "Model", "X", "P1"],
            &["1", "OK", "", "CFG-A", "0", "9.1"],
        ]);
        let schema = HeaderSchema::resolve(&grid).unwrap();
        let table = DimensionTable::extract(&grid, &schema);

        let labels: Vec<&str> = table.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["Dim No", "P1"]);
    }

    #[test]
    fn test_denylist_is_case_insensitive() {
        let grid = text_grid(&[
            &["Dim No", "DATE", "Cavity", "P1"],
            &["1", "2025-03-01", "2", "9.1"],
        ]);
        let schema = HeaderSchema::resolve(&grid).unwrap();
        let table = DimensionTable::extract(&grid, &schema);

        let labels: Vec<&str> = table.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["Dim No", "P1"]);
    }

    #[test]
    fn test_unparseable_limit_leaves_side_open() {
        let grid = text_grid(&[
            &["Dim No", "P1"],
            &["USL", "TBD"],
            &["LSL", "7"],
            &["1", "9.1"],
        ]);
        let schema = HeaderSchema::resolve(&grid).unwrap();
        let table = DimensionTable::extract(&grid, &schema);

        let p1 = table.iter().find(|d| d.label == "P1").unwrap();
        assert_eq!((p1.usl, p1.lsl), (None, Some(7.0)));
    }

    #[test]
    fn test_missing_limit_rows_leave_all_limits_open() {
        let grid = text_grid(&[&["Dim No", "P1"], &["1", "9.1"]]);
        let schema = HeaderSchema::resolve(&grid).unwrap();
        let table = DimensionTable::extract(&grid, &schema);

        let p1 = table.iter().find(|d| d.label == "P1").unwrap();
        assert_eq!((p1.usl, p1.lsl), (None, None));
        assert_eq!(table.len(), 2);
    }
}
