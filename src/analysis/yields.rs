//! Pass/fail yield extraction
//!
//! Judgement columns are not declared anywhere; the column densest in
//! OK/NG markers is taken to be the per-unit judgement column.

use crate::workbook::SheetGrid;

/// Only the leftmost columns are scanned for judgement markers.
const MARKER_SCAN_COLS: usize = 30;

/// OK/NG tallies for one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YieldCounts {
    pub ok: u32,
    pub ng: u32,
}

impl YieldCounts {
    pub fn total(&self) -> u32 {
        self.ok + self.ng
    }

    /// OK share of all markers, in [0, 1].
    pub fn ratio(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            f64::from(self.ok) / f64::from(self.total())
        }
    }
}

/// Tally the column with the most OK/NG markers. Returns None when no
/// scanned column holds any marker, in which case the sheet contributes
/// no yield row.
pub fn extract_yield(grid: &SheetGrid) -> Option<YieldCounts> {
    let cols = grid.width().min(MARKER_SCAN_COLS);
    let mut best: Option<YieldCounts> = None;
    for col in 0..cols {
        let counts = tally_column(grid, col);
        // Strict comparison keeps the leftmost column on ties.
        if counts.total() > best.map_or(0, |b| b.total()) {
            best = Some(counts);
        }
    }
    best
}

fn tally_column(grid: &SheetGrid, col: usize) -> YieldCounts {
    let mut ok = 0;
    let mut ng = 0;
    for row in 0..grid.height() {
        match grid.cell_text(row, col).to_uppercase().as_str() {
            "OK" => ok += 1,
            "NG" => ng += 1,
            _ => {}
        }
    }
    YieldCounts { ok, ng }
}
