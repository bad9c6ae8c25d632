//! Untyped worksheet grid with uniform cell views
//!
//! Station sheets mix typed cells freely: limits may be stored as numbers
//! or text, dates as datetimes or strings, judgements as text. The grid
//! exposes every cell twice, as display text and as an optional finite
//! number, and all downstream stages go through these two views only.

use calamine::{Data, Range};

/// One worksheet's cells, indexed from the top-left of the used area.
pub struct SheetGrid {
    range: Range<Data>,
}

impl SheetGrid {
    pub fn new(range: Range<Data>) -> Self {
        Self { range }
    }

    /// Rows in the used area.
    pub fn height(&self) -> usize {
        self.range.get_size().0
    }

    /// Columns in the used area.
    pub fn width(&self) -> usize {
        self.range.get_size().1
    }

    /// Cell as display text. Empty and error cells render as "".
    pub fn cell_text(&self, row: usize, col: usize) -> String {
        match self.range.get((row, col)) {
            Some(data) => cell_text(data),
            None => String::new(),
        }
    }

    /// Cell as a finite number, when it holds or parses as one.
    pub fn cell_number(&self, row: usize, col: usize) -> Option<f64> {
        self.range.get((row, col)).and_then(cell_number)
    }

    /// The row's cell texts joined with single spaces, lowercased.
    /// Header keywords that span adjacent cells ("Dim" | "No") still
    /// match against this form.
    pub fn row_text(&self, row: usize) -> String {
        (0..self.width())
            .map(|col| self.cell_text(row, col))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

/// Display text for one cell.
pub fn cell_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => {
            if *b {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Numeric value for one cell. Text parses through `f64::from_str` after
/// trimming; non-finite parses ("inf", "nan") are rejected. Booleans,
/// dates, and errors have no numeric value.
pub fn cell_number(data: &Data) -> Option<f64> {
    match data {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
