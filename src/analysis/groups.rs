//! Date/configuration grouping and capability aggregation

use std::collections::BTreeMap;

use crate::analysis::capability;
use crate::analysis::dimensions::DimensionTable;
use crate::analysis::schema::{self, HeaderSchema};
use crate::report::CpkRecord;
use crate::workbook::SheetGrid;

/// Key of one measurement group. Ordering is by date, then
/// configuration, which fixes the iteration order of the partition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroupKey {
    pub date: String,
    pub config: String,
}

/// Partition the data region's rows by (date, configuration).
///
/// A row joins a group only if its date cell contains a recognizable
/// date; other rows are dropped. Without a date column the partition is
/// empty and the sheet yields no capability records.
pub fn partition_rows(grid: &SheetGrid, schema: &HeaderSchema) -> BTreeMap<GroupKey, Vec<usize>> {
    let mut groups: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
    let Some(date_col) = schema.date_col else {
        return groups;
    };
    for row in schema.data_start..grid.height() {
        let Some(date) = schema::extract_date(&grid.cell_text(row, date_col)) else {
            continue;
        };
        let config = schema
            .config_col
            .map(|col| config_value(&grid.cell_text(row, col)))
            .unwrap_or_default();
        groups
            .entry(GroupKey { date, config })
            .or_default()
            .push(row);
    }
    groups
}

/// Configuration cell text, with the "nan" artifact of missing cells
/// mapped back to empty.
fn config_value(text: &str) -> String {
    if text == "nan" {
        String::new()
    } else {
        text.to_string()
    }
}

/// Compute one sheet's capability records across all groups and
/// dimensions. Group/dimension pairs without a single numeric
/// observation are omitted entirely.
pub fn aggregate(
    station: &str,
    grid: &SheetGrid,
    schema: &HeaderSchema,
    dimensions: &DimensionTable,
) -> Vec<CpkRecord> {
    let mut records = Vec::new();
    for (key, rows) in partition_rows(grid, schema) {
        for dim in dimensions.iter() {
            let sample: Vec<f64> = rows
                .iter()
                .filter_map(|&row| grid.cell_number(row, dim.column))
                .collect();
            if sample.is_empty() {
                continue;
            }
            let cpk = capability::cpk(&sample, dim.usl, dim.lsl);
            records.push(CpkRecord {
                station: station.to_string(),
                dimension: dim.label.clone(),
                config: key.config.clone(),
                date: key.date.clone(),
                sample_size: sample.len(),
                usl: dim.usl,
                lsl: dim.lsl,
                cpk,
            });
        }
    }
    records
}
