//! Report records and ordering

pub mod excel;

use serde::Serialize;

use crate::analysis::capability::Capability;
use crate::core::StationCatalog;

/// One yield table row.
#[derive(Debug, Clone, Serialize)]
pub struct YieldRecord {
    /// Canonical station name.
    pub station: String,
    /// Units judged OK.
    pub ok: u32,
    /// Units judged NG.
    pub ng: u32,
}

impl YieldRecord {
    pub fn total(&self) -> u32 {
        self.ok + self.ng
    }

    /// OK share of all judged units, in [0, 1].
    pub fn ratio(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            f64::from(self.ok) / f64::from(self.total())
        }
    }

    /// The ratio rendered as a percentage, e.g. "97.50%".
    pub fn percentage(&self) -> String {
        format!("{:.2}%", self.ratio() * 100.0)
    }
}

/// One CPK table row.
#[derive(Debug, Clone, Serialize)]
pub struct CpkRecord {
    /// Canonical station name.
    pub station: String,
    /// Dimension label from the header row.
    #[serde(rename = "dim_no")]
    pub dimension: String,
    /// Configuration, empty when the sheet has none.
    pub config: String,
    /// Group date, YYYY-MM-DD.
    pub date: String,
    /// Numeric observations behind the statistic.
    pub sample_size: usize,
    pub usl: Option<f64>,
    pub lsl: Option<f64>,
    /// Undefined capability serializes as null and renders blank.
    pub cpk: Capability,
}

impl CpkRecord {
    /// Capability rounded to three decimals, when defined.
    pub fn cpk_rounded(&self) -> Option<f64> {
        self.cpk.value().map(|v| (v * 1000.0).round() / 1000.0)
    }
}

/// Order yield rows by catalog display order. Stable, so several sheets
/// of one station keep their workbook order.
pub fn sort_yield_records(records: &mut [YieldRecord], catalog: &StationCatalog) {
    records.sort_by_key(|r| catalog.order_index(&r.station).unwrap_or(usize::MAX));
}

/// Order capability rows by catalog display order, then dimension
/// label, then date. Stable, so groups that tie keep their
/// date-then-config iteration order.
pub fn sort_cpk_records(records: &mut [CpkRecord], catalog: &StationCatalog) {
    records.sort_by(|a, b| {
        let ka = catalog.order_index(&a.station).unwrap_or(usize::MAX);
        let kb = catalog.order_index(&b.station).unwrap_or(usize::MAX);
        ka.cmp(&kb)
            .then_with(|| a.dimension.cmp(&b.dimension))
            .then_with(|| a.date.cmp(&b.date))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yield_record(station: &str, ok: u32, ng: u32) -> YieldRecord {
        YieldRecord {
            station: station.to_string(),
            ok,
            ng,
        }
    }

    fn cpk_record(station: &str, dimension: &str, date: &str) -> CpkRecord {
        CpkRecord {
            station: station.to_string(),
            dimension: dimension.to_string(),
            config: String::new(),
            date: date.to_string(),
            sample_size: 3,
            usl: Some(1.0),
            lsl: None,
            cpk: Capability::Computed(1.23456),
        }
    }

    #[test]
    fn test_yield_percentage_rendering() {
        assert_eq!(yield_record("DE OQC", 39, 1).percentage(), "97.50%");
        assert_eq!(yield_record("DE OQC", 5, 0).percentage(), "100.00%");
        assert_eq!(yield_record("DE OQC", 0, 3).percentage(), "0.00%");
    }

    #[test]
    fn test_yield_total_and_ratio() {
        let record = yield_record("DE OQC", 3, 1);
        assert_eq!(record.total(), 4);
        assert!((record.ratio() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_cpk_rounds_to_three_decimals() {
        let record = cpk_record("DE OQC", "P1", "2025-03-01");
        assert_eq!(record.cpk_rounded(), Some(1.235));
        assert_eq!(record.cpk_rounded().map(|v| format!("{v:.3}")), Some("1.235".to_string()));
    }

    #[test]
    fn test_yield_rows_follow_catalog_order() {
        let catalog = StationCatalog::standard();
        let mut records = vec![
            yield_record("DE OQC", 1, 0),
            yield_record("PBS attachment", 1, 0),
            yield_record("MLA assy installation", 1, 0),
        ];
        sort_yield_records(&mut records, &catalog);
        let stations: Vec<&str> = records.iter().map(|r| r.station.as_str()).collect();
        assert_eq!(
            stations,
            ["MLA assy installation", "PBS attachment", "DE OQC"]
        );
    }

    #[test]
    fn test_cpk_rows_sort_by_station_dimension_date() {
        let catalog = StationCatalog::standard();
        let mut records = vec![
            cpk_record("DE OQC", "A1", "2025-03-01"),
            cpk_record("PBS attachment", "B2", "2025-03-02"),
            cpk_record("PBS attachment", "B2", "2025-03-01"),
            cpk_record("PBS attachment", "A9", "2025-03-05"),
        ];
        sort_cpk_records(&mut records, &catalog);
        let keys: Vec<(&str, &str, &str)> = records
            .iter()
            .map(|r| (r.station.as_str(), r.dimension.as_str(), r.date.as_str()))
            .collect();
        assert_eq!(
            keys,
            [
                ("PBS attachment", "A9", "2025-03-05"),
                ("PBS attachment", "B2", "2025-03-01"),
                ("PBS attachment", "B2", "2025-03-02"),
                ("DE OQC", "A1", "2025-03-01"),
            ]
        );
    }

    #[test]
    fn test_records_serialize_for_json_output() {
        let json = serde_json::to_value(cpk_record("DE OQC", "P1", "2025-03-01")).unwrap();
        assert_eq!(json["station"], "DE OQC");
        assert_eq!(json["dim_no"], "P1");
        assert_eq!(json["sample_size"], 3);
        assert_eq!(json["lsl"], serde_json::Value::Null);
        assert!((json["cpk"].as_f64().unwrap() - 1.23456).abs() < 1e-12);

        let json = serde_json::to_value(yield_record("DE OQC", 39, 1)).unwrap();
        assert_eq!(json["ok"], 39);
        assert_eq!(json["ng"], 1);
    }
}
