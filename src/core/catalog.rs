//! Station catalog and fuzzy sheet-name matching
//!
//! Workbook sheets carry free-form names ("PBS attachment (2)", "Post-DAA",
//! "LED  Module_attachment"). The catalog maps them onto a fixed list of
//! canonical station names whose order also drives report ordering.

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

/// The production stations in display order.
const STANDARD_STATIONS: [&str; 19] = [
    "MLA assy installation",
    "Mirror attachment",
    "Barrel attachment",
    "Condenser lens attach",
    "LED Module  attachment",
    "ILLU Module cover attachment",
    "Relay lens attachment",
    "LED FLEX GRAPHITE-1",
    "reflector attach",
    "singlet attach",
    "HWP Mylar attach",
    "PBS attachment",
    "Doublet attachment",
    "Top cover installation",
    "PANEL PRECISION AA（LAA）",
    "POST DAA INSPECTION",
    "PANEL FLEX ASSY",
    "LCOS GRAPHITE ATTACH",
    "DE OQC",
];

/// Sheets whose normalized name contains one of these tokens are never
/// station data, no matter what else the name contains.
const EXCLUDED_TOKENS: [&str; 5] = ["summary", "slice", "template", "inline", "history"];

/// Literal overrides for sheet names the generic scan gets wrong:
/// (normalized fragment, canonical station name).
const STANDARD_OVERRIDES: [(&str, &str); 2] = [
    ("postdaa", "POST DAA INSPECTION"),
    ("ledmoduleattachment", "LED Module  attachment"),
];

/// Strip spacing and decoration so sheet names and station names compare
/// on their word content alone. Removes ASCII and full-width spaces and
/// parentheses, hyphens, and underscores, after lowercasing.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{3000}' | '(' | ')' | '（' | '）' | '-' | '_'))
        .collect()
}

/// Immutable station catalog. Built once at startup and handed to the
/// analyzer, so matching behavior never varies between sheets.
#[derive(Debug, Clone)]
pub struct StationCatalog {
    names: Vec<String>,
    keys: Vec<String>,
    overrides: Vec<(String, String)>,
}

impl StationCatalog {
    /// Catalog with the given canonical names, in display order.
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let names: Vec<String> = names.into_iter().collect();
        let keys = names.iter().map(|n| normalize(n)).collect();
        Self {
            names,
            keys,
            overrides: Vec::new(),
        }
    }

    /// The built-in production catalog.
    pub fn standard() -> Self {
        let mut catalog = Self::new(STANDARD_STATIONS.iter().map(|s| s.to_string()));
        for (fragment, station) in STANDARD_OVERRIDES {
            catalog.add_override(fragment, station);
        }
        catalog
    }

    /// Load a catalog from a YAML file with a `stations:` list and an
    /// optional `overrides:` list.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: CatalogFile =
            serde_yml::from_str(&content).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if file.stations.is_empty() {
            return Err(CatalogError::Empty {
                path: path.to_path_buf(),
            });
        }
        let mut catalog = Self::new(file.stations);
        for rule in file.overrides {
            catalog.add_override(&rule.contains, &rule.station);
        }
        Ok(catalog)
    }

    /// Route any sheet whose normalized name contains `fragment` to
    /// `station`, ahead of the generic scan.
    pub fn add_override(&mut self, fragment: &str, station: &str) {
        self.overrides.push((normalize(fragment), station.to_string()));
    }

    /// Resolve a sheet name to its canonical station, if any.
    ///
    /// Exclusion tokens reject the sheet outright. Overrides are checked
    /// next. The generic scan then matches when either normalized string
    /// contains the other, taking the first catalog entry that fits.
    pub fn resolve(&self, sheet_name: &str) -> Option<&str> {
        let norm = normalize(sheet_name);
        if norm.is_empty() {
            return None;
        }
        if EXCLUDED_TOKENS.iter().any(|token| norm.contains(token)) {
            return None;
        }
        for (fragment, station) in &self.overrides {
            if norm.contains(fragment.as_str()) {
                if let Some(name) = self.names.iter().find(|n| *n == station) {
                    return Some(name.as_str());
                }
            }
        }
        self.keys
            .iter()
            .position(|key| norm.contains(key.as_str()) || key.contains(norm.as_str()))
            .map(|idx| self.names[idx].as_str())
    }

    /// Position of a canonical name in display order.
    pub fn order_index(&self, canonical: &str) -> Option<usize> {
        self.names.iter().position(|n| n == canonical)
    }

    /// Canonical names in display order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Pairs of catalog entries whose normalized keys contain each other.
    /// For such pairs the generic scan can only ever pick the earlier
    /// entry, so the later one is unreachable for exact-name sheets.
    pub fn overlapping_keys(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        for (i, a) in self.keys.iter().enumerate() {
            for (j, b) in self.keys.iter().enumerate().skip(i + 1) {
                if a.contains(b.as_str()) || b.contains(a.as_str()) {
                    pairs.push((self.names[i].as_str(), self.names[j].as_str()));
                }
            }
        }
        pairs
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    stations: Vec<String>,
    #[serde(default)]
    overrides: Vec<OverrideRule>,
}

#[derive(Debug, Deserialize)]
struct OverrideRule {
    contains: String,
    station: String,
}

#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("cannot read station catalog: {path}")]
    #[diagnostic(
        code(sqt::catalog::read),
        help("pass a YAML file with a `stations:` list")
    )]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid station catalog: {path}")]
    #[diagnostic(code(sqt::catalog::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("station catalog is empty: {path}")]
    #[diagnostic(
        code(sqt::catalog::empty),
        help("list at least one station under `stations:`")
    )]
    Empty { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_decoration() {
        assert_eq!(normalize("PBS attachment"), "pbsattachment");
        assert_eq!(normalize("Post-DAA_(2)"), "postdaa2");
        assert_eq!(normalize("PANEL PRECISION AA（LAA）"), "panelprecisionaalaa");
        assert_eq!(normalize("LED Module  attachment"), "ledmoduleattachment");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for name in STANDARD_STATIONS {
            let once = normalize(name);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_every_canonical_name_resolves_to_itself() {
        let catalog = StationCatalog::standard();
        for name in STANDARD_STATIONS {
            assert_eq!(catalog.resolve(name), Some(name), "station: {name}");
        }
    }

    #[test]
    fn test_resolve_matches_decorated_sheet_names() {
        let catalog = StationCatalog::standard();
        assert_eq!(catalog.resolve("PBS attachment (2)"), Some("PBS attachment"));
        assert_eq!(catalog.resolve("pbs_attachment"), Some("PBS attachment"));
        assert_eq!(catalog.resolve("DE OQC　final"), Some("DE OQC"));
    }

    #[test]
    fn test_resolve_matches_partial_sheet_names() {
        let catalog = StationCatalog::standard();
        // Sheet name shorter than the catalog entry.
        assert_eq!(catalog.resolve("PBS"), Some("PBS attachment"));
        // Sheet name longer than the catalog entry.
        assert_eq!(
            catalog.resolve("Top cover installation rev B"),
            Some("Top cover installation")
        );
    }

    #[test]
    fn test_resolve_applies_overrides() {
        let catalog = StationCatalog::standard();
        assert_eq!(catalog.resolve("Post-DAA"), Some("POST DAA INSPECTION"));
        assert_eq!(catalog.resolve("post daa check"), Some("POST DAA INSPECTION"));
        // Single space variant routes to the double-space canonical name.
        assert_eq!(
            catalog.resolve("LED Module attachment"),
            Some("LED Module  attachment")
        );
    }

    #[test]
    fn test_resolve_rejects_excluded_sheets() {
        let catalog = StationCatalog::standard();
        assert_eq!(catalog.resolve("Yield Summary"), None);
        assert_eq!(catalog.resolve("PBS attachment history"), None);
        assert_eq!(catalog.resolve("Template"), None);
        assert_eq!(catalog.resolve("DE OQC slice"), None);
    }

    #[test]
    fn test_resolve_rejects_unrelated_sheets() {
        let catalog = StationCatalog::standard();
        assert_eq!(catalog.resolve("Sheet1"), None);
        assert_eq!(catalog.resolve(""), None);
        assert_eq!(catalog.resolve("（）"), None);
    }

    #[test]
    fn test_first_catalog_entry_wins_on_ambiguous_match() {
        let catalog =
            StationCatalog::new(["alpha beta".to_string(), "alpha".to_string()]);
        // "alpha" is contained in both keys; the earlier entry takes it.
        assert_eq!(catalog.resolve("alpha"), Some("alpha beta"));
    }

    #[test]
    fn test_standard_catalog_has_no_overlapping_keys() {
        let catalog = StationCatalog::standard();
        assert!(catalog.overlapping_keys().is_empty());
    }

    #[test]
    fn test_overlapping_keys_reports_contained_pairs() {
        let catalog =
            StationCatalog::new(["alpha beta".to_string(), "alpha".to_string()]);
        assert_eq!(catalog.overlapping_keys(), vec![("alpha beta", "alpha")]);
    }

    #[test]
    fn test_override_to_unknown_station_falls_through() {
        let mut catalog = StationCatalog::new(["widget line".to_string()]);
        catalog.add_override("widget", "No Such Station");
        assert_eq!(catalog.resolve("widget line 3"), Some("widget line"));
    }

    #[test]
    fn test_from_file_parses_stations_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stations.yaml");
        std::fs::write(
            &path,
            "stations:\n  - Front bezel attach\n  - Final QC\noverrides:\n  - contains: fqc\n    station: Final QC\n",
        )
        .unwrap();

        let catalog = StationCatalog::from_file(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.resolve("FQC station"), Some("Final QC"));
        assert_eq!(catalog.order_index("Final QC"), Some(1));
    }

    #[test]
    fn test_from_file_rejects_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stations.yaml");
        std::fs::write(&path, "stations: []\n").unwrap();

        let err = StationCatalog::from_file(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Empty { .. }));
    }

    #[test]
    fn test_from_file_reports_missing_file() {
        let err = StationCatalog::from_file(Path::new("/nonexistent/stations.yaml")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}
