//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::{CatalogError, StationCatalog};

/// SQT configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format
    pub default_format: Option<String>,

    /// Station catalog file used instead of the built-in catalog
    pub stations: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/sqt/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Environment variables
        if let Ok(format) = std::env::var("SQT_FORMAT") {
            config.default_format = Some(format);
        }
        if let Ok(stations) = std::env::var("SQT_STATIONS") {
            config.stations = Some(PathBuf::from(stations));
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "sqt")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.stations.is_some() {
            self.stations = other.stations;
        }
    }

    /// Resolve the station catalog. A CLI flag wins over the configured
    /// file; with neither, the built-in catalog is used.
    pub fn catalog(&self, flag: Option<&Path>) -> Result<StationCatalog, CatalogError> {
        match flag.or(self.stations.as_deref()) {
            Some(path) => StationCatalog::from_file(path),
            None => Ok(StationCatalog::standard()),
        }
    }
}
