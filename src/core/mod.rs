//! Core module - station catalog and configuration

pub mod catalog;
pub mod config;

pub use catalog::{normalize, CatalogError, StationCatalog};
pub use config::Config;
