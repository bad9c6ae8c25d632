//! SQT: Station Quality Toolkit
//!
//! Derives per-station yield and process capability (CPK) tables from
//! loosely structured manufacturing test station workbooks.

pub mod analysis;
pub mod cli;
pub mod core;
pub mod report;
pub mod workbook;
