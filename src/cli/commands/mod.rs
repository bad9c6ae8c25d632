//! CLI command implementations

pub mod utils;

pub mod analyze;
pub mod completions;
pub mod cpk;
pub mod stations;
pub mod yields;
