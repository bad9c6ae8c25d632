//! Process capability statistics
//!
//! CPK measures how well a sample fits inside its specification limits:
//! CPU = (USL - mean) / 3s, CPL = (mean - LSL) / 3s, with s the sample
//! standard deviation. With both limits the index is the smaller of the
//! two; with one limit it is that side alone.

use serde::{Serialize, Serializer};

/// Outcome of a capability computation. The undefined cases are kept
/// apart even though they all render as a blank cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Capability {
    /// Defined capability index.
    Computed(f64),
    /// Fewer than two numeric observations.
    InsufficientSample,
    /// All observations identical, the index is unbounded.
    ZeroVariance,
    /// Neither specification limit is present.
    NoLimits,
}

impl Capability {
    /// The index value, when defined.
    pub fn value(&self) -> Option<f64> {
        match self {
            Capability::Computed(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Capability::Computed(_))
    }
}

impl Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.value() {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_none(),
        }
    }
}

/// Arithmetic mean. Empty input yields NaN; callers guard on length.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation with the n - 1 divisor. Requires at least
/// two values.
pub fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Capability of a sample against optional limits. Never panics; every
/// degenerate input maps to one of the undefined variants.
pub fn cpk(values: &[f64], usl: Option<f64>, lsl: Option<f64>) -> Capability {
    if values.len() < 2 {
        return Capability::InsufficientSample;
    }
    let mean = mean(values);
    let sigma = std_dev(values);
    if sigma == 0.0 {
        return Capability::ZeroVariance;
    }
    let cpu = usl.map(|u| (u - mean) / (3.0 * sigma));
    let cpl = lsl.map(|l| (mean - l) / (3.0 * sigma));
    match (cpu, cpl) {
        (Some(u), Some(l)) => Capability::Computed(u.min(l)),
        (Some(u), None) => Capability::Computed(u),
        (None, Some(l)) => Capability::Computed(l),
        (None, None) => Capability::NoLimits,
    }
}
