use serde::{Deserialize, Serialize};

/// A single labeled value recorded by a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    Scalar(f64),
    Text(String),
}

/// Append-only sink for reproducibility logging.
///
/// Components record their tunables here before a run; the driver writes the
/// collected entries alongside simulation output. Entries are never read
/// back by the components that produced them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterReport {
    entries: Vec<(String, ParameterValue)>,
}

impl ParameterReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a labeled scalar.
    pub fn record_scalar(&mut self, key: impl Into<String>, value: f64) {
        self.entries.push((key.into(), ParameterValue::Scalar(value)));
    }

    /// Record a labeled text value.
    pub fn record_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .push((key.into(), ParameterValue::Text(value.into())));
    }

    /// Recorded entries, in recording order.
    pub fn entries(&self) -> &[(String, ParameterValue)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
