use serde::{Deserialize, Serialize};

/// Timestep parameters for the driver.
///
/// Set once at construction and read on every step; nothing mutates them
/// mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Timestep length in simulation time units.
    pub dt: f64,
    /// Drag coefficient dividing accumulated forces in the overdamped
    /// position update.
    pub damping: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            damping: 1.0,
        }
    }
}

impl SimulationConfig {
    /// Parse a YAML document, filling missing fields from the defaults.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}
