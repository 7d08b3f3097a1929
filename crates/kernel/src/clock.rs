use serde::{Deserialize, Serialize};

/// Monotonically increasing simulation time, owned by the driver.
///
/// Components read time as an explicit `now` argument rather than through a
/// process-wide singleton, which keeps replays deterministic and tests
/// simple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationClock {
    start: f64,
    time: f64,
}

impl SimulationClock {
    pub fn new(start: f64) -> Self {
        Self { start, time: start }
    }

    /// Time the simulation began at.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Current simulation time.
    pub fn now(&self) -> f64 {
        self.time
    }

    /// Advance by one timestep.
    pub fn advance(&mut self, dt: f64) {
        debug_assert!(dt >= 0.0);
        self.time += dt;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}
