//! Simulation driver: clock, configuration and the per-timestep call
//! sequence that force laws and modifiers plug into.
//!
//! # Invariants
//! - Within a timestep: accumulators reset, then force laws, then one
//!   position sweep, then the clock advance, then modifiers.
//! - Components are invoked sequentially in registration order; correctness
//!   depends on that guarantee, not on locking.

pub mod clock;
pub mod config;
pub mod simulation;

pub use clock::SimulationClock;
pub use config::SimulationConfig;
pub use simulation::{Simulation, StepError};
