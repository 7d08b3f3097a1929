use cellspace_common::ParameterReport;
use cellspace_forces::ForceLaw;
use cellspace_modifiers::SimulationModifier;
use cellspace_population::{Population, PopulationMismatch};

use crate::clock::SimulationClock;
use crate::config::SimulationConfig;

/// Errors surfaced by the driver loop.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// A component was attached to a population representation it does not
    /// support. Fatal: the run terminates rather than silently skipping.
    #[error(transparent)]
    Mismatch(#[from] PopulationMismatch),
}

/// The driver owning the per-timestep call sequence.
///
/// Holds the population, the registered force laws and modifiers, and the
/// clock. Everything runs single-threaded; determinism follows from
/// sequential invocation in registration order and index-ascending node
/// iteration inside the components.
pub struct Simulation<const D: usize> {
    population: Box<dyn Population<D>>,
    forces: Vec<Box<dyn ForceLaw<D>>>,
    modifiers: Vec<Box<dyn SimulationModifier<D>>>,
    clock: SimulationClock,
    config: SimulationConfig,
    set_up: bool,
}

impl<const D: usize> Simulation<D> {
    pub fn new(population: Box<dyn Population<D>>, config: SimulationConfig) -> Self {
        Self {
            population,
            forces: Vec::new(),
            modifiers: Vec::new(),
            clock: SimulationClock::default(),
            config,
            set_up: false,
        }
    }

    /// Rebuild a driver from checkpointed parts. The clock resumes from its
    /// captured time and setup hooks are considered already run.
    pub fn from_parts(
        population: Box<dyn Population<D>>,
        forces: Vec<Box<dyn ForceLaw<D>>>,
        modifiers: Vec<Box<dyn SimulationModifier<D>>>,
        clock: SimulationClock,
        config: SimulationConfig,
    ) -> Self {
        Self {
            population,
            forces,
            modifiers,
            clock,
            config,
            set_up: true,
        }
    }

    pub fn add_force(&mut self, force: Box<dyn ForceLaw<D>>) {
        self.forces.push(force);
    }

    pub fn add_modifier(&mut self, modifier: Box<dyn SimulationModifier<D>>) {
        self.modifiers.push(modifier);
    }

    pub fn population(&self) -> &dyn Population<D> {
        self.population.as_ref()
    }

    pub fn population_mut(&mut self) -> &mut dyn Population<D> {
        self.population.as_mut()
    }

    pub fn forces(&self) -> &[Box<dyn ForceLaw<D>>] {
        &self.forces
    }

    pub fn modifiers(&self) -> &[Box<dyn SimulationModifier<D>>] {
        &self.modifiers
    }

    pub fn clock(&self) -> SimulationClock {
        self.clock
    }

    pub fn config(&self) -> SimulationConfig {
        self.config
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Run every modifier's one-time setup hook. Invoked automatically by
    /// the first `step`; calling it again is a no-op.
    pub fn setup(&mut self) -> Result<(), StepError> {
        if self.set_up {
            return Ok(());
        }
        for modifier in &mut self.modifiers {
            modifier.setup(self.population.as_mut())?;
        }
        self.set_up = true;
        Ok(())
    }

    /// Advance one timestep.
    ///
    /// Resets accumulators, lets every force law accumulate, sweeps
    /// positions once, advances the clock, then runs every modifier with the
    /// post-step time. The first component error aborts the step.
    pub fn step(&mut self) -> Result<(), StepError> {
        self.setup()?;
        let _span = tracing::debug_span!("timestep", time = self.clock.now()).entered();

        self.population.clear_applied_forces();
        for force in &self.forces {
            force.accumulate(self.population.as_mut())?;
        }
        self.population
            .apply_accumulated_forces(self.config.dt / self.config.damping);

        self.clock.advance(self.config.dt);
        let now = self.clock.now();
        for modifier in &mut self.modifiers {
            modifier.end_of_step(self.population.as_mut(), now)?;
        }
        Ok(())
    }

    /// Step until the clock reaches `end_time`.
    pub fn run_to(&mut self, end_time: f64) -> Result<(), StepError> {
        while self.clock.now() < end_time {
            self.step()?;
        }
        Ok(())
    }

    /// Collect every component's parameter emission, in registration order,
    /// for reproducibility logging.
    pub fn report_parameters(&self) -> ParameterReport {
        let mut report = ParameterReport::new();
        for force in &self.forces {
            force.report_parameters(&mut report);
        }
        for modifier in &self.modifiers {
            modifier.report_parameters(&mut report);
        }
        report
    }
}
