// src/simulation/mod.rs

//! Runs circuits on the worker pool.
//!
//! [`execute`] is the bare fold of a circuit over a state using a pool the
//! caller owns. [`Simulator`] wraps the whole lifecycle of one run: validate
//! inputs, start a pool sized for the state, execute, tear the pool down.

mod config;
mod executor;
mod results;

pub use config::{SimulatorConfig, TOLERANCE_ENV, WORKERS_ENV};
pub use executor::execute;
pub use results::SimulationResult;

use crate::circuits::{Circuit, OperatorTable};
use crate::core::{EngineResult, StateVector};
use crate::pool::WorkerPool;
use crate::validation;
use tracing::{debug, instrument};

/// The main simulator orchestrating the execution of circuits.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Creates a simulator with the given settings.
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Runs `circuit` on `initial` for a `qubits`-qubit register.
    ///
    /// # Arguments
    /// * `qubits` - Register size; every operand must have dimension `2^qubits`.
    /// * `initial` - Starting amplitudes. Borrowed, never modified.
    /// * `circuit` - Operator names to apply, first to last.
    /// * `operators` - Definitions the names resolve against.
    ///
    /// # Returns
    /// * `Ok(SimulationResult)` holding the final state.
    /// * `Err(EngineError)` for invalid configuration or inputs, an unknown
    ///   operator, a failed check, or a pool failure. The pool is torn down in
    ///   every case.
    #[instrument(skip_all, fields(qubits = qubits, instructions = circuit.len()))]
    pub fn run(
        &self,
        qubits: u32,
        initial: &StateVector,
        circuit: &Circuit,
        operators: &OperatorTable,
    ) -> EngineResult<SimulationResult> {
        self.config.validate()?;
        let dimension = validation::validate_inputs(qubits, initial, circuit, operators)?;
        if self.config.check_unitarity {
            validation::check_operators_unitary(operators, Some(self.config.tolerance))?;
        }

        let workers = self.config.effective_workers(dimension);
        debug!(dimension, workers, "starting run");
        let mut pool = WorkerPool::new(workers, dimension)?;

        let outcome = execute(&mut pool, initial, circuit, operators);
        // Teardown happens whatever the outcome; a run error takes precedence.
        let teardown = pool.shutdown();
        let final_state = outcome?;
        teardown?;

        if self.config.check_normalization {
            validation::check_normalization(&final_state, Some(self.config.tolerance))?;
        }
        Ok(SimulationResult::new(final_state, circuit.len(), workers))
    }
}
