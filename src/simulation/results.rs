// src/simulation/results.rs
use crate::core::StateVector;
use std::fmt;

/// Holds the outcome of a circuit simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    final_state: StateVector,
    instructions_applied: usize,
    workers: usize,
}

impl SimulationResult {
    pub(crate) fn new(final_state: StateVector, instructions_applied: usize, workers: usize) -> Self {
        Self { final_state, instructions_applied, workers }
    }

    /// The state vector after the last instruction.
    pub fn final_state(&self) -> &StateVector {
        &self.final_state
    }

    /// Consumes the result, keeping only the final state.
    pub fn into_final_state(self) -> StateVector {
        self.final_state
    }

    pub fn instructions_applied(&self) -> usize {
        self.instructions_applied
    }

    /// Worker threads the run actually used.
    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final state:")?;
        writeln!(f, "{}", self.final_state)
    }
}
