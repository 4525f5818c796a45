// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod amplitude;
pub mod error;
pub mod state;

// Re-export public types for convenient access via `qsquad::core::TypeName`
pub use amplitude::{Amplitude, Sign};
pub use error::{EngineError, EngineResult};
pub use state::StateVector;

pub mod constants;
pub use constants::tolerances::{NORM_TOLERANCE, PRINT_TOLERANCE, UNITARY_TOLERANCE};
pub use constants::MAX_QUBITS;
