// src/lib.rs

//! `qsquad` - quantum circuit simulation on a persistent squad of worker threads
//!
//! A circuit is an ordered list of named operators (dense unitary matrices)
//! applied one after another to a state vector of complex amplitudes. Each
//! application is a matrix-vector product split by rows across a fixed pool of
//! long-lived threads that is reused for every step of the circuit.

pub mod core;
pub mod matrix;
pub mod pool;
pub mod circuits;
pub mod simulation;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use self::core::{Amplitude, EngineError, EngineResult, Sign, StateVector};
pub use matrix::Matrix;
pub use pool::{partition_rows, WorkerPool};
pub use circuits::{Circuit, CircuitBuilder, Instruction, OperatorLookup, OperatorTable};
pub use simulation::{execute, SimulationResult, Simulator, SimulatorConfig};
pub use validation::{
    check_normalization,
    check_unitary,
    dimension_for_qubits,
    validate_inputs,
};

// Example 1: Bell pair
// Hadamard on the high qubit followed by CNOT, run through the Simulator.
/// ```
/// use qsquad::{Amplitude, CircuitBuilder, Matrix, OperatorTable, Simulator, SimulatorConfig, StateVector};
/// use std::f64::consts::FRAC_1_SQRT_2;
///
/// let r = FRAC_1_SQRT_2;
/// // H ⊗ I on |q1 q0>
/// let h_high = Matrix::from_real_rows(&[
///     &[r, 0.0, r, 0.0],
///     &[0.0, r, 0.0, r],
///     &[r, 0.0, -r, 0.0],
///     &[0.0, r, 0.0, -r],
/// ])?;
/// // CNOT with q1 as control
/// let cnot = Matrix::from_real_rows(&[
///     &[1.0, 0.0, 0.0, 0.0],
///     &[0.0, 1.0, 0.0, 0.0],
///     &[0.0, 0.0, 0.0, 1.0],
///     &[0.0, 0.0, 1.0, 0.0],
/// ])?;
///
/// let operators = OperatorTable::new().with("H1", h_high)?.with("CX", cnot)?;
/// let circuit = CircuitBuilder::new().apply("H1").apply("CX").build();
///
/// let simulator = Simulator::new(SimulatorConfig::default().with_workers(2));
/// let result = simulator.run(2, &StateVector::basis(4, 0)?, &circuit, &operators)?;
/// println!("{}", result);
///
/// let state = result.final_state();
/// assert!(state[0].approx_eq(Amplitude::real(r), 1e-12));
/// assert!(state[3].approx_eq(Amplitude::real(r), 1e-12));
/// assert_eq!(state[1], Amplitude::ZERO);
/// # Ok::<(), qsquad::EngineError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Driving a pool directly
// The executor fold with a caller-owned pool, reused across two circuits.
/// ```
/// use qsquad::{execute, CircuitBuilder, Matrix, OperatorTable, StateVector, WorkerPool};
///
/// let x = Matrix::from_real_rows(&[&[0.0, 1.0], &[1.0, 0.0]])?;
/// let operators = OperatorTable::new().with("X", x)?;
/// let initial = StateVector::basis(2, 0)?;
///
/// let mut pool = WorkerPool::new(2, 2)?;
/// let once = execute(&mut pool, &initial, &CircuitBuilder::new().apply("X").build(), &operators)?;
/// let twice = execute(&mut pool, &initial, &CircuitBuilder::new().apply_all(["X", "X"]).build(), &operators)?;
/// pool.shutdown()?;
///
/// assert_eq!(once, StateVector::basis(2, 1)?);
/// assert_eq!(twice, initial);
/// # Ok::<(), qsquad::EngineError>(())
/// ```
#[doc(hidden)]
const _: () = ();
