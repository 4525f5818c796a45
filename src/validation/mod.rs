// src/validation/mod.rs

//! Input validation performed before the engine runs, plus numeric sanity checks.
//!
//! All operands of one run must share the dimension `N = 2^qubits`. A mismatch
//! is reported here, before any worker is started.

use crate::circuits::{Circuit, OperatorLookup, OperatorTable};
use crate::core::{EngineError, EngineResult, StateVector, MAX_QUBITS, NORM_TOLERANCE, UNITARY_TOLERANCE};
use crate::matrix::Matrix;

/// Dimension `2^qubits` of the state space.
///
/// # Errors
/// `EngineError::InvalidConfiguration` for zero qubits or more than [`MAX_QUBITS`].
pub fn dimension_for_qubits(qubits: u32) -> EngineResult<usize> {
    if qubits == 0 || qubits > MAX_QUBITS {
        return Err(EngineError::config(format!(
            "qubit count must be between 1 and {}, got {}",
            MAX_QUBITS, qubits
        )));
    }
    1usize
        .checked_shl(qubits)
        .ok_or_else(|| EngineError::config(format!("2^{} overflows usize", qubits)))
}

/// Checks that the initial state and every operator match `2^qubits`, and that
/// the circuit is not empty.
///
/// Operator names are deliberately not resolved here; the executor resolves
/// them one instruction at a time.
///
/// # Returns
/// * `Ok(dimension)` when all operands agree.
/// * `Err(EngineError::DimensionMismatch)` naming the first disagreeing operand.
pub fn validate_inputs(
    qubits: u32,
    initial: &StateVector,
    circuit: &Circuit,
    operators: &OperatorTable,
) -> EngineResult<usize> {
    let dimension = dimension_for_qubits(qubits)?;
    if initial.len() != dimension {
        return Err(EngineError::mismatch("initial state", dimension, initial.len()));
    }
    if let Some(found) = operators.dimension() {
        if found != dimension {
            return Err(EngineError::mismatch("operator table", dimension, found));
        }
    }
    if circuit.is_empty() {
        return Err(EngineError::config("circuit has no instructions"));
    }
    Ok(dimension)
}

/// Rejects a circuit that names an operator `operators` cannot resolve.
///
/// Optional up-front check; without it the executor reports the same
/// `UnknownOperator` when it reaches the instruction.
pub fn validate_circuit<L>(circuit: &Circuit, operators: &L) -> EngineResult<()>
where
    L: OperatorLookup + ?Sized,
{
    match circuit.unresolved(operators).first() {
        Some(name) => Err(EngineError::UnknownOperator { name: (*name).to_string() }),
        None => Ok(()),
    }
}

/// Checks if the state vector is normalized (sum of squared moduli ≈ 1.0).
///
/// # Arguments
/// * `state` - The `StateVector` to check.
/// * `tolerance` - Allowed deviation from 1.0; defaults to [`NORM_TOLERANCE`].
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(EngineError::InvalidState)` otherwise.
pub fn check_normalization(state: &StateVector, tolerance: Option<f64>) -> EngineResult<()> {
    let tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq = state.norm_sqr();
    if (norm_sq - 1.0).abs() > tolerance {
        Err(EngineError::InvalidState {
            message: format!(
                "state vector normalization failed: Sum(|c_i|^2) = {} (deviation > {})",
                norm_sq, tolerance
            ),
        })
    } else {
        Ok(())
    }
}

/// Checks `M · M† ≈ I` elementwise.
///
/// # Returns
/// * `Ok(())` if every element is within `tolerance` (default [`UNITARY_TOLERANCE`]).
/// * `Err(EngineError::InvalidState)` naming the first offending element.
pub fn check_unitary(matrix: &Matrix, tolerance: Option<f64>) -> EngineResult<()> {
    let tolerance = tolerance.unwrap_or(UNITARY_TOLERANCE);
    let product = matrix.multiply(&matrix.adjoint()?)?;
    let n = matrix.dimension();
    for i in 0..n {
        for j in 0..n {
            let expected = if i == j { 1.0 } else { 0.0 };
            let Some(value) = product.get(i, j) else { continue };
            if (value.re() - expected).abs() > tolerance || value.im().abs() > tolerance {
                return Err(EngineError::InvalidState {
                    message: format!("operator is not unitary: (M·M†)[{}][{}] = {}", i, j, value),
                });
            }
        }
    }
    Ok(())
}

/// Runs [`check_unitary`] on every operator in the table.
pub fn check_operators_unitary(operators: &OperatorTable, tolerance: Option<f64>) -> EngineResult<()> {
    for name in operators.names() {
        if let Some(matrix) = operators.get(name) {
            check_unitary(matrix, tolerance).map_err(|err| match err {
                EngineError::InvalidState { message } => EngineError::InvalidState {
                    message: format!("{}: {}", name, message),
                },
                other => other,
            })?;
        }
    }
    Ok(())
}
