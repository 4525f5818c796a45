// src/simulation/executor.rs

use crate::circuits::{Circuit, OperatorLookup};
use crate::core::{EngineError, EngineResult, StateVector};
use crate::pool::WorkerPool;
use tracing::{debug, instrument};

/// Folds `circuit` over `initial`, one pooled matrix-vector product per instruction.
///
/// Operator names are resolved through `operators` as each instruction is
/// reached. The executor holds exactly one current vector: each successful step
/// replaces it with the product and releases the previous one. The caller's
/// `initial` vector is only borrowed and is never released by the executor.
///
/// # Errors
/// * `EngineError::UnknownOperator` if an instruction names an undefined operator.
/// * Any error from [`WorkerPool::submit`].
///
/// On failure the intermediate state is dropped and no partial result is returned.
#[instrument(skip_all, fields(instructions = circuit.len(), dimension = initial.len()))]
pub fn execute<L>(
    pool: &mut WorkerPool,
    initial: &StateVector,
    circuit: &Circuit,
    operators: &L,
) -> EngineResult<StateVector>
where
    L: OperatorLookup + ?Sized,
{
    // Cloning shares the caller's amplitudes; they are never freed from here.
    let mut state = initial.clone();

    for (step, instruction) in circuit.instructions().iter().enumerate() {
        let name = instruction.operator();
        let matrix = operators
            .lookup(name)
            .ok_or_else(|| EngineError::UnknownOperator { name: name.to_string() })?;

        debug!(step, operator = name, "applying operator");
        state = pool.submit(matrix, &state)?;
    }

    Ok(state)
}
