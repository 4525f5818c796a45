// demos/bell_pair.rs
//
// Prepares a Bell pair on two qubits and prints the final amplitudes.
// Worker count and tolerance come from QSQUAD_WORKERS / QSQUAD_TOLERANCE;
// set RUST_LOG=qsquad=debug to watch each operator being applied.

use qsquad::{CircuitBuilder, EngineError, Matrix, OperatorTable, Simulator, SimulatorConfig, StateVector};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let r = 0.70711;
    let operators = OperatorTable::new()
        .with(
            "H1",
            Matrix::from_real_rows(&[
                &[r, 0.0, r, 0.0],
                &[0.0, r, 0.0, r],
                &[r, 0.0, -r, 0.0],
                &[0.0, r, 0.0, -r],
            ])?,
        )?
        .with(
            "CX",
            Matrix::from_real_rows(&[
                &[1.0, 0.0, 0.0, 0.0],
                &[0.0, 1.0, 0.0, 0.0],
                &[0.0, 0.0, 0.0, 1.0],
                &[0.0, 0.0, 1.0, 0.0],
            ])?,
        )?;

    let circuit = CircuitBuilder::new().apply("H1").apply("CX").build();
    println!("Circuit: {}", circuit);

    let config = SimulatorConfig::from_env()?.with_normalization_check(true);
    let result = Simulator::new(config).run(2, &StateVector::basis(4, 0)?, &circuit, &operators)?;
    print!("{}", result);
    Ok(())
}
