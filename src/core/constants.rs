//! Numeric constants shared by the engine and its checks.

/// Tolerances used when comparing double-precision results.
pub mod tolerances {
    /// Default allowed deviation of `Σ|c_i|²` from 1.0.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Default allowed elementwise deviation of `U·U†` from the identity.
    pub const UNITARY_TOLERANCE: f64 = 1e-6;
    /// Precision of the five-decimal values the text format carries (e.g. `0.70711`).
    pub const PRINT_TOLERANCE: f64 = 1e-4;
}

/// Largest qubit count accepted by validation; `2^MAX_QUBITS` amplitudes per vector
/// and its square per operator matrix.
pub const MAX_QUBITS: u32 = 16;
