//! Error handling logic

use thiserror::Error;

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures reported by the numeric engine.
///
/// Every fallible operation returns one of these to its immediate caller. The
/// engine never aborts the process and never retries on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Invalid worker count, dimension, qubit count or other setup parameter.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// What was wrong with the configuration
        message: String,
    },

    /// Storage for a matrix, vector or pool table could not be reserved.
    #[error("Allocation failed for {what} ({elements} elements)")]
    Allocation {
        /// The structure being allocated
        what: &'static str,
        /// Number of elements requested
        elements: usize,
    },

    /// Two structures that must share a dimension do not.
    #[error("Dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Where the mismatch was detected
        context: &'static str,
        /// The required dimension
        expected: usize,
        /// The dimension actually supplied
        found: usize,
    },

    /// A circuit instruction names an operator that is not defined.
    #[error("Unknown operator '{name}'")]
    UnknownOperator {
        /// The unresolved operator name
        name: String,
    },

    /// An operator name was defined more than once.
    #[error("Operator '{name}' is already defined")]
    DuplicateOperator {
        /// The repeated operator name
        name: String,
    },

    /// The operating system refused to start a worker thread.
    #[error("Failed to start worker {index}: {message}")]
    WorkerSpawn {
        /// Index of the worker that failed to launch
        index: usize,
        /// Error reported by the thread builder
        message: String,
    },

    /// A worker thread panicked and could not be joined cleanly.
    #[error("Worker {index} panicked")]
    WorkerPanicked {
        /// Index of the failed worker
        index: usize,
    },

    /// A state vector or operator failed a numeric validity check.
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Description of the failed check
        message: String,
    },
}

impl EngineError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        EngineError::InvalidConfiguration { message: message.into() }
    }

    pub(crate) fn mismatch(context: &'static str, expected: usize, found: usize) -> Self {
        EngineError::DimensionMismatch { context, expected, found }
    }
}
