// src/core/state.rs

use super::amplitude::Amplitude;
use super::error::{EngineError, EngineResult};
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

/// An ordered sequence of `N` complex amplitudes, `N = 2^qubits`.
///
/// The amplitudes sit behind an `Arc<[Amplitude]>` so the vector can be handed
/// to every pool worker as read-only job input without copying. Cloning a
/// `StateVector` is therefore cheap and never duplicates the amplitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    amplitudes: Arc<[Amplitude]>,
}

impl StateVector {
    /// Wraps an already-built amplitude list.
    pub fn new(amplitudes: Vec<Amplitude>) -> Self {
        Self { amplitudes: amplitudes.into() }
    }

    /// The computational basis state `|index>` in a space of `dimension` amplitudes.
    pub fn basis(dimension: usize, index: usize) -> EngineResult<Self> {
        if index >= dimension {
            return Err(EngineError::config(format!(
                "basis index {} out of range for dimension {}",
                index, dimension
            )));
        }
        let mut amplitudes = zeroed(dimension, "state vector")?;
        amplitudes[index] = Amplitude::ONE;
        Ok(Self::new(amplitudes))
    }

    /// Read-only view of the amplitudes.
    pub fn amplitudes(&self) -> &[Amplitude] {
        &self.amplitudes
    }

    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// Sum of squared moduli; 1.0 for a normalized state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Whether every amplitude is within `tolerance` of the matching one in `other`.
    pub fn approx_eq(&self, other: &StateVector, tolerance: f64) -> bool {
        self.len() == other.len()
            && self
                .amplitudes
                .iter()
                .zip(other.amplitudes.iter())
                .all(|(a, b)| a.approx_eq(*b, tolerance))
    }

    /// Whether `self` and `other` share the same amplitude storage.
    pub fn shares_storage(&self, other: &StateVector) -> bool {
        Arc::ptr_eq(&self.amplitudes, &other.amplitudes)
    }

    pub(crate) fn shared(&self) -> Arc<[Amplitude]> {
        Arc::clone(&self.amplitudes)
    }
}

impl From<Vec<Amplitude>> for StateVector {
    fn from(amplitudes: Vec<Amplitude>) -> Self {
        StateVector::new(amplitudes)
    }
}

impl Index<usize> for StateVector {
    type Output = Amplitude;

    fn index(&self, index: usize) -> &Amplitude {
        &self.amplitudes[index]
    }
}

impl fmt::Display for StateVector {
    /// `[ (a+ib, c+id) ]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ (")?;
        for (i, amplitude) in self.amplitudes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", amplitude)?;
        }
        write!(f, ") ]")
    }
}

/// Zero-filled amplitude buffer whose allocation failure is reported instead of aborting.
pub(crate) fn zeroed(len: usize, what: &'static str) -> EngineResult<Vec<Amplitude>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| EngineError::Allocation { what, elements: len })?;
    buffer.resize(len, Amplitude::ZERO);
    Ok(buffer)
}
