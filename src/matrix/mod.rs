// src/matrix/mod.rs

//! Dense square complex matrices and the sequential reference products.
//!
//! The sequential [`Matrix::mul_vector`] is the correctness baseline for the
//! pooled product in [`crate::pool`]; both compute
//! `result[i] = Σ_j m[i][j] · v[j]` with the same accumulation order, so their
//! outputs agree bit for bit.

use crate::core::amplitude::dot;
use crate::core::state::zeroed;
use crate::core::{Amplitude, EngineError, EngineResult, StateVector};
use std::fmt;

/// A `dimension × dimension` grid of amplitudes stored row-major.
///
/// Contents are written through [`Matrix::set`] while an operator is being
/// built and treated as read-only once a circuit starts executing.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    dimension: usize,
    data: Vec<Amplitude>,
}

impl Matrix {
    /// Allocates a zero-filled square matrix.
    ///
    /// # Errors
    /// `EngineError::Allocation` if the storage cannot be reserved or
    /// `dimension²` overflows `usize`.
    pub fn new(dimension: usize) -> EngineResult<Self> {
        let elements = dimension
            .checked_mul(dimension)
            .ok_or(EngineError::Allocation { what: "matrix", elements: usize::MAX })?;
        Ok(Self { dimension, data: zeroed(elements, "matrix")? })
    }

    /// The identity operator of the given dimension.
    pub fn identity(dimension: usize) -> EngineResult<Self> {
        let mut matrix = Self::new(dimension)?;
        for i in 0..dimension {
            matrix.data[i * dimension + i] = Amplitude::ONE;
        }
        Ok(matrix)
    }

    /// Builds a matrix from explicit rows.
    ///
    /// # Errors
    /// `EngineError::DimensionMismatch` if any row length differs from the row count.
    pub fn from_rows<R>(rows: Vec<R>) -> EngineResult<Self>
    where
        R: AsRef<[Amplitude]>,
    {
        let dimension = rows.len();
        let mut matrix = Self::new(dimension)?;
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != dimension {
                return Err(EngineError::mismatch("matrix row", dimension, row.len()));
            }
            matrix.data[i * dimension..(i + 1) * dimension].copy_from_slice(row);
        }
        Ok(matrix)
    }

    /// Builds a matrix from rows of real entries.
    pub fn from_real_rows(rows: &[&[f64]]) -> EngineResult<Self> {
        Self::from_rows(
            rows.iter()
                .map(|row| row.iter().copied().map(Amplitude::real).collect::<Vec<_>>())
                .collect(),
        )
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Element at `(row, column)`, or `None` outside the grid.
    pub fn get(&self, row: usize, column: usize) -> Option<Amplitude> {
        if row < self.dimension && column < self.dimension {
            Some(self.data[row * self.dimension + column])
        } else {
            None
        }
    }

    /// Writes the element at `(row, column)`.
    ///
    /// # Errors
    /// `EngineError::DimensionMismatch` if the position lies outside the grid.
    pub fn set(&mut self, row: usize, column: usize, value: Amplitude) -> EngineResult<()> {
        if row >= self.dimension || column >= self.dimension {
            return Err(EngineError::mismatch(
                "matrix element index",
                self.dimension,
                row.max(column) + 1,
            ));
        }
        self.data[row * self.dimension + column] = value;
        Ok(())
    }

    /// Row `index` as a slice.
    ///
    /// # Panics
    /// Panics if `index >= dimension`.
    pub fn row(&self, index: usize) -> &[Amplitude] {
        &self.data[index * self.dimension..(index + 1) * self.dimension]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Amplitude]> {
        // chunks_exact panics on zero, and a 0×0 matrix has no rows anyway
        self.data.chunks_exact(self.dimension.max(1))
    }

    /// Matrix product `self · other`, O(N³).
    ///
    /// `result[i][j] = Σ_k self[i][k] · other[k][j]`
    pub fn multiply(&self, other: &Matrix) -> EngineResult<Matrix> {
        if self.dimension != other.dimension {
            return Err(EngineError::mismatch("matrix product", self.dimension, other.dimension));
        }
        let n = self.dimension;
        let mut result = Matrix::new(n)?;
        for i in 0..n {
            for j in 0..n {
                let mut sum = Amplitude::ZERO;
                for k in 0..n {
                    sum = sum.add(self.data[i * n + k].multiply(other.data[k * n + j]));
                }
                result.data[i * n + j] = sum;
            }
        }
        Ok(result)
    }

    /// Sequential matrix-vector product, O(N²).
    ///
    /// # Errors
    /// `EngineError::DimensionMismatch` if `vector.len() != dimension`.
    pub fn mul_vector(&self, vector: &[Amplitude]) -> EngineResult<StateVector> {
        if vector.len() != self.dimension {
            return Err(EngineError::mismatch("matrix-vector product", self.dimension, vector.len()));
        }
        let mut result = zeroed(self.dimension, "state vector")?;
        for (i, slot) in result.iter_mut().enumerate() {
            *slot = dot(self.row(i), vector);
        }
        Ok(StateVector::new(result))
    }

    /// Conjugate transpose `M†`.
    pub fn adjoint(&self) -> EngineResult<Matrix> {
        let n = self.dimension;
        let mut result = Matrix::new(n)?;
        for i in 0..n {
            for j in 0..n {
                result.data[j * n + i] = self.data[i * n + j].conj();
            }
        }
        Ok(result)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for i in 0..self.dimension {
            write!(f, "(")?;
            for (j, value) in self.row(i).iter().enumerate() {
                write!(f, "{}", value)?;
                if j + 1 < self.dimension {
                    write!(f, ",")?;
                }
                write!(f, " ")?;
            }
            write!(f, ")")?;
            if i + 1 < self.dimension {
                writeln!(f)?;
            }
        }
        write!(f, " ]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn pauli_x() -> Matrix {
        Matrix::from_real_rows(&[&[0.0, 1.0], &[1.0, 0.0]]).unwrap()
    }

    #[test]
    fn new_matrix_is_zeroed() {
        let m = Matrix::new(3).unwrap();
        assert_eq!(m.dimension(), 3);
        assert!(m.rows().flatten().all(|a| *a == Amplitude::ZERO));
        assert_eq!(m.get(3, 0), None);
    }

    #[test]
    fn oversized_matrix_is_an_error_not_an_abort() {
        // dimension² overflows usize
        assert_eq!(
            Matrix::new(usize::MAX),
            Err(EngineError::Allocation { what: "matrix", elements: usize::MAX })
        );
        // 2^62 elements fits usize but not the address space
        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            Matrix::new(1 << 31),
            Err(EngineError::Allocation { what: "matrix", elements: 1 << 62 })
        );
        assert!(matches!(Matrix::identity(usize::MAX), Err(EngineError::Allocation { .. })));
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let rows = vec![vec![Amplitude::ONE, Amplitude::ZERO], vec![Amplitude::ONE]];
        assert_eq!(
            Matrix::from_rows(rows),
            Err(EngineError::mismatch("matrix row", 2, 1))
        );
    }

    #[test]
    fn set_outside_grid_fails() {
        let mut m = Matrix::new(2).unwrap();
        assert!(m.set(1, 1, Amplitude::ONE).is_ok());
        assert!(m.set(2, 0, Amplitude::ONE).is_err());
        assert_eq!(m.get(1, 1), Some(Amplitude::ONE));
    }

    #[test]
    fn identity_times_vector_is_vector() {
        let v = [Amplitude::new(0.3, -0.1), Amplitude::new(0.2, 0.9)];
        let out = Matrix::identity(2).unwrap().mul_vector(&v).unwrap();
        assert_eq!(out.amplitudes(), &v);
    }

    #[test]
    fn pauli_x_squared_is_identity() {
        let x = pauli_x();
        assert_eq!(x.multiply(&x).unwrap(), Matrix::identity(2).unwrap());
    }

    #[test]
    fn multiply_rejects_mismatched_dimensions() {
        let err = pauli_x().multiply(&Matrix::identity(4).unwrap()).unwrap_err();
        assert_eq!(err, EngineError::mismatch("matrix product", 2, 4));
    }

    #[test]
    fn mul_vector_rejects_wrong_length() {
        let err = pauli_x().mul_vector(&[Amplitude::ONE]).unwrap_err();
        assert_eq!(err, EngineError::mismatch("matrix-vector product", 2, 1));
    }

    #[test]
    fn hadamard_adjoint_product_is_identity() {
        let h = Matrix::from_real_rows(&[
            &[FRAC_1_SQRT_2, FRAC_1_SQRT_2],
            &[FRAC_1_SQRT_2, -FRAC_1_SQRT_2],
        ])
        .unwrap();
        let product = h.multiply(&h.adjoint().unwrap()).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { Amplitude::ONE } else { Amplitude::ZERO };
                assert!(product.get(i, j).unwrap().approx_eq(expected, 1e-12));
            }
        }
    }

    #[test]
    fn display_lists_rows() {
        let text = pauli_x().to_string();
        assert_eq!(
            text,
            "[ (0.00000+i0.00000, 1.00000+i0.00000 )\n(1.00000+i0.00000, 0.00000+i0.00000 ) ]"
        );
    }
}
