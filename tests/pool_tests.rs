// tests/pool_tests.rs

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use qsquad::core::PRINT_TOLERANCE;
use qsquad::{Amplitude, EngineError, Matrix, StateVector, WorkerPool};
use std::sync::Arc;

fn matrix_from(n: usize, entries: &[(f64, f64)]) -> Matrix {
    let rows: Vec<Vec<Amplitude>> = entries
        .chunks(n)
        .map(|row| row.iter().map(|&(re, im)| Amplitude::new(re, im)).collect())
        .collect();
    Matrix::from_rows(rows).unwrap()
}

fn state_from(entries: &[(f64, f64)]) -> StateVector {
    StateVector::new(entries.iter().map(|&(re, im)| Amplitude::new(re, im)).collect())
}

fn hadamard_5dp() -> Arc<Matrix> {
    Arc::new(Matrix::from_real_rows(&[&[0.70711, 0.70711], &[0.70711, -0.70711]]).unwrap())
}

#[test]
fn identity_on_two_workers() {
    let mut pool = WorkerPool::new(2, 2).unwrap();
    let identity = Arc::new(Matrix::from_real_rows(&[&[1.0, 0.0], &[0.0, 1.0]]).unwrap());
    let v = state_from(&[(1.0, 0.0), (0.0, 0.0)]);

    let out = pool.submit(&identity, &v).unwrap();
    assert_eq!(out, state_from(&[(1.0, 0.0), (0.0, 0.0)]));
    pool.shutdown().unwrap();
}

#[test]
fn hadamard_on_ground_state() {
    let mut pool = WorkerPool::new(2, 2).unwrap();
    let out = pool.submit(&hadamard_5dp(), &state_from(&[(1.0, 0.0), (0.0, 0.0)])).unwrap();

    for amplitude in out.amplitudes() {
        assert_abs_diff_eq!(amplitude.re(), 0.70711, epsilon = PRINT_TOLERANCE);
        assert_abs_diff_eq!(amplitude.im(), 0.0, epsilon = PRINT_TOLERANCE);
    }
    assert_eq!(out.to_string(), "[ (0.70711+i0.00000, 0.70711+i0.00000) ]");
    pool.shutdown().unwrap();
}

#[test]
fn wrong_dimension_leaves_pool_usable() {
    let mut pool = WorkerPool::new(2, 2).unwrap();
    let too_big = Arc::new(Matrix::identity(4).unwrap());
    let v = StateVector::basis(2, 0).unwrap();

    assert_eq!(
        pool.submit(&too_big, &v),
        Err(EngineError::DimensionMismatch { context: "pool submission matrix", expected: 2, found: 4 })
    );
    assert_eq!(pool.jobs_completed(), 0);

    let out = pool.submit(&hadamard_5dp(), &v).unwrap();
    assert_abs_diff_eq!(out[1].re(), 0.70711, epsilon = PRINT_TOLERANCE);
    assert_eq!(pool.jobs_completed(), 1);
    pool.shutdown().unwrap();
}

#[test]
fn wrong_vector_length_is_rejected() {
    let mut pool = WorkerPool::new(1, 2).unwrap();
    let err = pool.submit(&hadamard_5dp(), &StateVector::basis(4, 0).unwrap()).unwrap_err();
    assert_eq!(
        err,
        EngineError::DimensionMismatch { context: "pool submission vector", expected: 2, found: 4 }
    );
    pool.shutdown().unwrap();
}

#[test]
fn resubmission_gives_identical_results() {
    let entries: Vec<(f64, f64)> = (0..16).map(|k| (k as f64 * 0.1, 1.0 - k as f64 * 0.05)).collect();
    let m = Arc::new(matrix_from(4, &entries));
    let v = state_from(&[(0.5, 0.5), (0.0, -0.5), (0.5, 0.0), (-0.25, 0.25)]);
    let mut pool = WorkerPool::new(3, 4).unwrap();

    let first = pool.submit(&m, &v).unwrap();
    let second = pool.submit(&m, &v).unwrap();
    assert_eq!(first, second);
    assert!(!first.shares_storage(&second));
    pool.shutdown().unwrap();
}

#[test]
fn recreated_pool_starts_fresh() {
    let mut small = WorkerPool::new(2, 2).unwrap();
    small.submit(&hadamard_5dp(), &StateVector::basis(2, 0).unwrap()).unwrap();
    small.shutdown().unwrap();

    let mut large = WorkerPool::new(3, 8).unwrap();
    assert_eq!(large.jobs_completed(), 0);
    assert_eq!(large.workers(), 3);
    assert_eq!(large.dimension(), 8);
    assert_eq!(large.row_ranges(), &[0..2, 2..4, 4..8]);

    let identity = Arc::new(Matrix::identity(8).unwrap());
    let v = StateVector::basis(8, 6).unwrap();
    assert_eq!(large.submit(&identity, &v).unwrap(), v);
    large.shutdown().unwrap();
}

#[test]
fn independent_pools_coexist() {
    let mut a = WorkerPool::new(2, 2).unwrap();
    let mut b = WorkerPool::new(2, 4).unwrap();
    let x = Arc::new(Matrix::from_real_rows(&[&[0.0, 1.0], &[1.0, 0.0]]).unwrap());
    let id4 = Arc::new(Matrix::identity(4).unwrap());

    assert_eq!(a.submit(&x, &StateVector::basis(2, 0).unwrap()).unwrap(), StateVector::basis(2, 1).unwrap());
    assert_eq!(b.submit(&id4, &StateVector::basis(4, 2).unwrap()).unwrap(), StateVector::basis(4, 2).unwrap());
    a.shutdown().unwrap();
    b.shutdown().unwrap();
}

fn square_entries() -> impl Strategy<Value = (usize, Vec<(f64, f64)>, Vec<(f64, f64)>)> {
    (1usize..=9).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((-2.0f64..2.0, -2.0f64..2.0), n * n),
            prop::collection::vec((-2.0f64..2.0, -2.0f64..2.0), n),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Pooled and sequential products agree exactly for every worker count 1..=n.
    #[test]
    fn pooled_matches_sequential((n, m_entries, v_entries) in square_entries()) {
        let m = Arc::new(matrix_from(n, &m_entries));
        let v = state_from(&v_entries);
        let expected = m.mul_vector(v.amplitudes()).unwrap();

        for workers in 1..=n {
            let mut pool = WorkerPool::new(workers, n).unwrap();
            let pooled = pool.submit(&m, &v).unwrap();
            pool.shutdown().unwrap();
            prop_assert_eq!(&pooled, &expected, "workers = {}", workers);
        }
    }
}
