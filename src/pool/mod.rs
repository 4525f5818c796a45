// src/pool/mod.rs

//! A fixed squad of persistent worker threads for repeated matrix-vector products.
//!
//! Threads are started once by [`WorkerPool::new`] and reused for every
//! [`WorkerPool::submit`]. Each worker owns a fixed contiguous range of matrix
//! rows for the pool's whole lifetime. Coordination goes through a single
//! monitor: one mutex over the job board and two condition variables, one that
//! announces new work and one that announces a finished job.
//!
//! Jobs are identified by a monotonically increasing epoch. A worker remembers
//! the last epoch it processed and only wakes for a different one, so it can
//! neither run the same job twice nor miss a job published before it started
//! waiting.
//!
//! ```
//! use qsquad::{Amplitude, Matrix, StateVector, WorkerPool};
//! use std::sync::Arc;
//!
//! let mut pool = WorkerPool::new(2, 2)?;
//! let x = Arc::new(Matrix::from_real_rows(&[&[0.0, 1.0], &[1.0, 0.0]])?);
//! let flipped = pool.submit(&x, &StateVector::basis(2, 0)?)?;
//! assert_eq!(flipped[1], Amplitude::ONE);
//! pool.shutdown()?;
//! # Ok::<(), qsquad::EngineError>(())
//! ```

mod partition;

pub use partition::partition_rows;

use crate::core::amplitude::dot;
use crate::core::state::zeroed;
use crate::core::{Amplitude, EngineError, EngineResult, StateVector};
use crate::matrix::Matrix;
use parking_lot::{Condvar, Mutex};
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

/// Called by a worker with `(worker index, epoch)` right before it computes its rows.
#[cfg(test)]
type WorkerHook = Arc<dyn Fn(usize, u64) + Send + Sync>;

/// Fault and scheduling injection for the pool's own tests.
#[cfg(test)]
#[derive(Clone, Default)]
struct Seams {
    hook: Option<WorkerHook>,
    /// Worker index whose thread start is reported as failed.
    fail_spawn_at: Option<usize>,
    /// Receives a weak handle to the pool's shared state once it exists.
    shared: Arc<Mutex<std::sync::Weak<Shared>>>,
}

/// Read-only inputs of the job in flight.
#[derive(Clone)]
struct Job {
    matrix: Arc<Matrix>,
    input: Arc<[Amplitude]>,
}

/// The shared job descriptor. Only ever touched with the monitor lock held.
struct Board {
    /// Identifier of the most recently published job; 0 means none yet.
    epoch: u64,
    work_available: bool,
    finished: usize,
    terminate: bool,
    job: Option<Job>,
    /// First worker whose computation panicked during the current job.
    failed: Option<usize>,
}

struct Shared {
    board: Mutex<Board>,
    work_ready: Condvar,
    job_done: Condvar,
    workers: usize,
    /// One row buffer per worker, sized to its range at spawn. Worker `i` is
    /// the only writer of `slots[i]`; the submitter reads them after the barrier.
    slots: Vec<Mutex<Vec<Amplitude>>>,
}

/// Per-thread state, moved into the worker thread at spawn.
struct Worker {
    index: usize,
    rows: Range<usize>,
    last_seen: u64,
    shared: Arc<Shared>,
    #[cfg(test)]
    hook: Option<WorkerHook>,
}

impl Worker {
    fn run(mut self) {
        trace!(worker = self.index, rows = ?self.rows, "worker waiting for first job");
        loop {
            // WAITING
            let (epoch, job) = {
                let mut board = self.shared.board.lock();
                let last_seen = self.last_seen;
                self.shared.work_ready.wait_while(&mut board, |b| {
                    !b.terminate && !(b.work_available && b.epoch != last_seen)
                });
                if board.terminate {
                    trace!(worker = self.index, "worker terminating");
                    return;
                }
                self.last_seen = board.epoch;
                (board.epoch, board.job.clone())
            };

            // COMPUTING, monitor released
            trace!(worker = self.index, epoch, "computing rows");
            let computed = panic::catch_unwind(AssertUnwindSafe(|| {
                #[cfg(test)]
                if let Some(hook) = &self.hook {
                    hook(self.index, epoch);
                }
                if let Some(job) = &job {
                    self.compute(job);
                }
            }));
            // Inputs are released before the job is reported finished.
            drop(job);

            let mut board = self.shared.board.lock();
            if computed.is_err() {
                warn!(worker = self.index, epoch, "worker computation panicked");
                board.failed.get_or_insert(self.index);
            }
            board.finished += 1;
            if board.finished == self.shared.workers {
                board.work_available = false;
                self.shared.job_done.notify_one();
            }
        }
    }

    /// Writes this worker's rows of `matrix · input` into its own slot.
    fn compute(&self, job: &Job) {
        let mut slot = self.shared.slots[self.index].lock();
        slot.clear();
        // Capacity was reserved at spawn; this never reallocates.
        slot.extend(self.rows.clone().map(|i| dot(job.matrix.row(i), &job.input)));
    }
}

/// Persistent pool of matrix-vector worker threads bound to one dimension.
///
/// Lifecycle is `new → submit* → shutdown`. Dropping the pool without calling
/// [`WorkerPool::shutdown`] performs the same teardown.
pub struct WorkerPool {
    shared: Arc<Shared>,
    handles: Vec<JoinHandle<()>>,
    ranges: Vec<Range<usize>>,
    dimension: usize,
    jobs_completed: u64,
}

impl WorkerPool {
    /// Starts `workers` threads for `dimension × dimension` operators.
    ///
    /// A worker count above `dimension` is clamped to `dimension` so that no
    /// worker is left without rows.
    ///
    /// # Errors
    /// * `EngineError::InvalidConfiguration` if `workers` or `dimension` is zero.
    /// * `EngineError::Allocation` if the worker tables or row buffers cannot
    ///   be reserved. No thread has been started at that point.
    /// * `EngineError::WorkerSpawn` if a thread fails to start; workers already
    ///   running are terminated and joined before returning.
    pub fn new(workers: usize, dimension: usize) -> EngineResult<Self> {
        #[cfg(test)]
        let pool = Self::spawn(workers, dimension, &Seams::default());
        #[cfg(not(test))]
        let pool = Self::spawn(workers, dimension);
        pool
    }

    fn spawn(workers: usize, dimension: usize, #[cfg(test)] seams: &Seams) -> EngineResult<Self> {
        if workers == 0 {
            return Err(EngineError::config("worker count must be positive"));
        }
        if dimension == 0 {
            return Err(EngineError::config("pool dimension must be positive"));
        }
        let workers = if workers > dimension {
            warn!(requested = workers, dimension, "clamping worker count to matrix dimension");
            dimension
        } else {
            workers
        };

        let ranges = partition_rows(dimension, workers);
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(workers)
            .map_err(|_| EngineError::Allocation { what: "worker slot table", elements: workers })?;
        for rows in &ranges {
            let mut buffer = Vec::new();
            buffer
                .try_reserve_exact(rows.len())
                .map_err(|_| EngineError::Allocation { what: "worker row buffer", elements: rows.len() })?;
            slots.push(Mutex::new(buffer));
        }

        let shared = Arc::new(Shared {
            board: Mutex::new(Board {
                epoch: 0,
                work_available: false,
                finished: 0,
                terminate: false,
                job: None,
                failed: None,
            }),
            work_ready: Condvar::new(),
            job_done: Condvar::new(),
            workers,
            slots,
        });
        #[cfg(test)]
        {
            *seams.shared.lock() = Arc::downgrade(&shared);
        }

        let mut handles = Vec::new();
        handles
            .try_reserve_exact(workers)
            .map_err(|_| EngineError::Allocation { what: "worker table", elements: workers })?;

        for (index, rows) in ranges.iter().cloned().enumerate() {
            let worker = Worker {
                index,
                rows,
                last_seen: 0,
                shared: Arc::clone(&shared),
                #[cfg(test)]
                hook: seams.hook.clone(),
            };
            let builder = thread::Builder::new().name(format!("qsquad-worker-{}", index));
            #[cfg(test)]
            let spawned = match seams.fail_spawn_at {
                Some(failing) if failing == index => Err(std::io::Error::other("injected spawn failure")),
                _ => builder.spawn(move || worker.run()),
            };
            #[cfg(not(test))]
            let spawned = builder.spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    warn!(worker = index, error = %err, "worker failed to start, rolling back");
                    // The rollback's own join result is irrelevant next to the spawn failure.
                    let _ = terminate_and_join(&shared, &mut handles);
                    return Err(EngineError::WorkerSpawn { index, message: err.to_string() });
                }
            }
        }

        debug!(workers, dimension, "worker pool started");
        Ok(Self { shared, handles, ranges, dimension, jobs_completed: 0 })
    }

    /// Computes `matrix · input` across all workers and blocks until every row is done.
    ///
    /// Taking `&mut self` keeps a single submitter per pool: a second job cannot
    /// be published while one is in flight.
    ///
    /// # Errors
    /// * `EngineError::DimensionMismatch` if the matrix or vector does not match
    ///   the pool dimension. The pool is left untouched.
    /// * `EngineError::Allocation` if the output vector cannot be allocated.
    /// * `EngineError::WorkerPanicked` if a worker's computation panicked; the
    ///   pool remains usable for later jobs.
    pub fn submit(&mut self, matrix: &Arc<Matrix>, input: &StateVector) -> EngineResult<StateVector> {
        if matrix.dimension() != self.dimension {
            return Err(EngineError::mismatch("pool submission matrix", self.dimension, matrix.dimension()));
        }
        if input.len() != self.dimension {
            return Err(EngineError::mismatch("pool submission vector", self.dimension, input.len()));
        }
        let mut output = zeroed(self.dimension, "job output")?;

        let (epoch, failed) = {
            let mut board = self.shared.board.lock();
            board.job = Some(Job { matrix: Arc::clone(matrix), input: input.shared() });
            board.epoch += 1;
            board.finished = 0;
            board.failed = None;
            board.work_available = true;
            self.shared.work_ready.notify_all();

            // Barrier: the last worker to finish clears work_available.
            self.shared.job_done.wait_while(&mut board, |b| b.work_available);

            board.job = None;
            (board.epoch, board.failed.take())
        };

        self.jobs_completed += 1;
        if let Some(index) = failed {
            return Err(EngineError::WorkerPanicked { index });
        }
        for (rows, slot) in self.ranges.iter().zip(&self.shared.slots) {
            output[rows.clone()].copy_from_slice(&slot.lock());
        }
        trace!(epoch, dimension = self.dimension, "job complete");
        Ok(StateVector::new(output))
    }

    /// Signals termination, joins every worker and releases the pool.
    ///
    /// # Errors
    /// `EngineError::WorkerPanicked` naming the first worker that could not be
    /// joined cleanly. All other workers are still joined.
    pub fn shutdown(mut self) -> EngineResult<()> {
        self.stop()
    }

    /// Effective number of workers after clamping.
    pub fn workers(&self) -> usize {
        self.shared.workers
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Row range assigned to each worker, in worker order.
    pub fn row_ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Number of jobs submitted and finished so far.
    pub fn jobs_completed(&self) -> u64 {
        self.jobs_completed
    }

    fn stop(&mut self) -> EngineResult<()> {
        if self.handles.is_empty() {
            return Ok(());
        }
        let result = terminate_and_join(&self.shared, &mut self.handles);
        debug!(workers = self.shared.workers, jobs = self.jobs_completed, "worker pool stopped");
        result
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!(error = %err, "worker pool teardown on drop failed");
        }
    }
}

fn terminate_and_join(shared: &Shared, handles: &mut Vec<JoinHandle<()>>) -> EngineResult<()> {
    shared.board.lock().terminate = true;
    shared.work_ready.notify_all();

    let mut first_failure = None;
    for (index, handle) in handles.drain(..).enumerate() {
        if handle.join().is_err() {
            first_failure.get_or_insert(index);
        }
    }
    match first_failure {
        Some(index) => Err(EngineError::WorkerPanicked { index }),
        None => Ok(()),
    }
}
