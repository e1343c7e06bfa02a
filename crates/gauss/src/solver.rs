use std::{
    sync::{mpsc, Barrier},
    thread,
};

use log::{debug, error};
use nalgebra::{Dim, Matrix, RealField, Storage, StorageMut, U1};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

use crate::{
    classify, controller,
    store::{MatrixStore, ReducedSystem},
    worker::{self, WorkerDescriptor},
    Error, LSolver, DEFAULT_THREADS,
};

/// The two rendezvous points of an elimination round, each shared by the controller and every
/// worker.
pub(crate) struct BarrierPair {
    /// passed once the controller has normalized the pivot row
    normalized: Barrier,
    /// passed once every worker has eliminated the pivot column from its rows
    eliminated: Barrier,
}

impl BarrierPair {
    fn new(workers: usize) -> Self {
        Self {
            normalized: Barrier::new(workers + 1),
            eliminated: Barrier::new(workers + 1),
        }
    }

    pub fn wait_normalized(&self) {
        self.normalized.wait();
    }

    pub fn wait_eliminated(&self) {
        self.eliminated.wait();
    }
}

/// State shared by the controller and the worker pool for the duration of one solve.
pub(crate) struct Shared<T> {
    pub store: MatrixStore<T>,
    pub barriers: BarrierPair,
}

/// Multi-threaded Gaussian elimination solver.
///
/// Forward elimination is shared between the calling thread, which acts as the controller, and a
/// pool of `threads` workers spawned for each solve. Back-substitution runs on the calling thread
/// once the pool has been joined.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gauss {
    /// number of worker threads
    threads: usize,
    /// report zero pivots and non-finite solution components as errors
    check_finite: bool,
    /// stack size requested for workers `k >= .0`
    #[cfg_attr(feature = "serde-serialize", serde(skip))]
    worker_stack: Option<(usize, usize)>,
}

impl Default for Gauss {
    fn default() -> Self {
        Self::new(DEFAULT_THREADS)
    }
}

impl Gauss {
    /// Creates a new solver using `threads` worker threads.
    pub fn new(threads: usize) -> Self {
        Self {
            threads,
            check_finite: true,
            worker_stack: None,
        }
    }

    /// Requests a stack of `size` bytes for every worker from `first_worker` on.
    #[cfg(test)]
    pub(crate) fn with_worker_stack(mut self, first_worker: usize, size: usize) -> Self {
        self.worker_stack = Some((first_worker, size));
        self
    }

    /// Enables or disables the post-solve check for zero pivots and non-finite components.
    ///
    /// With the check disabled a singular system still "succeeds" and the caller is responsible
    /// for inspecting the solution.
    pub fn with_finite_check(mut self, check_finite: bool) -> Self {
        self.check_finite = check_finite;
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn check_finite(&self) -> bool {
        self.check_finite
    }

    /// Solves the row-major `n`-by-`m` system `a x = b`, writing the solution into `x`.
    pub fn solve_slices<T>(
        &self,
        a: &[T],
        b: &[T],
        x: &mut [T],
        n: usize,
        m: usize,
    ) -> Result<(), Error>
    where
        T: RealField + Copy,
    {
        self.validate(n, m, a.len(), b.len(), x.len())?;

        let (reduced, zero_pivot) = self.eliminate(MatrixStore::from_slices(a, b, n))?;
        controller::reverse_move(&reduced, x);
        self.finish(zero_pivot, x)
    }

    fn validate(
        &self,
        n: usize,
        m: usize,
        a_len: usize,
        b_len: usize,
        x_len: usize,
    ) -> Result<(), Error> {
        if self.threads == 0 {
            return Err(Error::IllegalInput {
                msg: "the worker pool needs at least one thread".into(),
            });
        }
        if n == 0 || m == 0 {
            return Err(Error::EmptySystem { n, m });
        }
        if n != m {
            return Err(Error::DimensionMismatch { n, m });
        }

        let Some(entries) = n.checked_mul(m) else {
            return Err(Error::IllegalInput {
                msg: format!("a {}x{} system does not fit in memory", n, m),
            });
        };

        [("a", entries, a_len), ("b", n, b_len), ("x", n, x_len)]
            .into_iter()
            .find(|(_, expected, actual)| expected != actual)
            .map_or(Ok(()), |(name, expected, actual)| {
                Err(Error::BufferLength {
                    name,
                    expected,
                    actual,
                })
            })
    }

    /// Runs forward elimination over `store` with a freshly spawned worker pool.
    ///
    /// Returns the reduced system once every worker has been joined, along with the first column
    /// that had a zero pivot.
    fn eliminate<T>(&self, store: MatrixStore<T>) -> Result<(ReducedSystem<T>, Option<usize>), Error>
    where
        T: RealField + Copy,
    {
        let n = store.dim();
        debug!("Gauss::eliminate n={}, threads={}", n, self.threads);

        let shared = Shared {
            store,
            barriers: BarrierPair::new(self.threads),
        };

        let zero_pivot = thread::scope(|scope| -> Result<Option<usize>, Error> {
            let mut launches = Vec::with_capacity(self.threads);
            let mut handles = Vec::with_capacity(self.threads);

            for k in 0..self.threads {
                let desc = WorkerDescriptor::new(k, self.threads);
                let (launch, launched) = mpsc::channel::<()>();
                let shared = &shared;

                // A worker only enters the barrier protocol once the whole pool exists. If a
                // spawn fails, dropping `launches` sends every spawned worker home instead.
                let mut builder = thread::Builder::new().name(format!("gauss-worker-{}", k));
                if let Some((first_worker, size)) = self.worker_stack {
                    if k >= first_worker {
                        builder = builder.stack_size(size);
                    }
                }
                let handle = builder
                    .spawn_scoped(scope, move || {
                        if launched.recv().is_ok() {
                            worker::run(desc, shared);
                        }
                    })
                    .map_err(|source| {
                        error!("Gauss::eliminate failed to spawn worker {}: {}", k, source);
                        Error::Spawn { worker: k, source }
                    })?;

                launches.push(launch);
                handles.push(handle);
            }

            for launch in &launches {
                // the receiver lives until its worker has been launched
                let _ = launch.send(());
            }

            let zero_pivot = controller::direct_move(&shared);

            join_pool(handles)?;

            Ok(zero_pivot)
        })?;

        debug!("Gauss::eliminate done, zero_pivot={:?}", zero_pivot);
        Ok((shared.store.into_rows(), zero_pivot))
    }

    fn finish<T>(&self, zero_pivot: Option<usize>, x: &[T]) -> Result<(), Error>
    where
        T: RealField + Copy,
    {
        if !self.check_finite {
            return Ok(());
        }
        if let Some(col) = zero_pivot {
            return Err(Error::ZeroPivot { col });
        }
        classify(x)
    }
}

/// Joins every worker, then reports the first one that panicked.
///
/// The whole pool is joined before returning so that no panic is left for the enclosing scope to
/// propagate.
fn join_pool(handles: Vec<thread::ScopedJoinHandle<'_, ()>>) -> Result<(), Error> {
    let panicked: Vec<usize> = handles
        .into_iter()
        .enumerate()
        .filter_map(|(worker, handle)| handle.join().err().map(|_| worker))
        .collect();

    match panicked.first() {
        Some(&worker) => {
            error!("Gauss::eliminate workers {:?} panicked", panicked);
            Err(Error::WorkerPanicked { worker })
        }
        None => Ok(()),
    }
}

impl<T, D> LSolver<T, D> for Gauss
where
    T: RealField + Copy,
    D: Dim,
{
    fn num_threads(&self) -> usize {
        self.threads
    }

    fn solve<SA, SB, SC>(
        &self,
        mat_a: &Matrix<T, D, D, SA>,
        x: &mut Matrix<T, D, U1, SB>,
        b: &Matrix<T, D, U1, SC>,
    ) -> Result<(), Error>
    where
        SA: Storage<T, D, D>,
        SB: StorageMut<T, D>,
        SC: Storage<T, D>,
    {
        let (n, m) = mat_a.shape();
        self.validate(n, m, mat_a.len(), b.nrows(), x.nrows())?;

        let (reduced, zero_pivot) = self.eliminate(MatrixStore::from_matrix(mat_a, b))?;
        let mut sol = vec![T::zero(); n];
        controller::reverse_move(&reduced, &mut sol);
        x.iter_mut().zip(sol.iter()).for_each(|(xi, si)| *xi = *si);

        self.finish(zero_pivot, &sol)
    }
}
