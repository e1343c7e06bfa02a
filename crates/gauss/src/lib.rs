//! Shared-memory parallel solver for dense linear systems `A x = b`.
//!
//! Forward elimination ("direct move") is split between a controller, which normalizes one pivot
//! row per round, and a fixed pool of worker threads that eliminate the pivot column from a
//! strided subset of the remaining rows. Controller and workers rendezvous on a pair of barriers
//! every round. Back-substitution ("reverse move") runs on the calling thread once every worker
//! has been joined.
//!
//! No pivoting is performed: the diagonal of the current row is always the pivot. A zero pivot
//! turns into `NaN`/`inf` entries in the solution, which [`Gauss`] reports as an [`Error`] unless
//! the finite check has been switched off.
//!
//! ```
//! let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0, 12.0, 14.0];
//! let b = [1.0, 2.0, 3.0];
//! let mut x = [0.0; 3];
//! gauss::solve(&a, &b, &mut x, 3, 3).unwrap();
//! assert!((x[0] - 0.833333).abs() < 1e-4);
//! ```

mod controller;
pub mod norm;
mod solver;
mod store;
mod traits;
mod worker;

pub use solver::Gauss;
pub use traits::LSolver;

use nalgebra::RealField;
use thiserror::Error;

/// Number of worker threads used by [`solve`] and [`Gauss::default`].
pub const DEFAULT_THREADS: usize = 4;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The system is empty (n = {n}, m = {m})")]
    EmptySystem { n: usize, m: usize },

    #[error("The system must be square, got {n} unknowns and {m} equations")]
    DimensionMismatch { n: usize, m: usize },

    #[error("Buffer `{name}` has length {actual}, expected {expected}")]
    BufferLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("One of the input arguments was illegal: {msg}")]
    IllegalInput { msg: String },

    #[error("A zero pivot was encountered during forward elimination (col {col})")]
    ZeroPivot { col: usize },

    #[error("Solution component {index} is NaN")]
    NotANumber { index: usize },

    #[error("Solution component {index} is infinite")]
    Infinite { index: usize },

    #[error("Failed to spawn worker thread {worker}")]
    Spawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker thread {worker} panicked")]
    WorkerPanicked { worker: usize },
}

/// Checks a computed solution for non-finite components.
///
/// Returns the first offending component, distinguishing `NaN` (an indeterminate `0/0` pivot
/// division) from `±inf` (division by a vanishing pivot, or overflow).
pub fn classify<T: RealField + Copy>(x: &[T]) -> Result<(), Error> {
    for (index, &xi) in x.iter().enumerate() {
        if xi.is_finite() {
            continue;
        }
        // NaN is unordered, infinities are not
        if xi.partial_cmp(&T::zero()).is_none() {
            return Err(Error::NotANumber { index });
        }
        return Err(Error::Infinite { index });
    }
    Ok(())
}

/// Solves the `n`-by-`m` row-major system `a x = b` with the default [`Gauss`] configuration.
///
/// `a` holds `n * m` coefficients, `b` and `x` hold `n` entries each, and the system must be
/// square (`n == m`). On success `x` contains the solution.
pub fn solve(a: &[f64], b: &[f64], x: &mut [f64], n: usize, m: usize) -> Result<(), Error> {
    Gauss::default().solve_slices(a, b, x, n, m)
}
