use nalgebra::{Dim, Matrix, Scalar, Storage, StorageMut, U1};

use crate::Error;

pub trait LSolver<T, D>
where
    T: Scalar,
    D: Dim,
{
    /// number of threads taking part in a solve, the calling thread excluded
    fn num_threads(&self) -> usize {
        0
    }

    /// Solves the linear system `A x = b`.
    ///
    /// ## Arguments
    /// * `mat_a` the matrix A, left untouched.
    /// * `x` the solution to the linear system upon return.
    /// * `b` the linear system right-hand side.
    ///
    /// ## Notes
    /// Direct solvers that perform no pivoting require every leading principal minor of `A` to be
    /// non-singular. Whether a singular system is reported as an error or left as non-finite
    /// entries in `x` is up to the implementation.
    fn solve<SA, SB, SC>(
        &self,
        mat_a: &Matrix<T, D, D, SA>,
        x: &mut Matrix<T, D, U1, SB>,
        b: &Matrix<T, D, U1, SC>,
    ) -> Result<(), Error>
    where
        SA: Storage<T, D, D>,
        SB: StorageMut<T, D>,
        SC: Storage<T, D>;
}
