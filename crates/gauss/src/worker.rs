//! Worker side of the forward elimination.
//!
//! ```text
//!  worker 0 | 1 a01 a02 | b0 |
//!  worker 1 | 0 a11 a12 | b1 |
//!  worker 0 | 0 a21 a22 | b2 |
//! ```

use nalgebra::RealField;

use crate::solver::Shared;

/// Strided row partition owned by one worker thread: rows `start, start + step, ...`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct WorkerDescriptor {
    /// index of the worker, and the first row it owns
    pub start: usize,
    /// number of workers in the pool
    pub step: usize,
}

impl WorkerDescriptor {
    pub fn new(start: usize, step: usize) -> Self {
        debug_assert!(step > 0 && start < step);
        Self { start, step }
    }

    /// Rows owned by this worker that lie strictly below the pivot row `col`.
    pub fn rows_below(&self, col: usize, n: usize) -> impl Iterator<Item = usize> {
        let first = col + 1;
        let offset = (self.start + self.step - first % self.step) % self.step;
        (first + offset..n).step_by(self.step)
    }
}

/// Eliminates column `col` from `row` using the already normalized pivot row.
///
/// The row is rescaled so that its entry in column `col` becomes one before the pivot row is
/// subtracted, leaving an exact zero in that column. Rows whose entry is already zero are left
/// untouched, and `false` is returned.
pub(crate) fn eliminate_column<T>(
    pivot: &[T],
    pivot_b: T,
    row: &mut [T],
    b: &mut T,
    col: usize,
) -> bool
where
    T: RealField + Copy,
{
    let factor = row[col];
    if factor == T::zero() {
        return false;
    }

    *b = *b / factor - pivot_b;
    for (a_ik, &a_jk) in row[col..].iter_mut().zip(pivot[col..].iter()) {
        *a_ik = *a_ik / factor - a_jk;
    }
    true
}

/// Body of a worker thread.
///
/// Every round the worker waits until the controller has normalized the pivot row, eliminates the
/// pivot column from its own rows, and reports back. The last column has no rows below it, so the
/// worker leaves the loop after `n - 1` rounds and joins the controller's final round without
/// doing any work.
pub(crate) fn run<T>(desc: WorkerDescriptor, shared: &Shared<T>)
where
    T: RealField + Copy,
{
    let n = shared.store.dim();

    for col in 0..n.saturating_sub(1) {
        shared.barriers.wait_normalized();

        for i in desc.rows_below(col, n) {
            // SAFETY: between the two barriers the controller does not touch the matrix, row `col`
            // is only read, and row `i > col` is owned by this worker alone.
            let (pivot, pivot_b) = unsafe { shared.store.row(col) };
            let (row, b) = unsafe { shared.store.row_mut(i) };
            eliminate_column(pivot, pivot_b, row, b, col);
        }

        shared.barriers.wait_eliminated();
    }

    shared.barriers.wait_normalized();
    shared.barriers.wait_eliminated();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_below_partition() {
        let n = 10;
        let step = 3;
        for col in 0..n {
            let mut rows: Vec<usize> = (0..step)
                .flat_map(|start| WorkerDescriptor::new(start, step).rows_below(col, n))
                .collect();
            rows.sort_unstable();
            assert_eq!(rows, ((col + 1)..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_rows_below_fixed_ownership() {
        let desc = WorkerDescriptor::new(1, 4);
        assert_eq!(desc.rows_below(0, 10).collect::<Vec<_>>(), vec![1, 5, 9]);
        assert_eq!(desc.rows_below(1, 10).collect::<Vec<_>>(), vec![5, 9]);
        assert_eq!(desc.rows_below(5, 10).collect::<Vec<_>>(), vec![9]);
        assert_eq!(desc.rows_below(9, 10).count(), 0);
    }

    #[test]
    fn test_more_workers_than_rows() {
        let desc = WorkerDescriptor::new(7, 8);
        assert_eq!(desc.rows_below(0, 3).count(), 0);
    }

    #[test]
    fn test_eliminate_column() {
        let pivot = [1.0, 2.0, 3.0];
        let mut row = [4.0, 5.0, 6.0];
        let mut b = 2.0;
        assert!(eliminate_column(&pivot, 1.0, &mut row, &mut b, 0));
        assert_eq!(row, [0.0, 5.0 / 4.0 - 2.0, 6.0 / 4.0 - 3.0]);
        assert_eq!(b, 2.0 / 4.0 - 1.0);
    }

    #[test]
    fn test_eliminate_column_skips_zero() {
        let pivot = [1.0, 2.0];
        let mut row = [0.0, 5.0];
        let mut b = 2.0;
        assert!(!eliminate_column(&pivot, 1.0, &mut row, &mut b, 0));
        assert_eq!(row, [0.0, 5.0]);
        assert_eq!(b, 2.0);
    }
}
