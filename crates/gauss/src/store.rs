//! Call-local working copies of the coefficient matrix and the right-hand side.

use std::cell::UnsafeCell;

use nalgebra::{Dim, Matrix, RealField, Storage, U1};

/// Row-major working copy of `A` (`n * n` entries) and `b` (`n` entries).
///
/// Rows are handed out through shared references so that the controller and every worker can
/// hold the store at the same time. Exclusive access to a row is never checked at runtime; it is
/// guaranteed by the barrier protocol instead (see [`MatrixStore::row_mut`]).
pub(crate) struct MatrixStore<T> {
    n: usize,
    a: Box<[UnsafeCell<T>]>,
    b: Box<[UnsafeCell<T>]>,
}

// SAFETY: all access goes through `row`/`row_mut`, whose callers guarantee that no row is written
// while another thread reads or writes it.
unsafe impl<T: Send + Sync> Sync for MatrixStore<T> {}

impl<T> MatrixStore<T>
where
    T: RealField + Copy,
{
    /// Copies a row-major `n * n` matrix and an `n`-vector into a new store.
    pub fn from_slices(a: &[T], b: &[T], n: usize) -> Self {
        debug_assert_eq!(a.len(), n * n);
        debug_assert_eq!(b.len(), n);
        Self {
            n,
            a: a.iter().copied().map(UnsafeCell::new).collect(),
            b: b.iter().copied().map(UnsafeCell::new).collect(),
        }
    }

    /// Copies a (column-major) nalgebra matrix and vector into a new row-major store.
    pub fn from_matrix<D, SA, SB>(mat_a: &Matrix<T, D, D, SA>, b: &Matrix<T, D, U1, SB>) -> Self
    where
        D: Dim,
        SA: Storage<T, D, D>,
        SB: Storage<T, D>,
    {
        let n = mat_a.nrows();
        let a = (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .map(|(i, j)| UnsafeCell::new(mat_a[(i, j)]))
            .collect();
        Self {
            n,
            a,
            b: b.iter().copied().map(UnsafeCell::new).collect(),
        }
    }

    pub fn dim(&self) -> usize {
        self.n
    }

    /// Shared view of row `i` of `A` together with `b[i]`.
    ///
    /// # Safety
    /// No thread may hold a mutable view of row `i` for the lifetime of the returned slice.
    pub unsafe fn row(&self, i: usize) -> (&[T], T) {
        let start = i * self.n;
        let cells = &self.a[start..start + self.n];
        let row = std::slice::from_raw_parts(UnsafeCell::raw_get(cells.as_ptr()), self.n);
        (row, *self.b[i].get())
    }

    /// Exclusive view of row `i` of `A` together with `b[i]`.
    ///
    /// # Safety
    /// The caller must be the only thread accessing row `i` for the lifetime of the returned
    /// references.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn row_mut(&self, i: usize) -> (&mut [T], &mut T) {
        let start = i * self.n;
        let cells = &self.a[start..start + self.n];
        let row = std::slice::from_raw_parts_mut(UnsafeCell::raw_get(cells.as_ptr()), self.n);
        (row, &mut *self.b[i].get())
    }

    /// Consumes the store once every worker has been joined.
    pub fn into_rows(self) -> ReducedSystem<T> {
        ReducedSystem {
            n: self.n,
            a: self.a.into_vec().into_iter().map(UnsafeCell::into_inner).collect(),
            b: self.b.into_vec().into_iter().map(UnsafeCell::into_inner).collect(),
        }
    }
}

/// The upper-triangular, unit-diagonal system left behind by forward elimination.
#[derive(Debug, Clone)]
pub(crate) struct ReducedSystem<T> {
    pub n: usize,
    pub a: Vec<T>,
    pub b: Vec<T>,
}

impl<T: Copy> ReducedSystem<T> {
    pub fn at(&self, i: usize, j: usize) -> T {
        self.a[i * self.n + j]
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{matrix, vector};

    use super::*;

    #[test]
    fn test_from_matrix_is_row_major() {
        let mat_a = matrix![
            1.0, 2.0;
            3.0, 4.0;
        ];
        let b = vector![5.0, 6.0];
        let store = MatrixStore::from_matrix(&mat_a, &b);
        assert_eq!(store.dim(), 2);

        let reduced = store.into_rows();
        assert_eq!(reduced.a, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(reduced.b, vec![5.0, 6.0]);
        assert_eq!(reduced.at(1, 0), 3.0);
    }

    #[test]
    fn test_row_access() {
        let store = MatrixStore::from_slices(&[1.0, 2.0, 3.0, 4.0], &[5.0, 6.0], 2);
        unsafe {
            let (row, bi) = store.row_mut(1);
            row[0] = -1.0;
            *bi = 7.0;
            let (row, bi) = store.row(1);
            assert_eq!(row, &[-1.0, 4.0]);
            assert_eq!(bi, 7.0);
        }
    }
}
