use log::{trace, warn};
use nalgebra::RealField;

use crate::{solver::Shared, store::ReducedSystem};

/// Divides row `col` of the system (from the diagonal onward) and its right-hand side by the
/// diagonal entry, producing a unit pivot. Returns the pivot that was divided by.
pub(crate) fn normalize_row<T>(row: &mut [T], b: &mut T, col: usize) -> T
where
    T: RealField + Copy,
{
    let pivot = row[col];
    row[col..].iter_mut().for_each(|a| *a /= pivot);
    *b /= pivot;
    pivot
}

/// Forward elimination, controller side.
///
/// Normalizes one pivot row per round, then releases the workers on the first barrier and waits
/// on the second one until every worker has eliminated the pivot column from its rows.
///
/// Returns the first column whose pivot was exactly zero, if any. Elimination still runs to
/// completion in that case, since the workers are already committed to `n` rounds.
pub(crate) fn direct_move<T>(shared: &Shared<T>) -> Option<usize>
where
    T: RealField + Copy,
{
    let n = shared.store.dim();
    let mut zero_pivot = None;

    for col in 0..n {
        {
            // SAFETY: every worker is parked on the first barrier, and none of them touches the
            // matrix until the controller arrives there too.
            let (row, b) = unsafe { shared.store.row_mut(col) };
            let pivot = normalize_row(row, b, col);
            if pivot == T::zero() && zero_pivot.is_none() {
                warn!("direct_move: zero pivot in column {}", col);
                zero_pivot = Some(col);
            }
        }
        trace!("direct_move: normalized row {}", col);

        shared.barriers.wait_normalized();
        shared.barriers.wait_eliminated();
    }

    zero_pivot
}

/// Back-substitution on the unit upper-triangular system left by [`direct_move`].
///
/// ```math
/// x[i] = b[i] - sum_{j > i} a[i][j] * x[j],   i = n-1, ..., 0
/// ```
pub(crate) fn reverse_move<T>(sys: &ReducedSystem<T>, x: &mut [T])
where
    T: RealField + Copy,
{
    for i in (0..sys.n).rev() {
        x[i] = sys.b[i];
        for j in ((i + 1)..sys.n).rev() {
            x[i] = x[i] - x[j] * sys.at(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_row() {
        let mut row = [9.0, 4.0, 2.0, 8.0];
        let mut b = 6.0;
        let pivot = normalize_row(&mut row, &mut b, 2);
        assert_eq!(pivot, 2.0);
        assert_eq!(row, [9.0, 4.0, 1.0, 4.0]);
        assert_eq!(b, 3.0);
    }

    #[test]
    fn test_normalize_zero_pivot() {
        let mut row = [0.0f64, 1.0];
        let mut b = 0.0f64;
        normalize_row(&mut row, &mut b, 0);
        assert!(row[0].is_nan());
        assert!(row[1].is_infinite());
        assert!(b.is_nan());
    }

    #[test]
    fn test_reverse_move() {
        // x + 2y + 3z = 14, y + 4z = 14, z = 3
        let sys = ReducedSystem {
            n: 3,
            a: vec![1.0, 2.0, 3.0, 0.0, 1.0, 4.0, 0.0, 0.0, 1.0],
            b: vec![14.0, 14.0, 3.0],
        };
        let mut x = [0.0; 3];
        reverse_move(&sys, &mut x);
        assert_eq!(x, [1.0, 2.0, 3.0]);
    }
}
