use nalgebra::{dmatrix, dvector, DMatrix, DVector};

use crate::LinearProblem;

/// The 3-by-3 system used as the reference scenario:
///
/// ```math
///  x +  2y +  3z = 1
/// 4x +  5y +  6z = 2
/// 8x + 12y + 14z = 3
/// ```
///
/// with solution `x = 5/6, y = -5/3, z = 7/6`.
pub fn reference_3x3() -> LinearProblem {
    LinearProblem {
        a: dmatrix![
            1.0, 2.0, 3.0;
            4.0, 5.0, 6.0;
            8.0, 12.0, 14.0;
        ],
        b: dvector![1.0, 2.0, 3.0],
        expected: Some(dvector![5.0 / 6.0, -5.0 / 3.0, 7.0 / 6.0]),
    }
}

/// `I x = b`, whose solution is `b` itself.
pub fn identity(b: &[f64]) -> LinearProblem {
    let b = DVector::from_column_slice(b);
    LinearProblem {
        a: DMatrix::identity(b.len(), b.len()),
        expected: Some(b.clone()),
        b,
    }
}

/// Second-difference matrix `tridiag(-1, 2, -1)` with solution `x_i = i + 1`.
pub fn laplacian_1d(n: usize) -> LinearProblem {
    let a = DMatrix::from_fn(n, n, |i, j| match i.abs_diff(j) {
        0 => 2.0,
        1 => -1.0,
        _ => 0.0,
    });
    let x = DVector::from_fn(n, |i, _| (i + 1) as f64);
    LinearProblem::from_solution(a, x)
}

/// Identity system whose last row has been zeroed out, making the final pivot zero.
pub fn zero_row(n: usize) -> LinearProblem {
    let mut a = DMatrix::identity(n, n);
    a.row_mut(n - 1).fill(0.0);
    LinearProblem {
        a,
        b: DVector::from_element(n, 1.0),
        expected: None,
    }
}

/// A permutation system. It is non-singular, but its first pivot is zero and no row exchange
/// is ever made.
pub fn leading_zero_pivot() -> LinearProblem {
    LinearProblem {
        a: dmatrix![
            0.0, 1.0;
            1.0, 0.0;
        ],
        b: dvector![1.0, 2.0],
        expected: Some(dvector![2.0, 1.0]),
    }
}
