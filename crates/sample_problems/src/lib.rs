//! Example linear systems for testing, benchmarks and demonstration

mod random;
mod structured;

pub use random::diagonally_dominant;
pub use structured::{identity, laplacian_1d, leading_zero_pivot, reference_3x3, zero_row};

use nalgebra::{DMatrix, DVector};

/// A dense linear system `a x = b`, with its exact solution when one is known.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearProblem {
    pub a: DMatrix<f64>,
    pub b: DVector<f64>,
    pub expected: Option<DVector<f64>>,
}

impl LinearProblem {
    /// Builds the system whose right-hand side is `a * x`, so that `x` is its solution.
    pub fn from_solution(a: DMatrix<f64>, x: DVector<f64>) -> Self {
        let b = &a * &x;
        Self {
            a,
            b,
            expected: Some(x),
        }
    }

    /// Number of unknowns.
    pub fn dim(&self) -> usize {
        self.a.nrows()
    }

    /// Coefficients in row-major order, the layout taken by `gauss::solve`.
    pub fn a_row_major(&self) -> Vec<f64> {
        self.a.transpose().as_slice().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{dmatrix, dvector};

    #[test]
    fn test_a_row_major() {
        let problem = LinearProblem::from_solution(
            dmatrix![
                1.0, 2.0;
                3.0, 4.0;
            ],
            dvector![1.0, 1.0],
        );
        assert_eq!(problem.dim(), 2);
        assert_eq!(problem.a_row_major(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(problem.b, dvector![3.0, 7.0]);
    }
}
