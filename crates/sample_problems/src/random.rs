use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::LinearProblem;

/// Random, strictly row diagonally dominant `n`-by-`n` system with a random known solution.
///
/// Off-diagonal entries and the solution are drawn uniformly from `[-1, 1)`. Strict diagonal
/// dominance keeps every pivot non-zero without row exchanges. The same `seed` always produces
/// the same system.
pub fn diagonally_dominant(n: usize, seed: u64) -> LinearProblem {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut a = DMatrix::<f64>::from_fn(n, n, |_, _| rng.gen_range(-1.0..1.0));
    for i in 0..n {
        let off_diagonal: f64 = a.row(i).iter().map(|v| v.abs()).sum::<f64>() - a[(i, i)].abs();
        a[(i, i)] = off_diagonal + 1.0;
    }

    let x = DVector::from_fn(n, |_, _| rng.gen_range(-1.0..1.0));
    LinearProblem::from_solution(a, x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducible() {
        assert_eq!(diagonally_dominant(8, 42), diagonally_dominant(8, 42));
        assert_ne!(diagonally_dominant(8, 42), diagonally_dominant(8, 43));
    }

    #[test]
    fn test_dominance() {
        let problem = diagonally_dominant(16, 7);
        for i in 0..16 {
            let row = problem.a.row(i);
            let off: f64 = row.iter().map(|v| v.abs()).sum::<f64>() - row[i].abs();
            assert!(row[i] > off);
        }
    }
}
