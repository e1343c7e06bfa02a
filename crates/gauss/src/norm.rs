//! Residual norms used to check a computed solution against the original system.

use nalgebra::{allocator::Allocator, DefaultAllocator, Dim, Matrix, RealField, Storage, U1};
use num_traits::NumCast;

fn rms<T, I>(values: I, len: usize) -> T
where
    T: RealField + NumCast + Copy,
    I: Iterator<Item = T>,
{
    if len == 0 {
        return T::zero();
    }
    let len = T::from(len).unwrap_or_else(T::one);
    (values.map(|x| x.powi(2)).fold(T::zero(), |acc, x| acc + x) / len).sqrt()
}

/// Root-mean-square of a vector.
pub fn norm_rms<T, D, S>(v: &Matrix<T, D, U1, S>) -> T
where
    T: RealField + NumCast + Copy,
    D: Dim,
    S: Storage<T, D>,
{
    rms(v.iter().copied(), v.nrows())
}

/// Weighted root-mean-square norm, `sqrt(sum((v_i * w_i)^2) / n)`.
pub fn norm_wrms<T, D, SA, SB>(v: &Matrix<T, D, U1, SA>, w: &Matrix<T, D, U1, SB>) -> T
where
    T: RealField + NumCast + Copy,
    D: Dim,
    SA: Storage<T, D>,
    SB: Storage<T, D>,
{
    debug_assert_eq!(v.nrows(), w.nrows());
    rms(v.iter().zip(w.iter()).map(|(v, w)| *v * *w), v.nrows())
}

/// Weighted RMS norm of the residual `A x - b`, with one weight per equation.
pub fn residual_wrms<T, D, SA, SB, SC, SW>(
    mat_a: &Matrix<T, D, D, SA>,
    x: &Matrix<T, D, U1, SB>,
    b: &Matrix<T, D, U1, SC>,
    w: &Matrix<T, D, U1, SW>,
) -> T
where
    T: RealField + NumCast + Copy,
    D: Dim,
    SA: Storage<T, D, D>,
    SB: Storage<T, D>,
    SC: Storage<T, D>,
    SW: Storage<T, D>,
    DefaultAllocator: Allocator<T, D>,
{
    let ax = mat_a * x;
    rms(
        ax.iter()
            .zip(b.iter())
            .zip(w.iter())
            .map(|((ax, b), w)| (*ax - *b) * *w),
        b.nrows(),
    )
}

/// RMS norm of the residual `A x - b`.
pub fn residual_rms<T, D, SA, SB, SC>(
    mat_a: &Matrix<T, D, D, SA>,
    x: &Matrix<T, D, U1, SB>,
    b: &Matrix<T, D, U1, SC>,
) -> T
where
    T: RealField + NumCast + Copy,
    D: Dim,
    SA: Storage<T, D, D>,
    SB: Storage<T, D>,
    SC: Storage<T, D>,
    DefaultAllocator: Allocator<T, D>,
{
    let ax = mat_a * x;
    rms(ax.iter().zip(b.iter()).map(|(ax, b)| *ax - *b), b.nrows())
}

/// Largest component-wise relative error `|(A x)_i - b_i| / max(|b_i|, 1)`.
pub fn max_relative_residual<T, D, SA, SB, SC>(
    mat_a: &Matrix<T, D, D, SA>,
    x: &Matrix<T, D, U1, SB>,
    b: &Matrix<T, D, U1, SC>,
) -> T
where
    T: RealField + Copy,
    D: Dim,
    SA: Storage<T, D, D>,
    SB: Storage<T, D>,
    SC: Storage<T, D>,
    DefaultAllocator: Allocator<T, D>,
{
    (mat_a * x)
        .iter()
        .zip(b.iter())
        .map(|(ax, b)| (*ax - *b).abs() / b.abs().max(T::one()))
        .fold(T::zero(), |acc, r| acc.max(r))
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::{matrix, vector, DVector};

    #[test]
    fn test_norm_rms() {
        const LENGTH: usize = 32;

        let x = DVector::from_element(LENGTH, -0.5);
        assert_eq!(norm_rms(&x), 0.5);
        assert_eq!(norm_rms(&DVector::<f64>::zeros(0)), 0.0);
    }

    #[test]
    fn test_norm_wrms() {
        const LENGTH: usize = 32;

        let x = DVector::from_element(LENGTH, -0.5);
        let w = DVector::from_element(LENGTH, 0.5);
        assert_eq!(norm_wrms(&x, &w), 0.25);
    }

    #[test]
    fn test_residual_wrms() {
        let mat_a = matrix![
            2.0, 0.0;
            0.0, 4.0;
        ];
        let b = vector![2.0, 4.0];
        let off = vector![1.5, 1.0];

        // the weights silence the second equation and double the first
        let w = vector![2.0, 0.0];
        assert_eq!(residual_wrms(&mat_a, &off, &b, &w), (2.0f64).sqrt());
        assert_eq!(
            residual_wrms(&mat_a, &off, &b, &vector![1.0, 1.0]),
            residual_rms(&mat_a, &off, &b)
        );
    }

    #[test]
    fn test_residuals() {
        let mat_a = matrix![
            2.0, 0.0;
            0.0, 4.0;
        ];
        let b = vector![2.0, 4.0];

        let exact = vector![1.0, 1.0];
        assert_eq!(residual_rms(&mat_a, &exact, &b), 0.0);
        assert_eq!(max_relative_residual(&mat_a, &exact, &b), 0.0);

        let off = vector![1.5, 1.0];
        assert_eq!(residual_rms(&mat_a, &off, &b), (0.5f64).sqrt());
        assert_eq!(max_relative_residual(&mat_a, &off, &b), 0.5);
    }
}
