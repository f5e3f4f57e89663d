use core::ops::{Add, Mul, Sub};

use crate::traits::Scalar;
use crate::Matrix;

// ── Element-wise addition / subtraction ─────────────────────────────

impl<T: Scalar, const M: usize, const N: usize> Add for Matrix<T, M, N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_fn(|i, j| self[(i, j)] + rhs[(i, j)])
    }
}

impl<T: Scalar, const M: usize, const N: usize> Sub for Matrix<T, M, N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_fn(|i, j| self[(i, j)] - rhs[(i, j)])
    }
}

// ── Matrix multiplication: (M×N) * (N×P) → (M×P) ──────────────────

impl<T: Scalar, const M: usize, const N: usize, const P: usize> Mul<Matrix<T, N, P>>
    for Matrix<T, M, N>
{
    type Output = Matrix<T, M, P>;

    fn mul(self, rhs: Matrix<T, N, P>) -> Matrix<T, M, P> {
        let mut out = Matrix::<T, M, P>::zeros();
        // column-major friendly: out[:, j] += a[:, k] * b[k, j]
        for j in 0..P {
            for k in 0..N {
                let b_kj = rhs.data[j][k];
                for i in 0..M {
                    out.data[j][i] = out.data[j][i] + self.data[k][i] * b_kj;
                }
            }
        }
        out
    }
}

// ── Scalar multiplication: matrix * scalar ──────────────────────────

impl<T: Scalar, const M: usize, const N: usize> Mul<T> for Matrix<T, M, N> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Self::from_fn(|i, j| self[(i, j)] * rhs)
    }
}
