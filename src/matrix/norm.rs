use num_traits::Zero;

use crate::traits::LinalgScalar;
use crate::Matrix;

// ── Matrix norms ────────────────────────────────────────────────────

impl<T: LinalgScalar, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Squared Frobenius norm: sum of `|a_ij|^2`. No sqrt.
    pub fn frobenius_norm_squared(&self) -> T::Real {
        let mut sum = T::Real::zero();
        for &x in self.as_slice() {
            sum = sum + x.abs2();
        }
        sum
    }

    /// Frobenius norm.
    ///
    /// ```
    /// use tridiag::Matrix;
    /// let m = Matrix::new([[3.0_f64, 0.0], [0.0, 4.0]]);
    /// assert!((m.frobenius_norm() - 5.0).abs() < 1e-12);
    /// ```
    pub fn frobenius_norm(&self) -> T::Real {
        self.frobenius_norm_squared().lsqrt()
    }

    /// Largest entry modulus.
    pub fn max_abs(&self) -> T::Real {
        let mut max = T::Real::zero();
        for &x in self.as_slice() {
            let m = x.modulus();
            if m > max {
                max = m;
            }
        }
        max
    }
}
