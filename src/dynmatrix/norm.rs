use num_traits::Zero;

use crate::traits::LinalgScalar;

use super::DynMatrix;

impl<T: LinalgScalar> DynMatrix<T> {
    /// Squared Frobenius norm: sum of `|a_ij|^2`. No sqrt.
    pub fn frobenius_norm_squared(&self) -> T::Real {
        self.as_slice()
            .iter()
            .fold(T::Real::zero(), |acc, &x| acc + x.abs2())
    }

    /// Frobenius norm.
    ///
    /// ```
    /// use tridiag::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[3.0_f64, 0.0, 0.0, 4.0]);
    /// assert!((m.frobenius_norm() - 5.0).abs() < 1e-12);
    /// ```
    pub fn frobenius_norm(&self) -> T::Real {
        self.frobenius_norm_squared().lsqrt()
    }

    /// Largest entry modulus.
    pub fn max_abs(&self) -> T::Real {
        self.as_slice().iter().fold(T::Real::zero(), |max, &x| {
            let m = x.modulus();
            if m > max {
                m
            } else {
                max
            }
        })
    }
}
