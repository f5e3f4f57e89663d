//! Square matrix aliases for the sizes the reduction specializes on.

use crate::Matrix;

/// 1×1 matrix.
pub type Matrix1<T> = Matrix<T, 1, 1>;
/// 2×2 matrix.
pub type Matrix2<T> = Matrix<T, 2, 2>;
/// 3×3 matrix.
pub type Matrix3<T> = Matrix<T, 3, 3>;
/// 4×4 matrix.
pub type Matrix4<T> = Matrix<T, 4, 4>;
/// 5×5 matrix.
pub type Matrix5<T> = Matrix<T, 5, 5>;
/// 6×6 matrix.
pub type Matrix6<T> = Matrix<T, 6, 6>;
