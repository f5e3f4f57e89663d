pub mod aliases;
mod norm;
mod ops;

use core::ops::{Index, IndexMut};

use crate::traits::{LinalgScalar, MatrixMut, MatrixRef, Scalar};

/// Fixed-size matrix with `M` rows and `N` columns.
///
/// Storage is column-major: `data[col][row]`, so every column tail handed to
/// the reduction is a contiguous slice. Stack-allocated, no-std compatible.
///
/// # Examples
///
/// ```
/// use tridiag::Matrix;
///
/// let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(a.nrows(), 2);
///
/// let b: Matrix<f64, 3, 3> = Matrix::eye();
/// assert_eq!(b[(1, 1)], 1.0);
/// assert_eq!(b[(0, 1)], 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<T, const M: usize, const N: usize> {
    pub(crate) data: [[T; M]; N],
}

impl<T, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Create a matrix from a row-major 2D array.
    ///
    /// The input is `[[row0], [row1], ...]` (M arrays of N elements each).
    /// Internally transposed to column-major storage.
    #[inline]
    pub fn new(rows: [[T; N]; M]) -> Self
    where
        T: Copy,
    {
        let init = rows[0][0];
        let mut data: [[T; M]; N] = [[init; M]; N];
        for (i, row) in rows.iter().enumerate() {
            for (j, &x) in row.iter().enumerate() {
                data[j][i] = x;
            }
        }
        Self { data }
    }

    /// Number of rows.
    #[inline]
    pub const fn nrows(&self) -> usize {
        M
    }

    /// Number of columns.
    #[inline]
    pub const fn ncols(&self) -> usize {
        N
    }

    /// View the entire matrix as a flat slice in column-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.data.as_flattened()
    }
}

impl<T: Scalar, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Create a matrix filled with zeros.
    pub fn zeros() -> Self {
        Self {
            data: [[T::zero(); M]; N],
        }
    }

    /// Create a matrix by calling `f(row, col)` for each element.
    ///
    /// ```
    /// use tridiag::Matrix;
    /// let m: Matrix<f64, 3, 3> = Matrix::from_fn(|i, j| if i == j { 1.0 } else { 0.0 });
    /// assert_eq!(m, Matrix::eye());
    /// ```
    pub fn from_fn(f: impl Fn(usize, usize) -> T) -> Self {
        let mut m = Self::zeros();
        for j in 0..N {
            for i in 0..M {
                m.data[j][i] = f(i, j);
            }
        }
        m
    }

    /// Create a matrix from a flat slice in column-major order.
    ///
    /// Panics if `slice.len() != M * N`.
    pub fn from_slice(slice: &[T]) -> Self {
        assert_eq!(
            slice.len(),
            M * N,
            "slice length {} does not match {}x{} matrix",
            slice.len(),
            M,
            N
        );
        Self::from_fn(|i, j| slice[j * M + i])
    }

    /// Transpose: (M×N) → (N×M).
    pub fn transpose(&self) -> Matrix<T, N, M> {
        Matrix::<T, N, M>::from_fn(|i, j| self.data[i][j])
    }
}

impl<T: LinalgScalar, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Conjugate transpose (plain transpose for real scalars).
    pub fn adjoint(&self) -> Matrix<T, N, M> {
        Matrix::<T, N, M>::from_fn(|i, j| self.data[i][j].conj())
    }
}

impl<T: Scalar, const N: usize> Matrix<T, N, N> {
    /// Create an identity matrix (square matrices only).
    pub fn eye() -> Self {
        let mut m = Self::zeros();
        for i in 0..N {
            m.data[i][i] = T::one();
        }
        m
    }
}

impl<T, const M: usize, const N: usize> MatrixRef<T> for Matrix<T, M, N> {
    #[inline]
    fn nrows(&self) -> usize {
        M
    }

    #[inline]
    fn ncols(&self) -> usize {
        N
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.data[col][row]
    }

    #[inline]
    fn col_as_slice(&self, col: usize, row_start: usize) -> &[T] {
        &self.data[col][row_start..]
    }
}

impl<T, const M: usize, const N: usize> MatrixMut<T> for Matrix<T, M, N> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[col][row]
    }

    #[inline]
    fn col_as_mut_slice(&mut self, col: usize, row_start: usize) -> &mut [T] {
        &mut self.data[col][row_start..]
    }
}

impl<T, const M: usize, const N: usize> Index<(usize, usize)> for Matrix<T, M, N> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[col][row]
    }
}

impl<T, const M: usize, const N: usize> IndexMut<(usize, usize)> for Matrix<T, M, N> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        &mut self.data[col][row]
    }
}

pub use aliases::*;
