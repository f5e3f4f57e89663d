pub(crate) mod householder;
pub(crate) mod tridiagonal;

pub use householder::{accumulate_q_in_place, make_householder_in_place, HouseholderSequence};
pub use tridiagonal::{
    fill_tridiagonal, householder_coeff_len, tridiagonalize_in_place, tridiagonalize_with_q,
    try_tridiagonalize_in_place, Band, ExplicitTridiagonal, Strategy, Tridiagonalization,
};

/// Argument errors from the tridiagonal reduction.
///
/// Returned by [`try_tridiagonalize_in_place`]; the panicking entry points
/// report the same conditions through their panic message. Numerical
/// degeneracy (a column that is already reduced) is not an error.
///
/// ```
/// use tridiag::DynMatrix;
/// use tridiag::linalg::{try_tridiagonalize_in_place, LinalgError};
///
/// let mut a = DynMatrix::zeros(2, 3, 0.0_f64);
/// let mut h = [0.0; 1];
/// assert_eq!(
///     try_tridiagonalize_in_place(&mut a, &mut h).unwrap_err(),
///     LinalgError::NotSquare { nrows: 2, ncols: 3 },
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// The input has no rows.
    Empty,
    /// The input is not square.
    NotSquare { nrows: usize, ncols: usize },
    /// The Householder coefficient buffer has the wrong length.
    CoefficientLength { expected: usize, got: usize },
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::Empty => write!(f, "matrix is empty"),
            LinalgError::NotSquare { nrows, ncols } => {
                write!(f, "matrix is not square ({}x{})", nrows, ncols)
            }
            LinalgError::CoefficientLength { expected, got } => write!(
                f,
                "householder coefficient buffer has length {}, expected {}",
                got, expected
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinalgError {}
