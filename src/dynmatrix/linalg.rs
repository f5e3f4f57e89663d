use alloc::vec;
use alloc::vec::Vec;

use num_traits::Zero;

use crate::linalg::tridiagonal::write_tridiagonal;
use crate::linalg::{
    fill_tridiagonal, householder_coeff_len, try_tridiagonalize_in_place, tridiagonalize_with_q,
    Band, HouseholderSequence, LinalgError,
};
use crate::traits::LinalgScalar;

use super::DynMatrix;

// ── DynTridiagonalization ───────────────────────────────────────────

/// Tridiagonalization of a dynamically-sized symmetric (Hermitian) matrix.
///
/// Can be created empty with [`with_size`](Self::with_size) and filled
/// later by [`compute`](Self::compute), which reuses the buffers when the
/// size does not change. Accessors panic until a matrix has been computed.
///
/// # Example
///
/// ```
/// use tridiag::DynMatrix;
/// use tridiag::dynmatrix::DynTridiagonalization;
///
/// let a = DynMatrix::from_rows(3, 3, &[4.0_f64, 1.0, -1.0, 1.0, 3.0, 2.0, -1.0, 2.0, 5.0]);
/// let mut tri = DynTridiagonalization::with_size(3);
/// assert!(!tri.is_initialized());
/// tri.compute(&a);
///
/// let q = tri.matrix_q().to_dyn();
/// let t = tri.matrix_t();
/// let r = &(&q * &t) * &q.transpose();
/// assert!((&r - &a).frobenius_norm() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct DynTridiagonalization<T> {
    packed: DynMatrix<T>,
    h_coeffs: Vec<T>,
    initialized: bool,
}

impl<T: LinalgScalar> DynTridiagonalization<T> {
    /// Allocate storage for an `n × n` problem without computing anything.
    pub fn with_size(n: usize) -> Self {
        Self {
            packed: DynMatrix::zeros(n, n, T::zero()),
            h_coeffs: vec![T::zero(); householder_coeff_len(n)],
            initialized: false,
        }
    }

    /// Tridiagonalize `a`. Panics if `a` is empty or not square.
    pub fn new(a: &DynMatrix<T>) -> Self {
        let mut tri = Self::with_size(a.nrows());
        tri.compute(a);
        tri
    }

    /// Tridiagonalize `a`, replacing any previous result.
    ///
    /// Panics if `a` is empty or not square; see
    /// [`try_compute`](Self::try_compute) for the fallible form.
    pub fn compute(&mut self, a: &DynMatrix<T>) -> &mut Self {
        if let Err(e) = self.try_compute(a) {
            panic!("DynTridiagonalization::compute: {}", e);
        }
        self
    }

    /// Tridiagonalize `a`, reporting bad input instead of panicking.
    ///
    /// On error the previous state is kept.
    pub fn try_compute(&mut self, a: &DynMatrix<T>) -> Result<&mut Self, LinalgError> {
        let n = a.nrows();
        if n == 0 {
            return Err(LinalgError::Empty);
        }
        if !a.is_square() {
            return Err(LinalgError::NotSquare {
                nrows: n,
                ncols: a.ncols(),
            });
        }

        if self.packed.nrows() == n {
            self.packed.data.copy_from_slice(&a.data);
        } else {
            log::trace!(target: "tridiag", "resizing workspace to {}x{}", n, n);
            self.packed = a.clone();
        }
        self.h_coeffs.resize(householder_coeff_len(n), T::zero());

        self.initialized = false;
        try_tridiagonalize_in_place(&mut self.packed, &mut self.h_coeffs)?;
        self.initialized = true;
        Ok(self)
    }

    /// Whether a matrix has been computed.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[inline]
    fn assert_initialized(&self) {
        assert!(self.initialized, "tridiagonalization is not initialized");
    }

    /// Householder coefficients, one per reflector.
    pub fn householder_coefficients(&self) -> &[T] {
        self.assert_initialized();
        &self.h_coeffs
    }

    /// The packed reduction.
    pub fn packed_matrix(&self) -> &DynMatrix<T> {
        self.assert_initialized();
        &self.packed
    }

    /// `Q` as a lazy product of reflectors.
    pub fn matrix_q(&self) -> HouseholderSequence<'_, T, DynMatrix<T>> {
        self.assert_initialized();
        HouseholderSequence::new(&self.packed, &self.h_coeffs)
    }

    /// The explicit tridiagonal matrix `T`.
    pub fn matrix_t(&self) -> DynMatrix<T> {
        self.assert_initialized();
        let n = self.packed.nrows();
        let mut t = DynMatrix::zeros(n, n, T::zero());
        fill_tridiagonal(&self.packed, &mut t);
        t
    }

    /// Diagonal of `T`.
    pub fn diagonal(&self) -> Band<'_, T, DynMatrix<T>> {
        self.assert_initialized();
        Band::diagonal(&self.packed)
    }

    /// Sub-diagonal of `T`.
    pub fn sub_diagonal(&self) -> Band<'_, T, DynMatrix<T>> {
        self.assert_initialized();
        Band::sub_diagonal(&self.packed)
    }
}

impl<T: LinalgScalar> HouseholderSequence<'_, T, DynMatrix<T>> {
    /// Dense matrix of the operator.
    pub fn to_dyn(&self) -> DynMatrix<T> {
        let mut q = DynMatrix::eye(self.dim(), T::zero());
        self.apply_on_the_left(&mut q);
        q
    }
}

// ── DynExplicitTridiagonal ──────────────────────────────────────────

/// Real bands of `T` and, if requested, the dense `Q` for a dynamically
/// sized matrix.
#[derive(Debug, Clone)]
pub struct DynExplicitTridiagonal<T: LinalgScalar> {
    diag: Vec<T::Real>,
    sub_diag: Vec<T::Real>,
    q: Option<DynMatrix<T>>,
}

impl<T: LinalgScalar> DynExplicitTridiagonal<T> {
    /// Tridiagonalize `a`. Panics if `a` is empty or not square.
    pub fn new(a: &DynMatrix<T>, extract_q: bool) -> Self {
        assert!(a.is_square(), "tridiagonalization requires a square matrix");
        let n = a.nrows();
        assert!(n > 0, "tridiagonalization requires a non-empty matrix");

        let mut work = a.clone();
        let mut h = vec![T::zero(); householder_coeff_len(n)];
        let mut diag = vec![T::Real::zero(); n];
        let mut sub_diag = vec![T::Real::zero(); n - 1];
        tridiagonalize_with_q(&mut work, &mut h, &mut diag, &mut sub_diag, extract_q);

        Self {
            diag,
            sub_diag,
            q: if extract_q { Some(work) } else { None },
        }
    }

    /// Diagonal of `T`.
    #[inline]
    pub fn diagonal(&self) -> &[T::Real] {
        &self.diag
    }

    /// Sub-diagonal of `T` (`n - 1` entries).
    #[inline]
    pub fn sub_diagonal(&self) -> &[T::Real] {
        &self.sub_diag
    }

    /// The dense `Q`, if it was extracted.
    #[inline]
    pub fn q(&self) -> Option<&DynMatrix<T>> {
        self.q.as_ref()
    }

    /// Take ownership of the bands and `Q`.
    pub fn into_parts(self) -> (Vec<T::Real>, Vec<T::Real>, Option<DynMatrix<T>>) {
        (self.diag, self.sub_diag, self.q)
    }

    /// The explicit tridiagonal matrix `T`.
    pub fn matrix_t(&self) -> DynMatrix<T> {
        let n = self.diag.len();
        let mut t = DynMatrix::zeros(n, n, T::zero());
        write_tridiagonal(&mut t, |i| self.diag[i], |i| self.sub_diag[i]);
        t
    }
}

// ── Convenience methods on DynMatrix ────────────────────────────────

impl<T: LinalgScalar> DynMatrix<T> {
    /// Packed Householder tridiagonalization. Only the lower triangle is read.
    ///
    /// ```
    /// use tridiag::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 1.0, 3.0]);
    /// let tri = a.tridiagonalize();
    /// assert_eq!(tri.diagonal().to_vec(), vec![2.0, 3.0]);
    /// ```
    pub fn tridiagonalize(&self) -> DynTridiagonalization<T> {
        DynTridiagonalization::new(self)
    }

    /// Real bands of `T` and optionally the dense `Q`.
    pub fn explicit_tridiagonal(&self, extract_q: bool) -> DynExplicitTridiagonal<T> {
        DynExplicitTridiagonal::new(self, extract_q)
    }
}
