//! Householder reduction of a symmetric (Hermitian) matrix to real
//! tridiagonal form, `A = Q T Q^H`.
//!
//! The packed result keeps three regions in the input buffer:
//!
//! - diagonal and first sub-diagonal: the real tridiagonal `T`
//! - strict upper triangle: the caller's input, never written
//! - below the sub-diagonal: the essential parts of the reflectors, one per
//!   column, whose implicit leading 1 sits where `T`'s sub-diagonal is stored
//!
//! Only the lower triangle of the input is ever read.

use core::marker::PhantomData;

use num_traits::{Float, One, Zero};

use super::householder::{accumulate_q_in_place, make_householder_in_place, HouseholderSequence};
use super::LinalgError;
use crate::traits::{LinalgScalar, MatrixMut, MatrixRef};
use crate::Matrix;

/// Length of the Householder coefficient buffer for an `n × n` input:
/// `n - 1`, with a minimum of one slot.
#[inline]
pub const fn householder_coeff_len(n: usize) -> usize {
    if n > 1 {
        n - 1
    } else {
        1
    }
}

fn check_args(nrows: usize, ncols: usize, coeff_len: usize) -> Result<(), LinalgError> {
    if nrows == 0 {
        return Err(LinalgError::Empty);
    }
    if nrows != ncols {
        return Err(LinalgError::NotSquare { nrows, ncols });
    }
    let expected = householder_coeff_len(nrows);
    if coeff_len != expected {
        return Err(LinalgError::CoefficientLength {
            expected,
            got: coeff_len,
        });
    }
    Ok(())
}

/// Tridiagonalize in place, rejecting bad arguments before touching `a`.
///
/// Same as [`tridiagonalize_in_place`] but reports a non-square or empty
/// matrix, or a coefficient buffer whose length is not
/// [`householder_coeff_len`]`(n)`, as an error. On error neither `a` nor
/// `h_coeffs` is modified.
pub fn try_tridiagonalize_in_place<T: LinalgScalar>(
    a: &mut impl MatrixMut<T>,
    h_coeffs: &mut [T],
) -> Result<(), LinalgError> {
    check_args(a.nrows(), a.ncols(), h_coeffs.len())?;
    reduce(a, h_coeffs);
    Ok(())
}

/// Reduce a symmetric (Hermitian) matrix to tridiagonal form in place.
///
/// Reads the lower triangle of `a` and leaves the packed form described in
/// the module docs; `h_coeffs[i]` receives the coefficient of reflector `i`.
/// Use [`HouseholderSequence`] over `(a, h_coeffs)` for `Q`, and
/// [`fill_tridiagonal`] or [`Band`] for `T`.
///
/// Each step applies its reflector to the trailing block as a Hermitian
/// rank-2 update of the lower triangle, for about `4n^3 / 3` flops in total.
/// No workspace is needed beyond `h_coeffs`.
///
/// Panics if `a` is empty or not square, or if
/// `h_coeffs.len() != householder_coeff_len(n)`. The checks run before any
/// write.
///
/// ```
/// use tridiag::Matrix;
/// use tridiag::linalg::tridiagonalize_in_place;
///
/// let mut a = Matrix::new([
///     [4.0_f64, 1.0, -2.0, 2.0],
///     [1.0, 2.0, 0.0, 1.0],
///     [-2.0, 0.0, 3.0, -2.0],
///     [2.0, 1.0, -2.0, -1.0],
/// ]);
/// let upper = a[(0, 3)];
/// let mut h = [0.0; 3];
/// tridiagonalize_in_place(&mut a, &mut h);
///
/// // T's first sub-diagonal entry is -||a[1..4, 0]||
/// assert!((a[(1, 0)] + 3.0).abs() < 1e-12);
/// // the strict upper triangle is untouched
/// assert_eq!(a[(0, 3)], upper);
/// ```
pub fn tridiagonalize_in_place<T: LinalgScalar>(a: &mut impl MatrixMut<T>, h_coeffs: &mut [T]) {
    if let Err(e) = try_tridiagonalize_in_place(a, h_coeffs) {
        panic!("tridiagonalize_in_place: {}", e);
    }
}

/// The reduction proper. Arguments are already validated.
fn reduce<T: LinalgScalar>(a: &mut impl MatrixMut<T>, h_coeffs: &mut [T]) {
    let n = a.nrows();
    log::trace!(target: "tridiag", "householder reduction of a {}x{} matrix", n, n);

    let half = <T::Real as One>::one() / (<T::Real as One>::one() + <T::Real as One>::one());

    for i in 0..n.saturating_sub(1) {
        let (h, beta) = make_householder_in_place(a.col_as_mut_slice(i, i + 1));

        if h == T::zero() {
            // column already reduced, H = I leaves the trailing block as is
            log::debug!(target: "tridiag", "step {}: column already reduced", i);
            h_coeffs[i] = h;
            continue;
        }

        // v = a[i+1..n, i] with its leading 1 in place of beta
        *a.get_mut(i + 1, i) = T::one();

        // p = conj(h) * B * v, with B = a[i+1..n, i+1..n] read as Hermitian.
        // The unused tail of h_coeffs is exactly as long as v.
        let work = &mut h_coeffs[i..];
        hermitian_lower_matvec(&*a, i, h.conj(), work);

        // w = p - (alpha / 2) v, alpha = h * v^H p (real)
        let v = a.col_as_slice(i, i + 1);
        let mut vhp = T::zero();
        for (&vr, &pr) in v.iter().zip(work.iter()) {
            vhp = vhp + vr.conj() * pr;
        }
        let half_alpha = T::from_real((h * vhp).re() * half);
        for (pr, &vr) in work.iter_mut().zip(v) {
            *pr = *pr - half_alpha * vr;
        }

        // B -= v w^H + w v^H
        hermitian_rank2_update_lower(a, i, work);

        *a.get_mut(i + 1, i) = T::from_real(beta);
        h_coeffs[i] = h;
    }
}

/// `y = scale * B * v` where `B = a[i+1.., i+1..]` is Hermitian and only its
/// lower triangle is read, and `v = a[i+1.., i]`.
fn hermitian_lower_matvec<T: LinalgScalar>(
    a: &impl MatrixRef<T>,
    i: usize,
    scale: T,
    y: &mut [T],
) {
    let off = i + 1;
    let v = a.col_as_slice(i, off);
    debug_assert_eq!(v.len(), y.len());

    for x in y.iter_mut() {
        *x = T::zero();
    }

    for c in 0..v.len() {
        // column off + c of B, from its diagonal down
        let col = a.col_as_slice(off + c, off + c);
        let vc = v[c];
        let mut acc = T::from_real(col[0].re()) * vc;
        for (r, &b) in col.iter().enumerate().skip(1) {
            y[c + r] = y[c + r] + b * vc;
            acc = acc + b.conj() * v[c + r];
        }
        y[c] = y[c] + acc;
    }

    for x in y.iter_mut() {
        *x = scale * *x;
    }
}

/// Lower triangle of `a[i+1.., i+1..] -= v w^H + w v^H`, `v = a[i+1.., i]`.
fn hermitian_rank2_update_lower<T: LinalgScalar>(a: &mut impl MatrixMut<T>, i: usize, w: &[T]) {
    let off = i + 1;
    for c in 0..w.len() {
        let vc_conj = (*a.get(off + c, i)).conj();
        let wc_conj = w[c].conj();
        for r in c..w.len() {
            let vr = *a.get(off + r, i);
            let x = a.get_mut(off + r, off + c);
            *x = *x - vr * wc_conj - w[r] * vc_conj;
        }
    }
}

/// How [`tridiagonalize_with_q`] handles a given size.
///
/// ```
/// use tridiag::linalg::Strategy;
///
/// assert_eq!(Strategy::select::<f64>(1), Strategy::Single);
/// assert_eq!(Strategy::select::<f64>(3), Strategy::Closed3);
/// assert_eq!(Strategy::select::<f64>(4), Strategy::Householder);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `1 × 1`: `T` is the real part of the entry, `Q = [1]`.
    Single,
    /// `3 × 3` real: one reflector in closed form.
    Closed3,
    /// Everything else: the general in-place reduction.
    Householder,
}

impl Strategy {
    /// Pick the strategy for an `n × n` matrix of scalar type `T`.
    ///
    /// The `3 × 3` closed form builds `Q` as a real reflector, so complex
    /// scalars always take the general path.
    pub fn select<T: LinalgScalar>(n: usize) -> Self {
        match n {
            1 => Strategy::Single,
            3 if !T::IS_COMPLEX => Strategy::Closed3,
            _ => Strategy::Householder,
        }
    }
}

/// Tridiagonalize and extract `T` as two real bands, optionally replacing
/// `a` with the explicit `Q`.
///
/// This is the form an eigen-solver consumes. On return `diag` (length `n`)
/// and `sub_diag` (length `n - 1`) hold `T`. If `extract_q` is set, `a` is
/// overwritten with `Q` such that `A = Q T Q^H`; otherwise its contents are
/// unspecified. `h_work` must have length [`householder_coeff_len`]`(n)`
/// and is clobbered.
///
/// Sizes 1 and 3 (real) use closed forms, see [`Strategy`].
///
/// ```
/// use tridiag::Matrix;
/// use tridiag::linalg::tridiagonalize_with_q;
///
/// let mut a = Matrix::new([[2.0_f64, 1.0, 0.0], [1.0, 2.0, 1.0], [0.0, 1.0, 2.0]]);
/// let mut h = [0.0; 2];
/// let mut diag = [0.0; 3];
/// let mut sub = [0.0; 2];
/// tridiagonalize_with_q(&mut a, &mut h, &mut diag, &mut sub, true);
///
/// assert_eq!(diag, [2.0, 2.0, 2.0]);
/// assert_eq!(sub, [1.0, 1.0]);
/// assert_eq!(a, Matrix::eye());
/// ```
pub fn tridiagonalize_with_q<T: LinalgScalar>(
    a: &mut impl MatrixMut<T>,
    h_work: &mut [T],
    diag: &mut [T::Real],
    sub_diag: &mut [T::Real],
    extract_q: bool,
) {
    let n = a.nrows();
    if let Err(e) = check_args(n, a.ncols(), h_work.len()) {
        panic!("tridiagonalize_with_q: {}", e);
    }
    assert_eq!(diag.len(), n, "diagonal length must equal n");
    assert_eq!(sub_diag.len(), n - 1, "sub-diagonal length must equal n - 1");

    let strategy = Strategy::select::<T>(n);
    log::trace!(target: "tridiag", "{}x{} tridiagonalization via {:?}", n, n, strategy);

    match strategy {
        Strategy::Single => {
            diag[0] = a.get(0, 0).re();
            if extract_q {
                *a.get_mut(0, 0) = T::one();
            }
        }
        Strategy::Closed3 => closed_form_3x3(a, diag, sub_diag, extract_q),
        Strategy::Householder => {
            reduce(a, h_work);
            for (i, d) in diag.iter_mut().enumerate() {
                *d = a.get(i, i).re();
            }
            for (i, s) in sub_diag.iter_mut().enumerate() {
                *s = a.get(i + 1, i).re();
            }
            if extract_q {
                accumulate_q_in_place(a, h_work);
            }
        }
    }
}

/// Single reflector acting on rows 1 and 2, written out.
fn closed_form_3x3<T: LinalgScalar>(
    a: &mut impl MatrixMut<T>,
    diag: &mut [T::Real],
    sub_diag: &mut [T::Real],
    extract_q: bool,
) {
    let a00 = *a.get(0, 0);
    let a10 = *a.get(1, 0);
    let a20 = *a.get(2, 0);
    let a11 = *a.get(1, 1);
    let a21 = *a.get(2, 1);
    let a22 = *a.get(2, 2);

    diag[0] = a00.re();

    let v1_norm_sq = a20.abs2();
    if v1_norm_sq <= <T::Real as Float>::min_positive_value() {
        log::debug!(target: "tridiag", "3x3 input is already tridiagonal");
        diag[1] = a11.re();
        diag[2] = a22.re();
        sub_diag[0] = a10.re();
        sub_diag[1] = a21.re();
        if extract_q {
            set_identity(a);
        }
        return;
    }

    let beta = (a10.abs2() + v1_norm_sq).lsqrt();
    let inv_beta = T::from_real(<T::Real as One>::one() / beta);
    let m01 = a10.conj() * inv_beta;
    let m02 = a20.conj() * inv_beta;
    let two = T::one() + T::one();
    let q = two * m01 * a21.conj() + m02 * (a22 - a11);

    diag[1] = (a11 + m02 * q).re();
    diag[2] = (a22 - m02 * q).re();
    sub_diag[0] = beta;
    sub_diag[1] = (a21.conj() - m01 * q).re();

    if extract_q {
        set_identity(a);
        *a.get_mut(1, 1) = m01;
        *a.get_mut(1, 2) = m02;
        *a.get_mut(2, 1) = m02;
        *a.get_mut(2, 2) = T::zero() - m01;
    }
}

fn set_identity<T: LinalgScalar>(a: &mut impl MatrixMut<T>) {
    for j in 0..a.ncols() {
        for i in 0..a.nrows() {
            *a.get_mut(i, j) = if i == j { T::one() } else { T::zero() };
        }
    }
}

/// Write the tridiagonal matrix with the given bands into `out`, zeroing
/// everything else. The super-diagonal mirrors the sub-diagonal.
pub(crate) fn write_tridiagonal<T: LinalgScalar>(
    out: &mut impl MatrixMut<T>,
    diag: impl Fn(usize) -> T::Real,
    sub_diag: impl Fn(usize) -> T::Real,
) {
    let n = out.nrows();
    assert_eq!(n, out.ncols(), "output must be square");
    for j in 0..n {
        for x in out.col_as_mut_slice(j, 0) {
            *x = T::zero();
        }
    }
    for i in 0..n {
        *out.get_mut(i, i) = T::from_real(diag(i));
    }
    for i in 0..n.saturating_sub(1) {
        let s = T::from_real(sub_diag(i));
        *out.get_mut(i + 1, i) = s;
        *out.get_mut(i, i + 1) = s.conj();
    }
}

/// Expand a packed tridiagonalization into the explicit `T`.
///
/// `out` receives the diagonal and sub-diagonal of `packed` (real parts), the
/// sub-diagonal mirrored above the diagonal, and zeros elsewhere.
pub fn fill_tridiagonal<T: LinalgScalar>(packed: &impl MatrixRef<T>, out: &mut impl MatrixMut<T>) {
    let n = packed.nrows();
    assert_eq!(n, packed.ncols(), "packed matrix must be square");
    assert_eq!(out.nrows(), n, "output must be {0}x{0}", n);
    write_tridiagonal(
        out,
        |i| packed.get(i, i).re(),
        |i| packed.get(i + 1, i).re(),
    );
}

/// Read-only view of one band of a packed tridiagonalization.
///
/// The diagonal has `n` entries, the sub-diagonal `n - 1`. Entries are the
/// real parts of the packed storage; nothing is copied until asked.
#[derive(Debug)]
pub struct Band<'a, T, M> {
    packed: &'a M,
    offset: usize,
    _marker: PhantomData<T>,
}

impl<T, M> Clone for Band<'_, T, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, M> Copy for Band<'_, T, M> {}

impl<'a, T: LinalgScalar, M: MatrixRef<T>> Band<'a, T, M> {
    pub(crate) fn diagonal(packed: &'a M) -> Self {
        Self {
            packed,
            offset: 0,
            _marker: PhantomData,
        }
    }

    pub(crate) fn sub_diagonal(packed: &'a M) -> Self {
        Self {
            packed,
            offset: 1,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.packed.nrows().saturating_sub(self.offset)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry `i` of the band.
    #[inline]
    pub fn get(&self, i: usize) -> T::Real {
        assert!(i < self.len(), "band index {} out of range (len {})", i, self.len());
        self.packed.get(i + self.offset, i).re()
    }

    pub fn iter(&self) -> impl Iterator<Item = T::Real> + 'a
    where
        T: 'a,
    {
        let band = *self;
        (0..band.len()).map(move |i| band.get(i))
    }

    /// Copy the band into `out`, which must have length `self.len()`.
    pub fn copy_to_slice(&self, out: &mut [T::Real]) {
        assert_eq!(out.len(), self.len(), "output length must equal band length");
        for (i, x) in out.iter_mut().enumerate() {
            *x = self.get(i);
        }
    }

    #[cfg(feature = "alloc")]
    pub fn to_vec(&self) -> alloc::vec::Vec<T::Real> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }
}

/// Tridiagonalization of a fixed-size symmetric (Hermitian) matrix.
///
/// Holds the packed reduction and its Householder coefficients; `Q` and `T`
/// are derived on request. Only the lower triangle of the input is used.
///
/// # Example
///
/// ```
/// use tridiag::Matrix;
/// use tridiag::linalg::Tridiagonalization;
///
/// let a = Matrix::new([
///     [4.0_f64, 1.0, -2.0, 2.0],
///     [1.0, 2.0, 0.0, 1.0],
///     [-2.0, 0.0, 3.0, -2.0],
///     [2.0, 1.0, -2.0, -1.0],
/// ]);
/// let tri = Tridiagonalization::new(&a);
/// let q = tri.matrix_q().to_matrix();
/// let t = tri.matrix_t();
///
/// let qtq = q * t * q.transpose();
/// for i in 0..4 {
///     for j in 0..4 {
///         assert!((qtq[(i, j)] - a[(i, j)]).abs() < 1e-12);
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Tridiagonalization<T, const N: usize> {
    packed: Matrix<T, N, N>,
    h_coeffs: [T; N],
}

impl<T: LinalgScalar, const N: usize> Tridiagonalization<T, N> {
    /// Tridiagonalize `a`. Panics if `N == 0`.
    pub fn new(a: &Matrix<T, N, N>) -> Self {
        assert!(N > 0, "tridiagonalization requires a non-empty matrix");
        let mut packed = *a;
        let mut h_coeffs = [T::zero(); N];
        tridiagonalize_in_place(&mut packed, &mut h_coeffs[..householder_coeff_len(N)]);
        Self { packed, h_coeffs }
    }

    /// Householder coefficients, one per reflector (`max(N - 1, 1)` entries).
    #[inline]
    pub fn householder_coefficients(&self) -> &[T] {
        &self.h_coeffs[..householder_coeff_len(N)]
    }

    /// The packed reduction (see the module docs for its layout).
    #[inline]
    pub fn packed_matrix(&self) -> &Matrix<T, N, N> {
        &self.packed
    }

    /// `Q` as a lazy product of reflectors.
    pub fn matrix_q(&self) -> HouseholderSequence<'_, T, Matrix<T, N, N>> {
        HouseholderSequence::new(&self.packed, &self.h_coeffs)
    }

    /// The explicit tridiagonal matrix `T`.
    pub fn matrix_t(&self) -> Matrix<T, N, N> {
        let mut t = Matrix::zeros();
        fill_tridiagonal(&self.packed, &mut t);
        t
    }

    /// Diagonal of `T`.
    pub fn diagonal(&self) -> Band<'_, T, Matrix<T, N, N>> {
        Band::diagonal(&self.packed)
    }

    /// Sub-diagonal of `T` (`N - 1` entries).
    pub fn sub_diagonal(&self) -> Band<'_, T, Matrix<T, N, N>> {
        Band::sub_diagonal(&self.packed)
    }
}

/// Explicit tridiagonal form of a fixed-size matrix: real bands of `T` and,
/// if requested, the dense `Q`.
///
/// ```
/// use tridiag::Matrix;
///
/// let a = Matrix::new([[5.0_f64]]);
/// let tri = a.explicit_tridiagonal(true);
/// assert_eq!(tri.diagonal(), &[5.0]);
/// assert!(tri.sub_diagonal().is_empty());
/// assert_eq!(tri.q(), Some(&Matrix::eye()));
/// ```
#[derive(Debug, Clone)]
pub struct ExplicitTridiagonal<T: LinalgScalar, const N: usize> {
    diag: [T::Real; N],
    sub_diag: [T::Real; N],
    q: Option<Matrix<T, N, N>>,
}

impl<T: LinalgScalar, const N: usize> ExplicitTridiagonal<T, N> {
    /// Tridiagonalize `a`, keeping `Q` only if `extract_q` is set.
    /// Panics if `N == 0`.
    pub fn new(a: &Matrix<T, N, N>, extract_q: bool) -> Self {
        assert!(N > 0, "tridiagonalization requires a non-empty matrix");
        let mut work = *a;
        let mut h = [T::zero(); N];
        let mut diag = [<T::Real as Zero>::zero(); N];
        let mut sub_diag = [<T::Real as Zero>::zero(); N];
        tridiagonalize_with_q(
            &mut work,
            &mut h[..householder_coeff_len(N)],
            &mut diag,
            &mut sub_diag[..N - 1],
            extract_q,
        );
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

    /// Sub-diagonal of `T` (`N - 1` entries).
    #[inline]
    pub fn sub_diagonal(&self) -> &[T::Real] {
        &self.sub_diag[..N - 1]
    }

    /// The dense `Q`, if it was extracted.
    #[inline]
    pub fn q(&self) -> Option<&Matrix<T, N, N>> {
        self.q.as_ref()
    }

    /// The explicit tridiagonal matrix `T`.
    pub fn matrix_t(&self) -> Matrix<T, N, N> {
        let mut t = Matrix::zeros();
        write_tridiagonal(&mut t, |i| self.diag[i], |i| self.sub_diag[i]);
        t
    }
}

/// Convenience methods for tridiagonalization.
impl<T: LinalgScalar, const N: usize> Matrix<T, N, N> {
    /// Packed Householder tridiagonalization of a symmetric (Hermitian) matrix.
    ///
    /// The caller is responsible for the matrix being symmetric/Hermitian;
    /// only the lower triangle is read.
    ///
    /// ```
    /// use tridiag::Matrix;
    ///
    /// let a = Matrix::new([[2.0_f64, 1.0], [1.0, 3.0]]);
    /// let tri = a.tridiagonalize();
    /// assert_eq!(tri.diagonal().get(0), 2.0);
    /// assert_eq!(tri.sub_diagonal().get(0), 1.0);
    /// ```
    pub fn tridiagonalize(&self) -> Tridiagonalization<T, N> {
        Tridiagonalization::new(self)
    }

    /// Real bands of `T` and optionally the dense `Q`, using the closed
    /// forms for `1 × 1` and real `3 × 3` input.
    pub fn explicit_tridiagonal(&self, extract_q: bool) -> ExplicitTridiagonal<T, N> {
        ExplicitTridiagonal::new(self, extract_q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!(
            (a - b).abs() < tol,
            "{}: {} vs {} (diff {})",
            msg,
            a,
            b,
            (a - b).abs()
        );
    }

    fn assert_mat_near<const N: usize>(a: &Matrix<f64, N, N>, b: &Matrix<f64, N, N>, tol: f64, msg: &str) {
        for i in 0..N {
            for j in 0..N {
                assert_near(a[(i, j)], b[(i, j)], tol, &format!("{}[({},{})]", msg, i, j));
            }
        }
    }

    fn sample4() -> Matrix<f64, 4, 4> {
        Matrix::new([
            [4.0, 1.0, -2.0, 2.0],
            [1.0, 2.0, 0.0, 1.0],
            [-2.0, 0.0, 3.0, -2.0],
            [2.0, 1.0, -2.0, -1.0],
        ])
    }

    fn sample5() -> Matrix<f64, 5, 5> {
        Matrix::new([
            [5.0, 1.0, 0.5, 0.25, 0.125],
            [1.0, 4.0, 1.0, 0.5, 0.25],
            [0.5, 1.0, 3.0, 1.0, 0.5],
            [0.25, 0.5, 1.0, 2.0, 1.0],
            [0.125, 0.25, 0.5, 1.0, 1.0],
        ])
    }

    fn check_reconstruction<const N: usize>(a: &Matrix<f64, N, N>) {
        let tri = a.tridiagonalize();
        let q = tri.matrix_q().to_matrix();
        let t = tri.matrix_t();

        assert_mat_near(&(q * t * q.transpose()), a, 1e-10, "QTQ^T");
        assert_mat_near(&(q.transpose() * q), &Matrix::eye(), 1e-10, "Q^TQ");
    }

    #[test]
    fn reconstruction_4x4() {
        check_reconstruction(&sample4());
    }

    #[test]
    fn reconstruction_5x5() {
        check_reconstruction(&sample5());
    }

    #[test]
    fn reconstruction_small_sizes() {
        check_reconstruction(&Matrix::new([[7.0_f64]]));
        check_reconstruction(&Matrix::new([[2.0_f64, -1.0], [-1.0, 2.0]]));
        check_reconstruction(&Matrix::new([
            [4.0_f64, 1.0, -1.0],
            [1.0, 3.0, 2.0],
            [-1.0, 2.0, 5.0],
        ]));
    }

    #[test]
    fn first_step_norm() {
        let tri = sample4().tridiagonalize();
        // |T[1,0]| = ||a[1..4, 0]|| = 3, sign opposite to a[1,0]
        assert_near(tri.sub_diagonal().get(0), -3.0, TOL, "T[1,0]");
    }

    #[test]
    fn matrix_t_is_tridiagonal() {
        let t = sample5().tridiagonalize().matrix_t();
        for i in 0..5usize {
            for j in 0..5usize {
                if i.abs_diff(j) > 1 {
                    assert_eq!(t[(i, j)], 0.0, "T[({},{})] must be exactly zero", i, j);
                }
            }
            if i + 1 < 5 {
                assert_eq!(t[(i, i + 1)], t[(i + 1, i)], "T must be symmetric");
            }
        }
    }

    #[test]
    fn bands_match_matrix_t() {
        let tri = sample5().tridiagonalize();
        let t = tri.matrix_t();
        assert_eq!(tri.diagonal().len(), 5);
        assert_eq!(tri.sub_diagonal().len(), 4);
        for (i, d) in tri.diagonal().iter().enumerate() {
            assert_eq!(d, t[(i, i)]);
        }
        let mut sub = [0.0; 4];
        tri.sub_diagonal().copy_to_slice(&mut sub);
        for i in 0..4 {
            assert_eq!(sub[i], t[(i + 1, i)]);
        }
    }

    #[test]
    fn trace_preserved() {
        let a = sample5();
        let tri = a.tridiagonalize();
        let trace: f64 = (0..5).map(|i| a[(i, i)]).sum();
        let t_trace: f64 = tri.diagonal().iter().sum();
        assert_near(t_trace, trace, 1e-12, "trace");
    }

    #[test]
    fn upper_triangle_untouched() {
        // upper triangle deliberately inconsistent with the lower one
        let mut a = sample4();
        a[(0, 2)] = 100.0;
        a[(1, 3)] = -100.0;
        let orig = a;

        let tri = a.tridiagonalize();
        let packed = tri.packed_matrix();
        for j in 0..4 {
            for i in 0..j {
                assert_eq!(packed[(i, j)], orig[(i, j)], "upper ({},{})", i, j);
            }
        }
        // the upper garbage has no effect on the result
        let reference = sample4().tridiagonalize();
        for i in 0..4 {
            assert_eq!(tri.diagonal().get(i), reference.diagonal().get(i));
        }
    }

    #[test]
    fn only_lower_triangle_is_read() {
        let full = sample4();
        let mut lower_only = full;
        for j in 0..4 {
            for i in 0..j {
                lower_only[(i, j)] = f64::NAN;
            }
        }
        let t_full = full.tridiagonalize().matrix_t();
        let t_lower = lower_only.tridiagonalize().matrix_t();
        assert_eq!(t_full, t_lower);
    }

    #[test]
    fn coefficients_length() {
        let tri = sample4().tridiagonalize();
        assert_eq!(tri.householder_coefficients().len(), 3);
        let single = Matrix::new([[1.0_f64]]).tridiagonalize();
        assert_eq!(single.householder_coefficients().len(), 1);
    }

    #[test]
    fn coeff_len_rule() {
        assert_eq!(householder_coeff_len(0), 1);
        assert_eq!(householder_coeff_len(1), 1);
        assert_eq!(householder_coeff_len(2), 1);
        assert_eq!(householder_coeff_len(10), 9);
    }

    #[test]
    fn single_entry() {
        let a = Matrix::new([[5.0_f64]]);
        let tri = a.tridiagonalize();
        assert_eq!(tri.diagonal().get(0), 5.0);
        assert!(tri.sub_diagonal().is_empty());
        assert_eq!(tri.matrix_q().to_matrix(), Matrix::eye());

        let ex = a.explicit_tridiagonal(true);
        assert_eq!(ex.diagonal(), &[5.0]);
        assert_eq!(ex.q(), Some(&Matrix::eye()));
    }

    #[test]
    fn already_tridiagonal_general_path() {
        let a = Matrix::new([
            [2.0_f64, 1.0, 0.0, 0.0],
            [1.0, 2.0, 1.0, 0.0],
            [0.0, 1.0, 2.0, 1.0],
            [0.0, 0.0, 1.0, 2.0],
        ]);
        let tri = a.tridiagonalize();
        assert_eq!(tri.matrix_t(), a);
        assert_eq!(tri.matrix_q().to_matrix(), Matrix::eye());
        for &h in tri.householder_coefficients() {
            assert_eq!(h, 0.0);
        }
    }

    #[test]
    fn closed_form_already_tridiagonal() {
        let a = Matrix::new([[2.0_f64, 1.0, 0.0], [1.0, 2.0, 1.0], [0.0, 1.0, 2.0]]);
        let ex = a.explicit_tridiagonal(true);
        assert_eq!(ex.diagonal(), &[2.0, 2.0, 2.0]);
        assert_eq!(ex.sub_diagonal(), &[1.0, 1.0]);
        assert_eq!(ex.q(), Some(&Matrix::eye()));
        assert_eq!(ex.matrix_t(), a);
    }

    #[test]
    fn closed_form_zero_column() {
        let a = Matrix::new([[3.0_f64, 0.0, 0.0], [0.0, 1.0, 4.0], [0.0, 4.0, -2.0]]);
        let ex = a.explicit_tridiagonal(true);
        assert_eq!(ex.sub_diagonal(), &[0.0, 4.0]);
        assert_eq!(ex.q(), Some(&Matrix::eye()));
    }

    #[test]
    fn closed_form_matches_general_path() {
        let a = Matrix::new([
            [4.0_f64, 1.0, -1.0],
            [1.0, 3.0, 2.0],
            [-1.0, 2.0, 5.0],
        ]);
        let ex = a.explicit_tridiagonal(true);
        let q = *ex.q().unwrap();
        let t = ex.matrix_t();
        assert_mat_near(&(q * t * q.transpose()), &a, 1e-12, "closed form QTQ^T");
        assert_mat_near(&(q.transpose() * q), &Matrix::eye(), 1e-12, "closed form Q^TQ");

        // same T up to the sign of the sub-diagonal
        let tri = a.tridiagonalize();
        for i in 0..3 {
            assert_near(ex.diagonal()[i], tri.diagonal().get(i), 1e-12, "diag");
        }
        for i in 0..2 {
            assert_near(
                ex.sub_diagonal()[i].abs(),
                tri.sub_diagonal().get(i).abs(),
                1e-12,
                "sub-diag",
            );
        }
    }

    #[test]
    fn closed_form_small_scale_matches_general_path() {
        let base = Matrix::new([
            [4.0_f64, 1.0, -1.0],
            [1.0, 3.0, 2.0],
            [-1.0, 2.0, 5.0],
        ]);
        for scale in [1e-17, 1e-100, 1e100] {
            let a = base * scale;
            let norm = a.frobenius_norm();
            let ex = a.explicit_tridiagonal(true);
            let q = *ex.q().unwrap();
            assert_ne!(q, Matrix::eye(), "scale {:e}: a(2,0) must be reduced", scale);

            let residual = (q * ex.matrix_t() * q.transpose() - a).frobenius_norm() / norm;
            assert!(residual < 1e-14, "scale {:e}: relative residual {:e}", scale, residual);
            let orth = (q.transpose() * q - Matrix::eye()).frobenius_norm();
            assert!(orth < 1e-14, "scale {:e}: Q^TQ - I = {:e}", scale, orth);

            let tri = a.tridiagonalize();
            for i in 0..3 {
                assert_near(
                    ex.diagonal()[i] / scale,
                    tri.diagonal().get(i) / scale,
                    1e-12,
                    "diag",
                );
            }
        }
    }

    #[test]
    fn closed_form_without_q_leaves_input() {
        let a = Matrix::new([
            [4.0_f64, 1.0, -1.0],
            [1.0, 3.0, 2.0],
            [-1.0, 2.0, 5.0],
        ]);
        let ex = a.explicit_tridiagonal(false);
        assert!(ex.q().is_none());
        let with_q = a.explicit_tridiagonal(true);
        assert_eq!(ex.diagonal(), with_q.diagonal());
        assert_eq!(ex.sub_diagonal(), with_q.sub_diagonal());
    }

    #[test]
    fn explicit_general_path() {
        let a = sample5();
        let ex = a.explicit_tridiagonal(true);
        let q = *ex.q().unwrap();
        let t = ex.matrix_t();
        assert_mat_near(&(q * t * q.transpose()), &a, 1e-10, "QTQ^T");

        // Q agrees with the lazy sequence of the packed form
        let lazy = a.tridiagonalize().matrix_q().to_matrix();
        assert_mat_near(&q, &lazy, 1e-12, "Q");
    }

    #[test]
    fn lazy_q_application_matches_dense() {
        let a = sample5();
        let tri = a.tridiagonalize();
        let seq = tri.matrix_q();
        let q = seq.to_matrix();

        let x = Matrix::<f64, 5, 2>::from_fn(|i, j| (i as f64 + 1.0) * if j == 0 { 1.0 } else { -0.5 });
        let mut y = x;
        seq.apply_on_the_left(&mut y);
        let expected = q * x;
        for i in 0..5 {
            for j in 0..2 {
                assert_near(y[(i, j)], expected[(i, j)], 1e-12, "QX");
            }
        }

        let mut z = y;
        seq.adjoint().apply_on_the_left(&mut z);
        for i in 0..5 {
            for j in 0..2 {
                assert_near(z[(i, j)], x[(i, j)], 1e-12, "Q^T Q X");
            }
        }
    }

    #[test]
    fn q_transforms_a_into_t() {
        let a = sample4();
        let tri = a.tridiagonalize();
        let seq = tri.matrix_q();
        // A is symmetric, so Q^T A Q = Q^T (Q^T A)^T
        let mut m = a;
        seq.adjoint().apply_on_the_left(&mut m);
        let mut m = m.transpose();
        seq.adjoint().apply_on_the_left(&mut m);
        assert_mat_near(&m, &tri.matrix_t(), 1e-12, "Q^TAQ");
    }

    #[test]
    fn strategy_dispatch() {
        assert_eq!(Strategy::select::<f64>(1), Strategy::Single);
        assert_eq!(Strategy::select::<f64>(2), Strategy::Householder);
        assert_eq!(Strategy::select::<f32>(3), Strategy::Closed3);
        assert_eq!(Strategy::select::<f64>(50), Strategy::Householder);
    }

    #[test]
    fn try_rejects_wrong_coefficient_length() {
        let orig = sample4();
        let mut a = orig;
        let mut h = [0.0; 4];
        let err = try_tridiagonalize_in_place(&mut a, &mut h).unwrap_err();
        assert_eq!(err, LinalgError::CoefficientLength { expected: 3, got: 4 });
        assert_eq!(a, orig);
        assert_eq!(h, [0.0; 4]);
    }

    #[test]
    #[should_panic(expected = "householder coefficient buffer has length 2, expected 3")]
    fn panics_on_wrong_coefficient_length() {
        let mut a = sample4();
        let mut h = [0.0; 2];
        tridiagonalize_in_place(&mut a, &mut h);
    }

    #[test]
    #[should_panic(expected = "not square")]
    fn panics_on_non_square() {
        let mut a = Matrix::<f64, 2, 3>::zeros();
        let mut h = [0.0; 1];
        tridiagonalize_in_place(&mut a, &mut h);
    }

    #[test]
    #[should_panic(expected = "sub-diagonal length")]
    fn explicit_rejects_wrong_band_length() {
        let mut a = sample4();
        let mut h = [0.0; 3];
        let mut diag = [0.0; 4];
        let mut sub = [0.0; 4];
        tridiagonalize_with_q(&mut a, &mut h, &mut diag, &mut sub, false);
    }

    #[test]
    fn f32_support() {
        let a = Matrix::new([
            [4.0_f32, 1.0, -2.0, 2.0],
            [1.0, 2.0, 0.0, 1.0],
            [-2.0, 0.0, 3.0, -2.0],
            [2.0, 1.0, -2.0, -1.0],
        ]);
        let tri = a.tridiagonalize();
        let q = tri.matrix_q().to_matrix();
        let r = q * tri.matrix_t() * q.transpose();
        for i in 0..4 {
            for j in 0..4 {
                assert!((r[(i, j)] - a[(i, j)]).abs() < 1e-5);
            }
        }
    }

    #[cfg(feature = "complex")]
    mod complex_tests {
        use super::*;
        use num_complex::Complex;

        type C = Complex<f64>;

        fn c(re: f64, im: f64) -> C {
            Complex::new(re, im)
        }

        fn hermitian3() -> Matrix<C, 3, 3> {
            Matrix::new([
                [c(2.0, 0.0), c(1.0, -1.0), c(0.5, 2.0)],
                [c(1.0, 1.0), c(3.0, 0.0), c(-1.0, 0.5)],
                [c(0.5, -2.0), c(-1.0, -0.5), c(1.0, 0.0)],
            ])
        }

        #[test]
        fn hermitian_reconstruction() {
            let a = hermitian3();
            let tri = a.tridiagonalize();
            let q = tri.matrix_q().to_matrix();
            let t = tri.matrix_t();

            let r = q * t * q.adjoint();
            let qhq = q.adjoint() * q;
            for i in 0..3 {
                for j in 0..3 {
                    assert!((r[(i, j)] - a[(i, j)]).norm() < 1e-12, "QTQ^H[({},{})]", i, j);
                    let id = if i == j { c(1.0, 0.0) } else { c(0.0, 0.0) };
                    assert!((qhq[(i, j)] - id).norm() < 1e-12, "Q^HQ[({},{})]", i, j);
                }
            }
        }

        #[test]
        fn hermitian_t_is_real() {
            let tri = hermitian3().tridiagonalize();
            let t = tri.matrix_t();
            for i in 0..3 {
                for j in 0..3 {
                    assert_eq!(t[(i, j)].im, 0.0);
                }
            }
        }

        #[test]
        fn complex_3x3_skips_closed_form() {
            assert_eq!(Strategy::select::<C>(3), Strategy::Householder);
            let a = hermitian3();
            let ex = a.explicit_tridiagonal(true);
            let q = *ex.q().unwrap();
            let r = q * ex.matrix_t() * q.adjoint();
            for i in 0..3 {
                for j in 0..3 {
                    assert!((r[(i, j)] - a[(i, j)]).norm() < 1e-12);
                }
            }
        }

        #[test]
        fn complex_phase_only_column() {
            // sub-diagonal entry with zero tail still needs a phase rotation
            let a = Matrix::new([[c(1.0, 0.0), c(0.0, -2.0)], [c(0.0, 2.0), c(1.0, 0.0)]]);
            let tri = a.tridiagonalize();
            assert!((tri.sub_diagonal().get(0).abs() - 2.0).abs() < 1e-12);
            let q = tri.matrix_q().to_matrix();
            let r = q * tri.matrix_t() * q.adjoint();
            for i in 0..2 {
                for j in 0..2 {
                    assert!((r[(i, j)] - a[(i, j)]).norm() < 1e-12);
                }
            }
        }
    }
}
