use core::marker::PhantomData;

use num_traits::{Float, Zero};

use crate::traits::{LinalgScalar, MatrixMut, MatrixRef};
use crate::Matrix;

/// Turn `x` into an elementary reflector in place.
///
/// Computes `tau` and a real `beta` such that `H x = [beta, 0, ..., 0]` with
/// `H = I - tau v v^H` and `v = [1, x[1] / (x[0] - beta), ...]`.
///
/// On return `x[0]` holds `beta` and `x[1..]` holds the essential part of `v`
/// (its implicit leading 1 is not stored). `H` is unitary; for real input it
/// is also symmetric.
///
/// When the tail is zero and `x[0]` is already real, `H = I`: `tau` is zero
/// and `beta = x[0]`.
///
/// ```
/// use tridiag::linalg::make_householder_in_place;
///
/// let mut x = [3.0_f64, 4.0];
/// let (tau, beta) = make_householder_in_place(&mut x);
/// assert!((beta + 5.0).abs() < 1e-12);
/// // H x = x - tau * v * (v^T x)
/// let v = [1.0, x[1]];
/// let vtx = 3.0 * v[0] + 4.0 * v[1];
/// assert!((3.0 - tau * v[0] * vtx - beta).abs() < 1e-12);
/// assert!((4.0 - tau * v[1] * vtx).abs() < 1e-12);
/// ```
pub fn make_householder_in_place<T: LinalgScalar>(x: &mut [T]) -> (T, T::Real) {
    assert!(!x.is_empty(), "householder reflector needs a non-empty vector");

    let c0 = x[0];
    let mut tail_sq = <T::Real as Zero>::zero();
    for &v in &x[1..] {
        tail_sq = tail_sq + v.abs2();
    }

    let tiny = <T::Real as Float>::min_positive_value();
    let c0_imag_sq = (c0 - T::from_real(c0.re())).abs2();

    if tail_sq <= tiny && c0_imag_sq <= tiny {
        for v in x[1..].iter_mut() {
            *v = T::zero();
        }
        let beta = c0.re();
        x[0] = T::from_real(beta);
        return (T::zero(), beta);
    }

    // beta takes the sign opposite to re(c0) so c0 - beta never cancels
    let mut beta = (c0.abs2() + tail_sq).lsqrt();
    if c0.re() >= <T::Real as Zero>::zero() {
        beta = <T::Real as Zero>::zero() - beta;
    }

    let denom = c0 - T::from_real(beta);
    for v in x[1..].iter_mut() {
        *v = *v / denom;
    }
    x[0] = T::from_real(beta);

    let tau = (T::from_real(beta) - c0).conj() / T::from_real(beta);
    (tau, beta)
}

/// Apply `I - c v v^H` to `col`, where `v = [1, essential...]`.
#[inline]
fn reflect<T: LinalgScalar>(essential: &[T], c: T, col: &mut [T]) {
    debug_assert_eq!(col.len(), essential.len() + 1);
    let mut dot = col[0];
    for (&x, &v) in col[1..].iter().zip(essential) {
        dot = dot + v.conj() * x;
    }
    if dot == T::zero() {
        return;
    }
    dot = dot * c;

    col[0] = col[0] - dot;
    for (x, &v) in col[1..].iter_mut().zip(essential) {
        *x = *x - dot * v;
    }
}

/// Lazy product of the reflectors stored in a packed tridiagonalization.
///
/// Represents `Q = G_0 G_1 ... G_{n-2}` with `G_k = I - conj(h_k) v_k v_k^H`,
/// where `v_k` is zero above row `k + 1`, has an implicit 1 at row `k + 1`,
/// and takes its remaining entries from column `k`, rows `k + 2..n`, of the
/// packed matrix. The product is never formed unless asked for: applying it
/// costs `O(n^2)` per reflector and column of the target.
///
/// `adjoint()` flips the view between `Q` and `Q^H`.
#[derive(Debug)]
pub struct HouseholderSequence<'a, T, M> {
    vectors: &'a M,
    coeffs: &'a [T],
    len: usize,
    adjoint: bool,
    _marker: PhantomData<T>,
}

// Manual impls: the view is a pair of borrows, copyable whatever `M` is.
impl<T, M> Clone for HouseholderSequence<'_, T, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, M> Copy for HouseholderSequence<'_, T, M> {}

impl<'a, T: LinalgScalar, M: MatrixRef<T>> HouseholderSequence<'a, T, M> {
    /// Wrap packed reflectors and their coefficients.
    ///
    /// `vectors` must be square; `coeffs` needs at least `n - 1` entries.
    pub fn new(vectors: &'a M, coeffs: &'a [T]) -> Self {
        let n = vectors.nrows();
        assert_eq!(n, vectors.ncols(), "householder sequence requires a square matrix");
        let len = n.saturating_sub(1);
        assert!(
            coeffs.len() >= len,
            "householder sequence needs {} coefficients, got {}",
            len,
            coeffs.len()
        );
        Self {
            vectors,
            coeffs,
            len,
            adjoint: false,
            _marker: PhantomData,
        }
    }

    /// Number of reflectors.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Dimension of the operator (`n × n`).
    #[inline]
    pub fn dim(&self) -> usize {
        self.vectors.nrows()
    }

    /// Householder coefficients `h_k`, as stored by the reduction.
    #[inline]
    pub fn coeffs(&self) -> &'a [T] {
        &self.coeffs[..self.len]
    }

    /// Essential part of reflector `k` (entries below its implicit leading 1).
    #[inline]
    pub fn essential(&self, k: usize) -> &'a [T] {
        assert!(k < self.len, "reflector index {} out of range (len {})", k, self.len);
        self.vectors.col_as_slice(k, k + 2)
    }

    /// Whether this view applies `Q^H` instead of `Q`.
    #[inline]
    pub fn is_adjoint(&self) -> bool {
        self.adjoint
    }

    /// The conjugate transpose `Q^H` (or back to `Q`).
    pub fn adjoint(self) -> Self {
        Self {
            adjoint: !self.adjoint,
            ..self
        }
    }

    /// Coefficient of reflector `k` in the current orientation.
    #[inline]
    fn coeff(&self, k: usize) -> T {
        if self.adjoint {
            self.coeffs[k]
        } else {
            self.coeffs[k].conj()
        }
    }

    /// Overwrite `dst` with `Q * dst` (or `Q^H * dst`).
    pub fn apply_on_the_left(&self, dst: &mut impl MatrixMut<T>) {
        let n = self.dim();
        assert_eq!(dst.nrows(), n, "row count must match the sequence dimension");
        let ncols = dst.ncols();
        let mut step = |k: usize| {
            let essential = self.essential(k);
            let c = self.coeff(k);
            for j in 0..ncols {
                reflect(essential, c, dst.col_as_mut_slice(j, k + 1));
            }
        };
        // Q = G_0 ... G_{n-2}: the rightmost factor touches dst first
        if self.adjoint {
            (0..self.len).for_each(&mut step);
        } else {
            (0..self.len).rev().for_each(&mut step);
        }
    }

    /// Overwrite `x` with `Q * x` (or `Q^H * x`).
    pub fn apply_to_slice(&self, x: &mut [T]) {
        assert_eq!(x.len(), self.dim(), "vector length must match the sequence dimension");
        if self.adjoint {
            for k in 0..self.len {
                reflect(self.essential(k), self.coeff(k), &mut x[k + 1..]);
            }
        } else {
            for k in (0..self.len).rev() {
                reflect(self.essential(k), self.coeff(k), &mut x[k + 1..]);
            }
        }
    }

    /// Materialize the operator into `out`.
    pub fn eval_into(&self, out: &mut impl MatrixMut<T>) {
        let n = self.dim();
        assert_eq!(out.nrows(), n, "output must be {0}x{0}", n);
        assert_eq!(out.ncols(), n, "output must be {0}x{0}", n);
        for j in 0..n {
            for i in 0..n {
                *out.get_mut(i, j) = if i == j { T::one() } else { T::zero() };
            }
        }
        self.apply_on_the_left(out);
    }
}

impl<T: LinalgScalar, const N: usize> HouseholderSequence<'_, T, Matrix<T, N, N>> {
    /// Dense `N × N` matrix of the operator.
    pub fn to_matrix(&self) -> Matrix<T, N, N> {
        let mut q = Matrix::eye();
        self.apply_on_the_left(&mut q);
        q
    }
}

/// Overwrite a packed tridiagonalization with its explicit `Q`.
///
/// `a` holds the reflectors as produced by
/// [`tridiagonalize_in_place`](crate::linalg::tridiagonalize_in_place) and
/// `h_coeffs` their coefficients. Reflectors are applied back to front, each
/// to the trailing block that is already final, so no second `n × n` buffer
/// is needed. Consumed coefficient slots are reused to hold the reflector
/// being applied; `h_coeffs` is clobbered.
pub fn accumulate_q_in_place<T: LinalgScalar>(a: &mut impl MatrixMut<T>, h_coeffs: &mut [T]) {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "accumulate_q_in_place requires a square matrix");
    let len = n.saturating_sub(1);
    assert!(
        h_coeffs.len() >= len,
        "accumulate_q_in_place needs {} coefficients, got {}",
        len,
        h_coeffs.len()
    );

    // Only the strictly lower part carries reflectors.
    for j in 0..n {
        for i in 0..=j {
            *a.get_mut(i, j) = if i == j { T::one() } else { T::zero() };
        }
    }

    for k in (0..len).rev() {
        // h_coeffs[k + 1..] is spent and exactly as long as the essential part
        let (head, spare) = h_coeffs[k..len].split_at_mut(1);
        let c = head[0].conj();
        spare.copy_from_slice(a.col_as_slice(k, k + 2));

        for j in (k + 1)..n {
            reflect(spare, c, a.col_as_mut_slice(j, k + 1));
        }
        for x in a.col_as_mut_slice(k, k + 1) {
            *x = T::zero();
        }
    }
}
