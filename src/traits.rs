use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

#[cfg(feature = "complex")]
use num_complex::Complex;

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Real floating-point scalar (`f32`, `f64`).
///
/// Implies `LinalgScalar<Real = Self>` since real floats are their own real type.
pub trait FloatScalar: Scalar + Float + LinalgScalar<Real = Self> {}

impl<T: Scalar + Float + LinalgScalar<Real = T>> FloatScalar for T {}

/// Matrix elements the reduction can work on: real floats and complex numbers.
///
/// Symmetric input is read as Hermitian throughout, so every routine goes
/// through `conj` even when it is the identity.
pub trait LinalgScalar: Scalar {
    /// The real component type (`Self` for reals, `T` for `Complex<T>`).
    type Real: FloatScalar;

    /// `true` for complex scalars. Selects between real-only closed forms
    /// and the general Householder path.
    const IS_COMPLEX: bool;

    /// Absolute value / modulus: `|z|` for complex, `.abs()` for real.
    fn modulus(self) -> Self::Real;

    /// Squared modulus `|z|^2`, without the square root.
    fn abs2(self) -> Self::Real;

    /// Complex conjugate (identity for reals).
    fn conj(self) -> Self;

    /// Real part.
    fn re(self) -> Self::Real;

    /// Square root.
    fn lsqrt(self) -> Self;

    /// Machine epsilon of the underlying real type.
    fn lepsilon() -> Self::Real;

    /// Promote a real value into `Self`.
    fn from_real(r: Self::Real) -> Self;
}

macro_rules! impl_linalg_scalar_real {
    ($($t:ty),*) => {
        $(
            impl LinalgScalar for $t {
                type Real = $t;
                const IS_COMPLEX: bool = false;

                #[inline] fn modulus(self) -> $t { Float::abs(self) }
                #[inline] fn abs2(self) -> $t { self * self }
                #[inline] fn conj(self) -> $t { self }
                #[inline] fn re(self) -> $t { self }
                #[inline] fn lsqrt(self) -> $t { Float::sqrt(self) }
                #[inline] fn lepsilon() -> $t { <$t as Float>::epsilon() }
                #[inline] fn from_real(r: $t) -> $t { r }
            }
        )*
    };
}

impl_linalg_scalar_real!(f32, f64);

#[cfg(feature = "complex")]
impl<T: FloatScalar> LinalgScalar for Complex<T> {
    type Real = T;
    const IS_COMPLEX: bool = true;

    #[inline]
    fn modulus(self) -> T {
        self.norm()
    }

    #[inline]
    fn abs2(self) -> T {
        self.norm_sqr()
    }

    #[inline]
    fn conj(self) -> Self {
        Complex::conj(&self)
    }

    #[inline]
    fn re(self) -> T {
        self.re
    }

    #[inline]
    fn lsqrt(self) -> Self {
        self.sqrt()
    }

    #[inline]
    fn lepsilon() -> T {
        T::epsilon()
    }

    #[inline]
    fn from_real(r: T) -> Self {
        Complex::new(r, T::zero())
    }
}

/// Read-only access to a matrix-like type.
///
/// Storage is expected to be column-major: `col_as_slice` hands out the
/// contiguous tail of one column.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;

    /// `&m[row_start..nrows, col]` as a contiguous slice.
    fn col_as_slice(&self, col: usize, row_start: usize) -> &[T];
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, enabling the in-place
/// reduction to work on both fixed-size and heap matrices.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;

    /// `&mut m[row_start..nrows, col]` as a contiguous slice.
    fn col_as_mut_slice(&mut self, col: usize, row_start: usize) -> &mut [T];
}
