//! # tridiag
//!
//! Householder tridiagonalization of symmetric and Hermitian matrices,
//! no-std compatible. Given a self-adjoint `A`, computes a unitary `Q` and a
//! real symmetric tridiagonal `T` with `A = Q T Q^H`. This is the first stage
//! of a self-adjoint eigen-solver.
//!
//! ## Quick start
//!
//! ```
//! use tridiag::Matrix;
//!
//! let a = Matrix::new([
//!     [4.0_f64, 1.0, -2.0, 2.0],
//!     [1.0, 2.0, 0.0, 1.0],
//!     [-2.0, 0.0, 3.0, -2.0],
//!     [2.0, 1.0, -2.0, -1.0],
//! ]);
//! let tri = a.tridiagonalize();
//!
//! // T as two real bands
//! let diag: Vec<f64> = tri.diagonal().iter().collect();
//! let sub: Vec<f64> = tri.sub_diagonal().iter().collect();
//! assert_eq!((diag.len(), sub.len()), (4, 3));
//!
//! // Q as a lazy product of reflectors, or dense
//! let q = tri.matrix_q().to_matrix();
//! let r = q * tri.matrix_t() * q.transpose();
//! assert!((r - a).frobenius_norm() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`linalg`]: The reduction itself. [`tridiagonalize_in_place`] works on
//!   any `&mut impl MatrixMut<T>` and a caller-provided coefficient buffer;
//!   [`tridiagonalize_with_q`] produces the real bands and the explicit `Q`
//!   the way an eigen-solver wants them, with closed forms for `1 × 1` and
//!   real `3 × 3` input. [`HouseholderSequence`] applies `Q` or `Q^H` without
//!   forming it.
//!
//! - [`matrix`]: Fixed-size `Matrix<T, M, N>`, column-major and
//!   stack-allocated. `a.tridiagonalize()` returns a [`Tridiagonalization`].
//!
//! - [`dynmatrix`]: Heap-allocated `DynMatrix<T>` (requires `alloc`).
//!   [`DynTridiagonalization`](dynmatrix::DynTridiagonalization) can be
//!   allocated up front and recomputed without reallocating.
//!
//! - [`traits`]: Element and storage traits:
//!   - [`Scalar`]: all matrix elements
//!   - [`FloatScalar`]: real floats
//!   - [`LinalgScalar`]: real floats and complex numbers
//!   - [`MatrixRef`] / [`MatrixMut`]: column-major access used by the reduction
//!
//! ## Conventions
//!
//! Only the lower triangle of the input is read; the strict upper triangle
//! of an in-place reduction is left as the caller wrote it. Symmetry is the
//! caller's responsibility and is not checked.
//!
//! Argument errors (non-square input, wrong buffer lengths) panic, with
//! [`try_tridiagonalize_in_place`] as the `Result` form.
//!
//! ## Logging
//!
//! Dispatch decisions are emitted through the [`log`](https://docs.rs/log)
//! facade under the `tridiag` target at `trace` and `debug` level. Nothing is
//! printed unless the application installs a logger.
//!
//! ## Cargo features
//!
//! | Feature   | Default  | Description |
//! |-----------|----------|-------------|
//! | `std`     | yes      | Implies `alloc`. Hardware FPU via system libm |
//! | `alloc`   | via std  | `DynMatrix` and its wrappers |
//! | `libm`    | baseline | Pure-Rust software float fallback |
//! | `complex` | no       | Hermitian input via `num-complex` |
//! | `all`     | no       | `std` + `complex` |

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
pub mod dynmatrix;
pub mod linalg;
pub mod matrix;
pub mod traits;

pub use linalg::{
    tridiagonalize_in_place, tridiagonalize_with_q, try_tridiagonalize_in_place,
    HouseholderSequence, LinalgError, Tridiagonalization,
};
pub use matrix::aliases::{Matrix1, Matrix2, Matrix3, Matrix4, Matrix5, Matrix6};
pub use matrix::Matrix;
#[cfg(feature = "alloc")]
pub use dynmatrix::{DynMatrix, DynMatrixf32, DynMatrixf64};
#[cfg(all(feature = "alloc", feature = "complex"))]
pub use dynmatrix::{DynMatrixz32, DynMatrixz64};
pub use traits::{FloatScalar, LinalgScalar, MatrixMut, MatrixRef, Scalar};

#[cfg(feature = "complex")]
pub use num_complex::Complex;
