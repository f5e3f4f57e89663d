//! Element-type aliases for `DynMatrix`.

use super::DynMatrix;

/// Dynamic matrix with `f32` elements.
pub type DynMatrixf32 = DynMatrix<f32>;
/// Dynamic matrix with `f64` elements.
pub type DynMatrixf64 = DynMatrix<f64>;

/// Dynamic matrix with `Complex<f32>` elements.
#[cfg(feature = "complex")]
pub type DynMatrixz32 = DynMatrix<num_complex::Complex<f32>>;
/// Dynamic matrix with `Complex<f64>` elements.
#[cfg(feature = "complex")]
pub type DynMatrixz64 = DynMatrix<num_complex::Complex<f64>>;
