use core::ops::{Add, Mul, Sub};

use crate::traits::Scalar;

use super::DynMatrix;

// ── Element-wise addition / subtraction ─────────────────────────────

fn zip_with<T: Scalar>(
    a: &DynMatrix<T>,
    b: &DynMatrix<T>,
    op: &str,
    f: impl Fn(T, T) -> T,
) -> DynMatrix<T> {
    assert_eq!(
        (a.nrows, a.ncols),
        (b.nrows, b.ncols),
        "dimension mismatch: {}x{} {} {}x{}",
        a.nrows,
        a.ncols,
        op,
        b.nrows,
        b.ncols,
    );
    let data = a.data.iter().zip(&b.data).map(|(&x, &y)| f(x, y)).collect();
    DynMatrix {
        data,
        nrows: a.nrows,
        ncols: a.ncols,
    }
}

impl<T: Scalar> Add<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn add(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        zip_with(self, rhs, "+", |x, y| x + y)
    }
}

impl<T: Scalar> Add for DynMatrix<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        &self + &rhs
    }
}

impl<T: Scalar> Sub<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn sub(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        zip_with(self, rhs, "-", |x, y| x - y)
    }
}

impl<T: Scalar> Sub for DynMatrix<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        &self - &rhs
    }
}

// ── Matrix multiplication ───────────────────────────────────────────

impl<T: Scalar> Mul<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        assert_eq!(
            self.ncols, rhs.nrows,
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let m = self.nrows;
        let mut out = DynMatrix::zeros(m, rhs.ncols, T::zero());
        // out[:, j] += a[:, k] * b[k, j]
        for j in 0..rhs.ncols {
            for k in 0..self.ncols {
                let b_kj = rhs.data[j * rhs.nrows + k];
                let a_col = &self.data[k * m..(k + 1) * m];
                let out_col = &mut out.data[j * m..(j + 1) * m];
                for (o, &a) in out_col.iter_mut().zip(a_col) {
                    *o = *o + a * b_kj;
                }
            }
        }
        out
    }
}

impl<T: Scalar> Mul for DynMatrix<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

impl<T: Scalar> Mul<T> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(self, rhs: T) -> DynMatrix<T> {
        DynMatrix {
            data: self.data.iter().map(|&x| x * rhs).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub() {
        let a = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = DynMatrix::from_rows(2, 2, &[5.0, 6.0, 7.0, 8.0]);
        assert_eq!(&a + &b, DynMatrix::from_rows(2, 2, &[6.0, 8.0, 10.0, 12.0]));
        assert_eq!(b - a, DynMatrix::from_rows(2, 2, &[4.0, 4.0, 4.0, 4.0]));
    }

    #[test]
    fn mul_rectangular() {
        let a = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = DynMatrix::from_rows(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        assert_eq!(&a * &b, DynMatrix::from_rows(2, 2, &[58.0, 64.0, 139.0, 154.0]));
    }

    #[test]
    fn mul_scalar() {
        let a = DynMatrix::from_rows(1, 2, &[1.0, -2.0]);
        assert_eq!(&a * 3.0, DynMatrix::from_rows(1, 2, &[3.0, -6.0]));
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn mul_mismatch() {
        let a = DynMatrix::zeros(2, 3, 0.0_f64);
        let _ = &a * &a;
    }
}
