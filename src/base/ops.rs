//! Arithmetic operators over [`Matrix`]. Every operator here allocates a
//! fresh, unshared, write-in-place result — only `.clone()` and `.view(...)`
//! produce aliased storage (see `matrix.rs`).

use std::ops::{Add, AddAssign, DivAssign, Mul, Sub};

use super::matrix::Matrix;

fn check_same_shape(a: &Matrix, b: &Matrix, op: &str) {
    assert_eq!(a.rows(), b.rows(), "{op}: row count mismatch");
    assert_eq!(a.cols(), b.cols(), "{op}: column count mismatch");
}

fn add_impl(a: &Matrix, b: &Matrix) -> Matrix {
    check_same_shape(a, b, "add");
    let mut out = Matrix::new(a.rows(), a.cols());
    for j in 0..a.cols() {
        for i in 0..a.rows() {
            out.set(i, j, a.get(i, j) + b.get(i, j));
        }
    }
    out
}

fn sub_impl(a: &Matrix, b: &Matrix) -> Matrix {
    check_same_shape(a, b, "sub");
    let mut out = Matrix::new(a.rows(), a.cols());
    for j in 0..a.cols() {
        for i in 0..a.rows() {
            out.set(i, j, a.get(i, j) - b.get(i, j));
        }
    }
    out
}

fn matmul_impl(a: &Matrix, b: &Matrix) -> Matrix {
    assert_eq!(
        a.cols(),
        b.rows(),
        "matmul: inner dimensions mismatch ({} cols vs {} rows)",
        a.cols(),
        b.rows()
    );
    let mut out = Matrix::new(a.rows(), b.cols());
    for j in 0..b.cols() {
        for k in 0..a.cols() {
            let bkj = b.get(k, j);
            if bkj == 0.0 {
                continue;
            }
            for i in 0..a.rows() {
                let acc = out.get(i, j) + a.get(i, k) * bkj;
                out.set(i, j, acc);
            }
        }
    }
    out
}

fn scale_impl(a: &Matrix, alpha: f64) -> Matrix {
    let mut out = Matrix::new(a.rows(), a.cols());
    for j in 0..a.cols() {
        for i in 0..a.rows() {
            out.set(i, j, a.get(i, j) * alpha);
        }
    }
    out
}

macro_rules! impl_binop_all_combos {
    ($trait:ident, $method:ident, $func:ident) => {
        impl $trait<Matrix> for Matrix {
            type Output = Matrix;
            fn $method(self, rhs: Matrix) -> Matrix {
                $func(&self, &rhs)
            }
        }
        impl $trait<&Matrix> for Matrix {
            type Output = Matrix;
            fn $method(self, rhs: &Matrix) -> Matrix {
                $func(&self, rhs)
            }
        }
        impl $trait<Matrix> for &Matrix {
            type Output = Matrix;
            fn $method(self, rhs: Matrix) -> Matrix {
                $func(self, &rhs)
            }
        }
        impl $trait<&Matrix> for &Matrix {
            type Output = Matrix;
            fn $method(self, rhs: &Matrix) -> Matrix {
                $func(self, rhs)
            }
        }
    };
}

impl_binop_all_combos!(Add, add, add_impl);
impl_binop_all_combos!(Sub, sub, sub_impl);
impl_binop_all_combos!(Mul, mul, matmul_impl);

impl Mul<f64> for Matrix {
    type Output = Matrix;
    fn mul(self, alpha: f64) -> Matrix {
        scale_impl(&self, alpha)
    }
}

impl Mul<f64> for &Matrix {
    type Output = Matrix;
    fn mul(self, alpha: f64) -> Matrix {
        scale_impl(self, alpha)
    }
}

impl Mul<Matrix> for f64 {
    type Output = Matrix;
    fn mul(self, rhs: Matrix) -> Matrix {
        scale_impl(&rhs, self)
    }
}

impl Mul<&Matrix> for f64 {
    type Output = Matrix;
    fn mul(self, rhs: &Matrix) -> Matrix {
        scale_impl(rhs, self)
    }
}

impl AddAssign<&Matrix> for Matrix {
    fn add_assign(&mut self, rhs: &Matrix) {
        check_same_shape(self, rhs, "add_assign");
        for j in 0..self.cols() {
            for i in 0..self.rows() {
                let v = self.get(i, j) + rhs.get(i, j);
                self.set(i, j, v);
            }
        }
    }
}

impl AddAssign<Matrix> for Matrix {
    fn add_assign(&mut self, rhs: Matrix) {
        *self += &rhs;
    }
}

impl DivAssign<f64> for Matrix {
    fn div_assign(&mut self, alpha: f64) {
        for j in 0..self.cols() {
            for i in 0..self.rows() {
                let v = self.get(i, j) / alpha;
                self.set(i, j, v);
            }
        }
    }
}
