//! Back-substitution against an upper-triangular factor, and the
//! general-matrix solve built on top of it via QR.

use crate::base::Matrix;

impl Matrix {
    /// Solves `self * x = b` for `x` by back-substitution, treating `self`
    /// as upper-triangular (its strictly-lower entries are never read). A
    /// zero pivot produces `NaN` in the corresponding (and all dependent)
    /// entries rather than panicking — callers check with `x.get(i,0).is_nan()`.
    pub fn find_x(&self, b: &Matrix) -> Matrix {
        let n = self.rows();
        assert_eq!(self.cols(), n, "find_x: matrix must be square");
        assert_eq!(b.rows(), n, "find_x: rhs row count mismatch");
        assert_eq!(b.cols(), 1, "find_x: rhs must be a column vector");
        let mut x = Matrix::new(n, 1);
        for i in (0..n).rev() {
            let mut sum = b.get(i, 0);
            for j in (i + 1)..n {
                sum -= self.get(i, j) * x.get(j, 0);
            }
            let diag = self.get(i, i);
            let xi = if diag == 0.0 { f64::NAN } else { sum / diag };
            x.set(i, 0, xi);
        }
        x
    }

    /// Solves `self * x = u` for a general (not necessarily triangular)
    /// square `self`, via Householder QR on a private copy. Used by inverse
    /// iteration, which repeatedly re-solves a shifted copy of the same
    /// matrix against a changing right-hand side.
    pub fn solve_b(&self, u: &Matrix) -> Matrix {
        let mut a = self.clone();
        a.copy();
        a.solve_qr(u.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn find_x_solves_upper_triangular_system() {
        let u = Matrix::from_row_major(2, 2, &[2.0, 1.0, 0.0, 3.0]);
        let b = Matrix::from_row_major(2, 1, &[5.0, 6.0]);
        let x = u.find_x(&b);
        assert_abs_diff_eq!(x.get(1, 0), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x.get(0, 0), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn find_x_zero_pivot_yields_nan() {
        let u = Matrix::from_row_major(2, 2, &[0.0, 1.0, 0.0, 3.0]);
        let b = Matrix::from_row_major(2, 1, &[5.0, 6.0]);
        let x = u.find_x(&b);
        assert!(x.get(0, 0).is_nan());
    }

    #[test]
    fn solve_b_matches_solve_qr() {
        let a = Matrix::from_row_major(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let b = Matrix::from_row_major(2, 1, &[1.0, 2.0]);
        let x = a.solve_b(&b);
        assert_abs_diff_eq!(x.get(0, 0), 1.0 / 11.0, epsilon = 1e-8);
        assert_abs_diff_eq!(x.get(1, 0), 7.0 / 11.0, epsilon = 1e-8);
    }
}
