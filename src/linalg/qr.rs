//! Householder QR factorization and the QR-based linear solve.

use crate::base::Matrix;

use super::householder::{apply_left, apply_right, build_reflector};

impl Matrix {
    /// Reduces `self` to upper-triangular `R` in place via Householder
    /// reflectors and accumulates the orthogonal factor into `q_out`, so that
    /// on return `self == R` and `q_out * self` reproduces the matrix this
    /// was called on. `q_out` is overwritten; its prior contents are ignored.
    pub fn qr(&mut self, q_out: &mut Matrix) {
        let n = self.rows();
        assert_eq!(q_out.rows(), n, "qr: q_out row count must match");
        assert_eq!(q_out.cols(), n, "qr: q_out must be square");
        *q_out = Matrix::identity(n);
        let cols = self.cols();
        let steps = n.min(cols);
        for k in 0..steps {
            let sub_len = n - k;
            if sub_len < 2 {
                break;
            }
            let x: Vec<f64> = (0..sub_len).map(|i| self.get(k + i, k)).collect();
            let refl = build_reflector(&x);
            if refl.beta == 0.0 {
                continue;
            }
            apply_left(self, k, n, k, cols, &refl.v, refl.beta);
            apply_right(q_out, 0, n, k, n, &refl.v, refl.beta);
        }
    }

    /// Solves `self * x = b` by Householder QR, consuming both operands:
    /// reflectors are applied to `self` (driving it to upper-triangular `R`)
    /// and to `b` in lockstep (computing `Q^T b` without ever materializing
    /// `Q`), then `R x = Q^T b` is solved by back-substitution. Returns the
    /// solution as a fresh column vector.
    pub fn solve_qr(mut self, mut b: Matrix) -> Matrix {
        let n = self.rows();
        assert_eq!(self.cols(), n, "solve_qr: matrix must be square");
        assert_eq!(b.rows(), n, "solve_qr: rhs row count mismatch");
        assert_eq!(b.cols(), 1, "solve_qr: rhs must be a column vector");
        for k in 0..n {
            let sub_len = n - k;
            if sub_len < 2 {
                break;
            }
            let x: Vec<f64> = (0..sub_len).map(|i| self.get(k + i, k)).collect();
            let refl = build_reflector(&x);
            if refl.beta == 0.0 {
                continue;
            }
            apply_left(&mut self, k, n, k, n, &refl.v, refl.beta);
            let s: f64 = (0..sub_len).map(|i| refl.v[i] * b.get(k + i, 0)).sum();
            let coeff = refl.beta * s;
            for i in 0..sub_len {
                let updated = b.get(k + i, 0) - coeff * refl.v[i];
                b.set(k + i, 0, updated);
            }
        }
        self.find_x(&b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn qr_reproduces_original_matrix() {
        let a = Matrix::from_row_major(3, 3, &[12.0, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0]);
        let mut r = a.clone();
        r.copy();
        let mut q = Matrix::new(3, 3);
        r.qr(&mut q);
        let reproduced = &q * &r;
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(reproduced.get(i, j), a.get(i, j), epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn solve_qr_matches_known_solution() {
        let a = Matrix::from_row_major(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let b = Matrix::from_row_major(2, 1, &[1.0, 2.0]);
        let x = a.solve_qr(b);
        assert_abs_diff_eq!(x.get(0, 0), 1.0 / 11.0, epsilon = 1e-8);
        assert_abs_diff_eq!(x.get(1, 0), 7.0 / 11.0, epsilon = 1e-8);
    }
}
