//! Similarity reduction to upper Hessenberg form, the standard precursor to
//! the Francis QR eigenvalue engine.

use crate::base::Matrix;

use super::householder::{apply_left, apply_right, build_reflector};

impl Matrix {
    /// Reduces `self` in place to `H = P^T self P` for some orthogonal `P`,
    /// where `H` is upper Hessenberg (zero below the first subdiagonal).
    /// Eigenvalues are preserved by construction since each step is an
    /// orthogonal similarity transform.
    pub fn hessenberg_similarity(&mut self) {
        let n = self.rows();
        assert_eq!(self.cols(), n, "hessenberg_similarity: matrix must be square");
        if n < 3 {
            return;
        }
        for k in 0..(n - 2) {
            let sub_len = n - k - 1;
            let x: Vec<f64> = (0..sub_len).map(|i| self.get(k + 1 + i, k)).collect();
            let refl = build_reflector(&x);
            if refl.beta == 0.0 {
                continue;
            }
            apply_left(self, k + 1, n, k, n, &refl.v, refl.beta);
            apply_right(self, 0, n, k + 1, n, &refl.v, refl.beta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn hessenberg_zeros_below_first_subdiagonal() {
        let mut a = Matrix::from_row_major(
            4,
            4,
            &[
                4.0, 1.0, -2.0, 2.0, 1.0, 2.0, 0.0, 1.0, -2.0, 0.0, 3.0, -2.0, 2.0, 1.0, -2.0, -1.0,
            ],
        );
        a.hessenberg_similarity();
        for i in 0..4 {
            for j in 0..4 {
                if i > j + 1 {
                    assert_abs_diff_eq!(a.get(i, j), 0.0, epsilon = 1e-8);
                }
            }
        }
    }

    #[test]
    fn hessenberg_preserves_trace() {
        let mut a = Matrix::from_row_major(3, 3, &[2.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 2.0]);
        let trace_before: f64 = (0..3).map(|i| a.get(i, i)).sum();
        a.hessenberg_similarity();
        let trace_after: f64 = (0..3).map(|i| a.get(i, i)).sum();
        assert_abs_diff_eq!(trace_before, trace_after, epsilon = 1e-8);
    }
}
