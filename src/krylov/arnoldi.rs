//! The shared Arnoldi base: builds an orthonormal basis `Q` of the Krylov
//! subspace and the Hessenberg projection `H` with `A Q_m = Q_{m+1} H`, via
//! modified Gram-Schmidt. Restartable — [`KrylovState::restart`] reseeds
//! from a fresh vector without reallocating the caller's reference to `A`.

use crate::base::Matrix;
use crate::sparse::SparseMatrix;

pub(crate) struct KrylovState<'a> {
    pub(crate) a: &'a SparseMatrix,
    pub(crate) h: Matrix,
    pub(crate) q: Matrix,
    pub(crate) e1: Matrix,
    pub(crate) n: usize,
    pub(crate) i: usize,
}

impl<'a> KrylovState<'a> {
    pub(crate) fn new(a: &'a SparseMatrix) -> Self {
        KrylovState {
            a,
            h: Matrix::new(1, 1),
            q: Matrix::new(a.rows(), 1),
            e1: Matrix::new(1, 1),
            n: 0,
            i: 0,
        }
    }

    /// Reseeds the Krylov basis from `x0`, sized for up to `n` further
    /// Arnoldi steps.
    pub(crate) fn restart(&mut self, x0: &Matrix, n: usize) {
        let rows = x0.rows();
        self.h = Matrix::new(n + 1, n);
        self.q = Matrix::new(rows, n + 1);
        self.e1 = Matrix::new(n + 1, 1);

        let bnorm = x0.vec_magnitude();
        let mut v0 = self.q.vec_view(0);
        v0.pipe(x0);
        if bnorm != 0.0 {
            for r in 0..rows {
                let scaled = v0.get(r, 0) / bnorm;
                v0.set(r, 0, scaled);
            }
        }
        self.e1.set(0, 0, bnorm);
        self.n = n;
        self.i = 0;
    }

    /// Runs up to `runs` further modified Gram-Schmidt Arnoldi steps
    /// (capped at the `n` passed to the last `restart`), stopping early on
    /// a breakdown (a Krylov vector of numerically zero norm, meaning the
    /// subspace already spans an invariant subspace of `A`). Returns the
    /// total number of steps completed since the last restart, which the
    /// caller compares against what it asked for to detect that breakdown.
    pub(crate) fn run_arnoldi(&mut self, runs: usize) -> usize {
        let target = (self.i + runs).min(self.n);
        while self.i < target {
            let k = self.i;
            let vk = self.q.vec_view(k);
            let mut w = self.a * &vk;
            for j in 0..=k {
                let vj = self.q.vec_view(j);
                let alpha = vj.vec_dot(&w);
                self.h.set(j, k, alpha);
                for r in 0..w.rows() {
                    let updated = w.get(r, 0) - alpha * vj.get(r, 0);
                    w.set(r, 0, updated);
                }
            }
            let norm = w.vec_magnitude();
            self.h.set(k + 1, k, norm);
            self.i += 1;
            if norm.abs() < 1e-14 {
                break;
            }
            let mut vnext = self.q.vec_view(k + 1);
            for r in 0..w.rows() {
                vnext.set(r, 0, w.get(r, 0) / norm);
            }
        }
        self.i
    }

    /// `max |I - Q_m^T Q_m|`, a cheap orthogonality diagnostic over the `i`
    /// basis vectors built so far.
    #[allow(dead_code)]
    pub(crate) fn orthogonality_defect(&self) -> f64 {
        if self.i == 0 {
            return 0.0;
        }
        let qm = self.q.view(0, 0, self.q.rows(), self.i, false);
        let gram = &qm.transpose() * &qm;
        let mut worst = 0.0_f64;
        for j in 0..self.i {
            for r in 0..self.i {
                let expected = if r == j { 1.0 } else { 0.0 };
                worst = worst.max((gram.get(r, j) - expected).abs());
            }
        }
        worst
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn tridiagonal(n: usize) -> SparseMatrix {
        let mut a = SparseMatrix::new(n, n);
        for i in 0..n {
            if i > 0 {
                a.push(i, i - 1, -1.0);
            }
            a.push(i, i, 2.0);
            if i + 1 < n {
                a.push(i, i + 1, -1.0);
            }
        }
        a
    }

    #[test]
    fn arnoldi_basis_is_orthonormal() {
        let a = tridiagonal(6);
        let mut state = KrylovState::new(&a);
        let b = Matrix::from_row_major(6, 1, &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        state.restart(&b, 4);
        let completed = state.run_arnoldi(4);
        assert_eq!(completed, 4);
        assert_abs_diff_eq!(state.orthogonality_defect(), 0.0, epsilon = 1e-8);
    }

    #[test]
    fn arnoldi_detects_breakdown_on_invariant_subspace() {
        // e_0 is an eigenvector of the identity matrix: A v0 = v0 exactly,
        // so the second Krylov vector has zero residual norm.
        let mut a = SparseMatrix::new(3, 3);
        for i in 0..3 {
            a.push(i, i, 1.0);
        }
        let mut state = KrylovState::new(&a);
        let b = Matrix::from_row_major(3, 1, &[1.0, 0.0, 0.0]);
        state.restart(&b, 3);
        let completed = state.run_arnoldi(3);
        assert!(completed < 3);
    }
}
