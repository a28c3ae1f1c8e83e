//! Conjugate Gradient for symmetric positive-definite sparse systems: the
//! classic three-term recurrence, no restarts, no basis storage.

use crate::base::Matrix;
use crate::sparse::SparseMatrix;
use crate::MACH_EPS;

/// Conjugate Gradient solver over a sparse, symmetric positive-definite `A`.
pub struct ConjugateGradient<'a> {
    a: &'a SparseMatrix,
    b: Matrix,
    x: Matrix,
    r: Matrix,
    p: Matrix,
    rho: f64,
    rho_minus: f64,
    halt: f64,
    step_count: usize,
}

impl<'a> ConjugateGradient<'a> {
    pub fn new(a: &'a SparseMatrix, b: Matrix) -> Self {
        let halt = MACH_EPS * b.vec_magnitude();
        let mut cg = ConjugateGradient {
            a,
            b,
            x: Matrix::new(1, 1),
            r: Matrix::new(1, 1),
            p: Matrix::new(1, 1),
            rho: 0.0,
            rho_minus: 0.0,
            halt,
            step_count: 0,
        };
        cg.reset();
        cg
    }

    pub fn set_tolerance(&mut self, halt: f64) {
        self.halt = halt;
    }

    /// Residual norm `sqrt(rho) = ||b - A x||`.
    pub fn residual(&self) -> f64 {
        self.rho.sqrt()
    }

    pub fn answer(&self) -> &Matrix {
        &self.x
    }

    /// Resets the iterate to `x = b` (the source's starting guess, not the
    /// zero vector) and recomputes the residual.
    pub fn reset(&mut self) {
        self.x = self.b.clone();
        self.x.copy();
        let ax = self.a * &self.x;
        self.r = &self.b - &ax;
        self.rho = self.r.vec_dot_t();
        self.rho_minus = 0.0;
        self.step_count = 0;
    }

    /// Runs steps until the residual norm drops below the tolerance or the
    /// dimension-bounded iteration budget (`rows(A) - 1` steps) is spent.
    pub fn compute(&mut self) {
        let n = self.a.rows();
        let budget = n.saturating_sub(1);
        let mut i = 0;
        while i < budget && self.halt < self.rho.sqrt() {
            self.step();
            i += 1;
        }
    }

    pub fn step(&mut self) {
        if self.step_count == 0 {
            self.p = self.r.clone();
            self.p.copy();
        } else {
            let tau = self.rho / self.rho_minus;
            self.p = &self.r + &(tau * &self.p);
        }
        let w = self.a * &self.p;
        let mu = self.rho / self.p.vec_dot(&w);
        self.x = &self.x + &(mu * &self.p);
        self.r = &self.r - &(mu * &w);
        self.rho_minus = self.rho;
        self.rho = self.r.vec_dot_t();
        self.step_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn spd_tridiagonal(n: usize) -> SparseMatrix {
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
    fn converges_on_spd_system() {
        let n = 20;
        let a = spd_tridiagonal(n);
        let b = Matrix::filled(n, 1, 1.0);
        let mut cg = ConjugateGradient::new(&a, b.clone());
        cg.set_tolerance(1e-10);
        cg.compute();
        let ax = &a * cg.answer();
        let residual = (&ax - &b).vec_magnitude();
        assert_abs_diff_eq!(residual, 0.0, epsilon = 1e-6);
    }
}
