//! The Francis engine proper: Hessenberg reduction, implicit double-shift
//! QR iteration, deflation, and inverse iteration for real eigenvectors.

use crate::base::Matrix;
use crate::MACH_EPS;

use super::bulge::{apply_bulge, chase_bulge};
use super::eigenpair::{sort_eigenvalues, EigenPair};

/// Accumulates the eigenvalues of one matrix (or a family of deflated
/// sub-blocks of it) and the total count of Francis sweeps it took.
#[derive(Debug, Default)]
pub struct EigenFrancis {
    eigenvalues: Vec<EigenPair>,
    total_iterations: u64,
}

impl EigenFrancis {
    pub fn new() -> Self {
        EigenFrancis::default()
    }

    pub fn eigenvalues(&self) -> &[EigenPair] {
        &self.eigenvalues
    }

    pub fn n_iterations(&self) -> u64 {
        self.total_iterations
    }

    /// Reduces `a` to upper Hessenberg form, then finds all its eigenvalues.
    /// `a` is consumed — it becomes scratch space for the whole run.
    pub fn calc_eigenvalues_general(&mut self, mut a: Matrix) {
        a.hessenberg_similarity();
        self.calc_eigenvalues_hessenberg(a);
    }

    /// Finds all eigenvalues of `a`, which must already be upper Hessenberg.
    pub fn calc_eigenvalues_hessenberg(&mut self, mut a: Matrix) {
        assert_eq!(a.rows(), a.cols(), "calc_eigenvalues_hessenberg: matrix must be square");
        tracing::debug!(rows = a.rows(), "starting francis iteration");
        a.set_wip();
        self.eigenvalues.clear();
        self.total_iterations = 0;
        self.deflate(a);
        tracing::debug!(
            eigenvalues = self.eigenvalues.len(),
            sweeps = self.total_iterations,
            "francis iteration converged"
        );
        sort_eigenvalues(&mut self.eigenvalues);
    }

    /// Finds the eigenvalues of `a` directly, without requiring it already
    /// be Hessenberg (a thin convenience alias for `calc_eigenvalues_general`).
    pub fn calc_eigenvalues(&mut self, a: Matrix) {
        self.calc_eigenvalues_general(a);
    }

    /// Repeatedly runs Francis steps on the active window `a`, deflating
    /// converged eigenvalues off its ends and recursing on interior splits,
    /// until every eigenvalue in the window has been extracted.
    fn deflate(&mut self, mut a: Matrix) {
        loop {
            let n = a.rows();
            if n == 0 {
                return;
            }
            if n == 1 {
                self.eigenvalues.push(EigenPair { real: a.get(0, 0), imag: 0.0 });
                return;
            }
            if n == 2 {
                self.eigenvalues.extend_from_slice(&schur_sub_matrix(&a, 0));
                return;
            }

            let last = n - 1;
            let budget = last as u64 + 30;
            let mut local_iter = 0_u64;
            let pivot = loop {
                if let Some(p) = detect_convergence(&mut a) {
                    break Some(p);
                }
                if local_iter == budget {
                    break None;
                }
                francis_step(&mut a, local_iter);
                self.total_iterations += 1;
                local_iter += 1;
            };

            match pivot {
                None => {
                    // Budget exhausted without a clean split; force deflation
                    // of the trailing entry rather than looping forever.
                    self.eigenvalues.push(EigenPair { real: a.get(last, last), imag: 0.0 });
                    a = a.view(0, 0, last, last, true);
                }
                Some(p) if p == last => {
                    self.eigenvalues.push(EigenPair { real: a.get(last, last), imag: 0.0 });
                    a = a.view(0, 0, last, last, true);
                }
                Some(p) if p == last - 1 => {
                    self.eigenvalues.extend_from_slice(&schur_sub_matrix(&a, last - 1));
                    a = a.view(0, 0, last - 1, last - 1, true);
                }
                Some(1) => {
                    self.eigenvalues.push(EigenPair { real: a.get(0, 0), imag: 0.0 });
                    a = a.view(1, 1, n - 1, n - 1, true);
                }
                Some(2) => {
                    self.eigenvalues.extend_from_slice(&schur_sub_matrix(&a, 0));
                    a = a.view(2, 2, n - 2, n - 2, true);
                }
                Some(p) => {
                    let lr = a.view(p, p, n - p, n - p, true);
                    let ul = a.view(0, 0, p, p, true);
                    self.deflate(lr);
                    self.deflate(ul);
                    return;
                }
            }
        }
    }
}

/// Scans the subdiagonal from the bottom up for a negligible entry (zeroing
/// it in place) and returns the row index where the split occurs, or `None`
/// if the window hasn't converged anywhere yet.
fn detect_convergence(a: &mut Matrix) -> Option<usize> {
    let n = a.rows();
    for i in (1..n).rev() {
        let diag = MACH_EPS * (a.get(i, i).abs() + a.get(i - 1, i - 1).abs());
        let sub = a.get(i, i - 1);
        if sub == 0.0 || sub.abs() <= diag {
            a.set(i, i - 1, 0.0);
            return Some(i);
        }
    }
    None
}

/// Eigenvalues of the trailing 2x2 block `a[idx..idx+2, idx..idx+2]`, real
/// or a complex-conjugate pair, via the standard Schur sub-block formula.
fn schur_sub_matrix(a: &Matrix, idx: usize) -> [EigenPair; 2] {
    let aa = a.get(idx, idx);
    let b = a.get(idx, idx + 1);
    let c = a.get(idx + 1, idx);
    let d = a.get(idx + 1, idx + 1);

    let p = (aa - d) / 2.0;
    let bcmax = b.abs().max(c.abs());
    let bcmis = b.abs().min(c.abs()) * b.signum() * c.signum();
    let scale = p.abs().max(bcmax);
    let z = if scale == 0.0 {
        0.0
    } else {
        (p / scale) * p + (bcmax / scale) * bcmis
    };

    if z >= 4.0 * MACH_EPS {
        let z = p + p.signum() * (scale.sqrt() * z.sqrt()).abs();
        let d_new = if z == 0.0 { d } else { d - (bcmax / z) * bcmis };
        let a_new = d_new + z;
        [
            EigenPair { real: d_new, imag: 0.0 },
            EigenPair { real: a_new, imag: 0.0 },
        ]
    } else {
        let bb = -(d + aa);
        let cc = d * aa - b * c;
        let real = -bb / 2.0;
        let imag = (bb * bb - 4.0 * cc).abs().sqrt() / 2.0;
        [
            EigenPair { real, imag },
            EigenPair { real, imag: -imag },
        ]
    }
}

/// One implicit double-shift QR step: builds the length-3 shift vector from
/// the trailing 2x2 block (or an ad hoc exceptional shift every 10th local
/// iteration, to avoid stagnation), introduces the bulge, and chases it.
fn francis_step(a: &mut Matrix, local_iter: u64) {
    let n = a.rows();
    let last = n - 1;

    let (s, t) = if local_iter > 0 && local_iter % 10 == 0 {
        let exceptional = a.get(last, last - 1).abs() + a.get(last - 1, last - 2).abs();
        (2.0 * exceptional, exceptional * exceptional)
    } else {
        let s = a.get(last - 1, last - 1) + a.get(last, last);
        let t = a.get(last - 1, last - 1) * a.get(last, last)
            - a.get(last - 1, last) * a.get(last, last - 1);
        (s, t)
    };

    let a00 = a.get(0, 0);
    let a01 = a.get(0, 1);
    let a10 = a.get(1, 0);
    let a11 = a.get(1, 1);
    let a21 = a.get(2, 1);

    let e1 = [
        a00 * a00 + a01 * a10 - s * a00 + t,
        a10 * (a00 + a11 - s),
        a21 * a10,
    ];

    apply_bulge(a, &e1);
    chase_bulge(a);
}

/// Inverse iteration for a real eigenvalue's eigenvector, starting from an
/// all-ones vector and iterating until the residual `(A - lambda I) u` is
/// within `10 * MACH_EPS * ||A||_inf` in the infinity norm, or the iteration
/// budget (one pass per row) is spent. Returns `None` for a non-finite or
/// complex (`imag != 0`) eigenvalue, or on non-convergence.
pub fn find_eigenvector_real(eigen: &EigenPair, a: &Matrix) -> Option<Matrix> {
    if !eigen.is_real() || eigen.real.is_nan() {
        return None;
    }
    let n = a.rows();
    let halt = 10.0 * MACH_EPS * a.norm_inf();

    let mut shifted = a.clone();
    shifted.copy();
    for i in 0..n {
        let d = shifted.get(i, i) - eigen.real;
        shifted.set(i, i, d);
    }

    let mut u = Matrix::filled(n, 1, 1.0);
    let mut iterations = n;
    loop {
        let x = shifted.solve_b(&u);
        if (0..n).any(|i| x.get(i, 0).is_nan()) {
            return None;
        }
        u = x.vec_norm();

        let residual = &shifted * &u;
        let r_inf = (0..n).map(|i| residual.get(i, 0).abs()).fold(0.0_f64, f64::max);
        if r_inf <= halt {
            return Some(u);
        }
        if iterations == 0 {
            return None;
        }
        iterations -= 1;
    }
}
