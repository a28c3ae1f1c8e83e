//! Cross-checks the direct and iterative solvers against each other on the
//! same systems: QR, GMRES, and Conjugate Gradient should all land on
//! (approximately) the same answer.

use approx::assert_abs_diff_eq;

use linalg_kernel::{ConjugateGradient, EigenFrancis, Gmres, Matrix, SparseMatrix};

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
fn gmres_and_cg_agree_with_direct_qr_on_spd_system() {
    let n = 30;
    let sparse = spd_tridiagonal(n);
    let dense = sparse.to_dense();
    let b = Matrix::filled(n, 1, 1.0);

    let qr_x = dense.clone().solve_qr(b.clone());

    let mut gmres = Gmres::new(&sparse, b.clone(), n);
    gmres.set_tolerance(1e-10);
    let (gmres_x, _residual) = gmres.solve(Matrix::new(n, 1));

    let mut cg = ConjugateGradient::new(&sparse, b.clone());
    cg.set_tolerance(1e-10);
    cg.compute();

    for i in 0..n {
        assert_abs_diff_eq!(qr_x.get(i, 0), gmres_x.get(i, 0), epsilon = 1e-5);
        assert_abs_diff_eq!(qr_x.get(i, 0), cg.answer().get(i, 0), epsilon = 1e-5);
    }
}

#[test]
fn francis_eigenvalues_of_spd_matrix_are_all_positive() {
    let n = 12;
    let sparse = spd_tridiagonal(n);
    let dense = sparse.to_dense();

    let mut francis = EigenFrancis::new();
    francis.calc_eigenvalues_general(dense);

    assert_eq!(francis.eigenvalues().len(), n);
    for pair in francis.eigenvalues() {
        assert!(pair.is_real());
        assert!(pair.real > 0.0, "SPD matrix must have strictly positive eigenvalues");
    }
}

#[test]
fn francis_eigenvalues_sum_to_trace() {
    let n = 8;
    let sparse = spd_tridiagonal(n);
    let dense = sparse.to_dense();
    let trace: f64 = (0..n).map(|i| dense.get(i, i)).sum();

    let mut francis = EigenFrancis::new();
    francis.calc_eigenvalues_general(dense);
    let sum: f64 = francis.eigenvalues().iter().map(|p| p.real).sum();

    assert_abs_diff_eq!(sum, trace, epsilon = 1e-6);
}
