//! Householder reflector construction and application, shared by QR,
//! Hessenberg reduction, and the Francis engine's bulge introduction/chase
//! (all four boil down to "build a reflector that zeros everything below
//! the first entry of a short vector, then apply it to a sub-block").

use crate::base::Matrix;

pub(crate) struct Reflector {
    pub v: Vec<f64>,
    pub beta: f64,
}

/// Builds the reflector `I - beta * v * v^T` that zeros `x[1..]` when
/// applied to `x`. The sign of `v[0]` is chosen to match the sign of `x[0]`
/// so that `v[0]` grows rather than cancels, per GVL4 §5.1.
pub(crate) fn build_reflector(x: &[f64]) -> Reflector {
    let mut v = x.to_vec();
    let norm: f64 = x.iter().map(|xi| xi * xi).sum::<f64>().sqrt();
    if norm == 0.0 {
        return Reflector { v, beta: 0.0 };
    }
    if v[0] >= 0.0 {
        v[0] += norm;
    } else {
        v[0] -= norm;
    }
    let vtv: f64 = v.iter().map(|vi| vi * vi).sum();
    let beta = if vtv == 0.0 { 0.0 } else { 2.0 / vtv };
    Reflector { v, beta }
}

/// Applies `(I - beta * v * v^T)` from the left to the sub-block
/// `a[row_start..row_end, col_start..col_end]`, i.e. `A' = (I - beta v v^T) A`
/// restricted to that window. `v.len() == row_end - row_start`.
pub(crate) fn apply_left(
    a: &mut Matrix,
    row_start: usize,
    row_end: usize,
    col_start: usize,
    col_end: usize,
    v: &[f64],
    beta: f64,
) {
    debug_assert_eq!(v.len(), row_end - row_start);
    for c in col_start..col_end {
        let s: f64 = (row_start..row_end)
            .map(|r| v[r - row_start] * a.get(r, c))
            .sum();
        let coeff = beta * s;
        for r in row_start..row_end {
            let updated = a.get(r, c) - coeff * v[r - row_start];
            a.set(r, c, updated);
        }
    }
}

/// Applies `(I - beta * v * v^T)` from the right to the sub-block
/// `a[row_start..row_end, col_start..col_end]`, i.e. `A' = A (I - beta v v^T)`
/// restricted to that window. `v.len() == col_end - col_start`.
pub(crate) fn apply_right(
    a: &mut Matrix,
    row_start: usize,
    row_end: usize,
    col_start: usize,
    col_end: usize,
    v: &[f64],
    beta: f64,
) {
    debug_assert_eq!(v.len(), col_end - col_start);
    for r in row_start..row_end {
        let s: f64 = (col_start..col_end)
            .map(|c| v[c - col_start] * a.get(r, c))
            .sum();
        let coeff = beta * s;
        for c in col_start..col_end {
            let updated = a.get(r, c) - coeff * v[c - col_start];
            a.set(r, c, updated);
        }
    }
}
