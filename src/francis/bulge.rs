//! Bulge introduction and the chase that restores Hessenberg form after it.
//!
//! Both operations are the same Householder reflector machinery the direct
//! kernels use (see `linalg::householder`), just windowed to the 2-3 row
//! band the implicit double shift touches at each step.

use crate::base::Matrix;
use crate::linalg::householder::{apply_left, apply_right, build_reflector};

/// Introduces the initial bulge from the length-2-or-3 shift vector `x`
/// computed by the double-shift formula, at the top-left of `a`.
pub(super) fn apply_bulge(a: &mut Matrix, x: &[f64]) {
    let n = a.rows();
    let halt = x.len().min(n);
    let refl = build_reflector(&x[..halt]);
    if refl.beta == 0.0 {
        return;
    }
    apply_left(a, 0, halt, 0, n, &refl.v, refl.beta);
    apply_right(a, 0, n, 0, halt, &refl.v, refl.beta);
}

/// One step of the bulge chase: re-Hessenbergizes the 2-3 row window
/// starting just below `step`'s diagonal, pushing whatever bulge remains
/// one step further down the subdiagonal band.
fn raw_step(a: &mut Matrix, step: usize) {
    let n = a.rows();
    let start = step + 1;
    let halt = (start + 3).min(n);
    if start >= halt {
        return;
    }
    let x: Vec<f64> = (start..halt).map(|i| a.get(i, step)).collect();
    let refl = build_reflector(&x);
    if refl.beta == 0.0 {
        return;
    }
    apply_left(a, start, halt, step, n, &refl.v, refl.beta);
    apply_right(a, 0, n, start, halt, &refl.v, refl.beta);
}

/// Chases the bulge `apply_bulge` introduced all the way down to the
/// bottom-right corner, restoring upper-Hessenberg form.
pub(super) fn chase_bulge(a: &mut Matrix) {
    let n = a.rows();
    if n < 3 {
        return;
    }
    let runs = n - 2;
    for step in 0..runs {
        raw_step(a, step);
    }
}
