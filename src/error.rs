//! Recoverable error types.
//!
//! Dimension mismatches and other precondition violations are programming
//! errors and stay as `panic!`/`assert!` at the call site (see the `base`
//! module) — they are never represented here. This module only covers
//! numerical outcomes a caller is expected to branch on.

use thiserror::Error;

/// Errors surfaced by the optional neural-network consumer when a training
/// step produces a non-finite update. The core solvers themselves report
/// numerical breakdown through `bool`/`Option` returns (`Matrix::solve_symmetric`'s
/// `bool` and the Arnoldi breakdown index) since those are checked immediately
/// by the caller rather than propagated across a retry boundary.
#[derive(Debug, Error, PartialEq)]
pub enum TrainingError {
    #[error("update step produced a non-finite weight vector")]
    DivergedUpdate,
    #[error("Jacobian system had no solution (Cholesky and QR fallback both failed)")]
    UnsolvableNormalEquations,
}
