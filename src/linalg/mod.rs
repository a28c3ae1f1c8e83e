//! Direct dense kernels: Householder QR, Cholesky, Hessenberg reduction, and
//! back-substitution. Each is an `impl Matrix` block in its own file; this
//! module just wires them together and keeps the shared reflector machinery
//! private to the crate.

mod cholesky;
mod hessenberg;
pub(crate) mod householder;
mod qr;
mod substitution;
