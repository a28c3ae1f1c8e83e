//! Value-typed, column-major dense matrix with copy-on-write sharing.
//!
//! See the crate-level docs and `SPEC_FULL.md` §3/§4.1 for the full data
//! model. In short: every `Matrix` is a `(rows, cols, prows, offset)` window
//! onto a shared [`Buffer`]. `Clone` aliases the buffer (matching the
//! source's copy constructor) rather than deep-copying — call [`Matrix::copy`]
//! after cloning when an independent buffer is actually wanted.

use std::rc::Rc;

use rand::Rng;

use super::buffer::{buffer_from_vec, is_exclusive, new_buffer, Buffer};

/// Whether a write through this matrix materializes a private buffer first
/// (`CopyOnWrite`) or mutates shared storage directly (`WriteInPlace`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    CopyOnWrite,
    WriteInPlace,
}

#[derive(Debug)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    prows: usize,
    offset: usize,
    policy: Policy,
    buffer: Rc<Buffer>,
}

impl Clone for Matrix {
    /// Aliases the same buffer as `self`, defaulting to copy-on-write. This
    /// mirrors the source's value-semantics copy constructor: `let b =
    /// a.clone();` is cheap and `b` only diverges from `a` on its first
    /// write. Call [`Matrix::copy`] immediately after cloning to force an
    /// unshared buffer instead.
    fn clone(&self) -> Self {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            prows: self.prows,
            offset: self.offset,
            policy: Policy::CopyOnWrite,
            buffer: Rc::clone(&self.buffer),
        }
    }
}

impl Matrix {
    /// `rows x cols` matrix, zero-initialized (the source leaves this
    /// undefined; zeroing is the safe Rust default with no `unsafe`).
    pub fn new(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            prows: rows,
            offset: 0,
            policy: Policy::WriteInPlace,
            buffer: new_buffer(rows * cols),
        }
    }

    /// `rows x cols` matrix with every element set to `fill`.
    pub fn filled(rows: usize, cols: usize, fill: f64) -> Self {
        let mut m = Matrix::new(rows, cols);
        {
            let mut data = m.buffer.borrow_mut();
            data.iter_mut().for_each(|x| *x = fill);
        }
        m
    }

    /// Zero matrix with `diag` on the main diagonal (the `(rows, cols, diag,
    /// zero=true)` constructor form from the spec).
    pub fn diagonal(rows: usize, cols: usize, diag: f64) -> Self {
        let mut m = Matrix::new(rows, cols);
        for i in 0..rows.min(cols) {
            m.set(i, i, diag);
        }
        m
    }

    /// Identity matrix of size `n`.
    pub fn identity(n: usize) -> Self {
        Matrix::diagonal(n, n, 1.0)
    }

    /// Adopts a flat, row-major `data` slice of length `rows * cols`,
    /// converting it into this matrix's native column-major layout.
    pub fn from_row_major(rows: usize, cols: usize, data: &[f64]) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "from_row_major: data length does not match rows * cols"
        );
        let mut flat = vec![0.0; rows * cols];
        for i in 0..rows {
            for j in 0..cols {
                flat[j * rows + i] = data[i * cols + j];
            }
        }
        Matrix {
            rows,
            cols,
            prows: rows,
            offset: 0,
            policy: Policy::WriteInPlace,
            buffer: buffer_from_vec(flat),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn prows(&self) -> usize {
        self.prows
    }

    pub fn pcols(&self) -> usize {
        self.buffer.len() / self.prows
    }

    fn linear_index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.rows && j < self.cols, "matrix index out of bounds");
        self.offset + j * self.prows + i
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.buffer.get(self.linear_index(i, j))
    }

    /// Writes `value` at `(i, j)`, materializing a private buffer first if
    /// this matrix is copy-on-write and the buffer is currently shared.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.ensure_writable();
        let idx = self.linear_index(i, j);
        self.buffer.set(idx, value);
    }

    /// Forces this matrix onto a private, unshared buffer if it is
    /// copy-on-write and currently aliased. A no-op for write-in-place
    /// matrices or matrices that are already the sole referrer.
    fn ensure_writable(&mut self) {
        if self.policy == Policy::WriteInPlace {
            return;
        }
        if is_exclusive(&self.buffer) {
            return;
        }
        self.materialize();
    }

    fn materialize(&mut self) {
        let mut flat = Vec::with_capacity(self.rows * self.cols);
        for j in 0..self.cols {
            for i in 0..self.rows {
                flat.push(self.get(i, j));
            }
        }
        self.buffer = buffer_from_vec(flat);
        self.prows = self.rows;
        self.offset = 0;
    }

    /// Forces an unshared buffer right now, regardless of policy. The Rust
    /// analogue of the source's `copy()` used after an aliasing assignment
    /// when independence is wanted immediately rather than on first write.
    pub fn copy(&mut self) {
        if is_exclusive(&self.buffer) {
            // Still must strip any window offset/stride so the private
            // buffer is exactly rows x cols, matching `materialize`'s
            // postcondition.
            if self.offset == 0 && self.prows == self.rows && self.pcols() == self.cols {
                return;
            }
        }
        self.materialize();
    }

    pub fn set_cow(&mut self) {
        self.policy = Policy::CopyOnWrite;
    }

    pub fn set_wip(&mut self) {
        self.policy = Policy::WriteInPlace;
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// True iff this matrix is the sole referrer of its buffer.
    pub fn is_exclusive(&self) -> bool {
        is_exclusive(&self.buffer)
    }

    /// A `r x c` window onto this matrix's buffer starting at `(i, j)`,
    /// defaulting to copy-on-write unless `write_in_place` is `true`.
    pub fn view(&self, i: usize, j: usize, r: usize, c: usize, write_in_place: bool) -> Matrix {
        assert!(
            i + r <= self.rows && j + c <= self.cols,
            "view window out of bounds"
        );
        Matrix {
            rows: r,
            cols: c,
            prows: self.prows,
            offset: self.offset + j * self.prows + i,
            policy: if write_in_place {
                Policy::WriteInPlace
            } else {
                Policy::CopyOnWrite
            },
            buffer: Rc::clone(&self.buffer),
        }
    }

    /// A single-column view (write-in-place — column views are almost always
    /// used to fill in place by the Krylov and QR kernels).
    pub fn vec_view(&self, col: usize) -> Matrix {
        self.view(0, col, self.rows, 1, true)
    }

    /// Expands the logical shape back out to the full physical `(prows,
    /// pcols)` extent of the underlying buffer, at offset zero.
    pub fn view_original(&self) -> Matrix {
        Matrix {
            rows: self.prows,
            cols: self.pcols(),
            prows: self.prows,
            offset: 0,
            policy: self.policy,
            buffer: Rc::clone(&self.buffer),
        }
    }

    /// Copies `src`'s elements into `self`'s window without disturbing
    /// `src`'s sharing topology. Shapes must match exactly.
    pub fn pipe(&mut self, src: &Matrix) {
        assert_eq!(self.rows, src.rows, "pipe: row count mismatch");
        assert_eq!(self.cols, src.cols, "pipe: column count mismatch");
        for j in 0..self.cols {
            for i in 0..self.rows {
                self.set(i, j, src.get(i, j));
            }
        }
    }

    pub fn transpose(&self) -> Matrix {
        let mut t = Matrix::new(self.cols, self.rows);
        for j in 0..self.cols {
            for i in 0..self.rows {
                t.set(j, i, self.get(i, j));
            }
        }
        t
    }

    /// True iff shapes match and every entry differs by strictly less than
    /// `eps` in absolute value.
    pub fn equal_eps(&self, other: &Matrix, eps: f64) -> bool {
        if self.rows != other.rows || self.cols != other.cols {
            return false;
        }
        for j in 0..self.cols {
            for i in 0..self.rows {
                if (self.get(i, j) - other.get(i, j)).abs() >= eps {
                    return false;
                }
            }
        }
        true
    }

    /// L2 norm of a column vector.
    pub fn vec_magnitude(&self) -> f64 {
        assert_eq!(self.cols, 1, "vec_magnitude: not a column vector");
        self.vec_dot_t().sqrt()
    }

    /// Dot product of two column vectors.
    pub fn vec_dot(&self, other: &Matrix) -> f64 {
        assert_eq!(self.cols, 1, "vec_dot: not a column vector");
        assert_eq!(other.cols, 1, "vec_dot: not a column vector");
        assert_eq!(self.rows, other.rows, "vec_dot: length mismatch");
        (0..self.rows).map(|i| self.get(i, 0) * other.get(i, 0)).sum()
    }

    /// `self . self`.
    pub fn vec_dot_t(&self) -> f64 {
        (0..self.rows).map(|i| self.get(i, 0) * self.get(i, 0)).sum()
    }

    /// Normalizes this column vector in place and returns it.
    pub fn vec_norm(mut self) -> Self {
        let mag = self.vec_magnitude();
        if mag != 0.0 {
            for i in 0..self.rows {
                let v = self.get(i, 0) / mag;
                self.set(i, 0, v);
            }
        }
        self
    }

    /// Max absolute row sum.
    pub fn norm_inf(&self) -> f64 {
        let mut best = 0.0_f64;
        for i in 0..self.rows {
            let sum: f64 = (0..self.cols).map(|j| self.get(i, j).abs()).sum();
            if sum > best {
                best = sum;
            }
        }
        best
    }

    /// Fills every entry with `scale * U[0, 1)` drawn from `rng`.
    pub fn randomly_fill(&mut self, scale: f64, rng: &mut impl Rng) {
        self.ensure_writable();
        for j in 0..self.cols {
            for i in 0..self.rows {
                let sample: f64 = rng.gen();
                self.set(i, j, scale * sample);
            }
        }
    }

    /// Read-only flat access to the underlying buffer at this matrix's
    /// physical stride (`prows`) and `offset`, for kernels that index the
    /// storage directly (e.g. the Francis bulge-chase).
    pub fn raw(&self) -> std::cell::Ref<'_, Vec<f64>> {
        self.buffer.borrow()
    }

    /// Mutable flat access to the underlying buffer, materializing first if
    /// this matrix is copy-on-write and shared.
    pub fn raw_mut(&mut self) -> std::cell::RefMut<'_, Vec<f64>> {
        self.ensure_writable();
        self.buffer.borrow_mut()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn display(&self, name: &str, decimals: usize) -> String {
        let mut out = String::new();
        out.push_str(name);
        out.push_str(":\n");
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.push_str(&format!("{:.*}\t", decimals, self.get(i, j)));
            }
            out.push('\n');
        }
        out
    }
}

impl PartialEq for Matrix {
    /// Exact equality: same shape and every entry bit-for-bit equal.
    fn eq(&self, other: &Self) -> bool {
        if self.rows != other.rows || self.cols != other.cols {
            return false;
        }
        for j in 0..self.cols {
            for i in 0..self.rows {
                if self.get(i, j) != other.get(i, j) {
                    return false;
                }
            }
        }
        true
    }
}
