//! A real or complex-conjugate eigenvalue, and the heap-sort used to order
//! a batch of them by modulus.

/// One eigenvalue. `imag == 0.0` for a real eigenvalue; complex eigenvalues
/// always arrive as a conjugate pair (`real`, `imag`) and (`real`, `-imag`)
/// out of [`super::engine::EigenFrancis`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenPair {
    pub real: f64,
    pub imag: f64,
}

impl EigenPair {
    pub fn modulus(&self) -> f64 {
        (self.real * self.real + self.imag * self.imag).sqrt()
    }

    pub fn is_real(&self) -> bool {
        self.imag == 0.0
    }
}

/// Sorts `values` in place, ascending by modulus, via an in-place binary
/// heap build-and-extract — the same two-phase shape as a textbook heap
/// sort rather than a call out to a library sort.
pub fn sort_eigenvalues(values: &mut [EigenPair]) {
    let len = values.len();
    if len < 2 {
        return;
    }
    for start in (0..len / 2).rev() {
        sift_down(values, start, len);
    }
    for end in (1..len).rev() {
        values.swap(0, end);
        sift_down(values, 0, end);
    }
}

fn sift_down(values: &mut [EigenPair], mut root: usize, len: usize) {
    loop {
        let mut child = 2 * root + 1;
        if child >= len {
            break;
        }
        if child + 1 < len && values[child + 1].modulus() > values[child].modulus() {
            child += 1;
        }
        if values[root].modulus() >= values[child].modulus() {
            break;
        }
        values.swap(root, child);
        root = child;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_ascending_by_modulus() {
        let mut values = vec![
            EigenPair { real: 3.0, imag: 0.0 },
            EigenPair { real: 0.0, imag: 1.0 },
            EigenPair { real: -5.0, imag: 0.0 },
            EigenPair { real: 0.5, imag: 0.0 },
        ];
        sort_eigenvalues(&mut values);
        let moduli: Vec<f64> = values.iter().map(|v| v.modulus()).collect();
        for w in moduli.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }
}
