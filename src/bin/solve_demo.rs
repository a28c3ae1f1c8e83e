//! Builds a random diagonally-dominant sparse system and solves it with
//! GMRES, reporting restarts and residual. A thin CLI wrapper around
//! `linalg_kernel::{Gmres, SparseMatrix}` — not part of the library surface.

use clap::Parser;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use linalg_kernel::{Gmres, Matrix, SparseMatrix};

#[derive(Parser)]
#[command(about = "Solve a random sparse system with restarted GMRES")]
struct Args {
    /// System size.
    #[arg(long, default_value_t = 200)]
    size: usize,

    /// Krylov subspace dimension per restart cycle.
    #[arg(short = 'm', long, default_value_t = 20)]
    krylov_dim: usize,

    /// PRNG seed, for reproducible demo runs.
    #[arg(short = 's', long, default_value_t = 1)]
    seed: u64,
}

fn build_system(n: usize, rng: &mut impl Rng) -> (SparseMatrix, Matrix) {
    let sample_range = Uniform::new(1.0, 100.0);
    let rhs_range = Uniform::new(0.0, 5.0);

    let mut a = SparseMatrix::new(n, n);
    for i in 0..n {
        let band: u32 = rng.gen_range(0..3);
        let start = i.saturating_sub(band as usize);
        let end = (i + band as usize + 1).min(n);
        for j in start..end {
            let sample = sample_range.sample(rng);
            let value = if j == i { 4.0 * sample } else { sample };
            a.push(i, j, value);
        }
    }
    let mut b = Matrix::new(n, 1);
    for i in 0..n {
        b.set(i, 0, rhs_range.sample(rng));
    }
    (a, b)
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let (a, b) = build_system(args.size, &mut rng);
    let x0 = Matrix::new(args.size, 1);

    let mut gmres = Gmres::new(&a, b.clone(), args.krylov_dim);
    gmres.set_tolerance(1e-8);
    let (x, residual) = gmres.solve(x0);

    let ax = &a * &x;
    let true_residual = (&ax - &b).vec_magnitude();

    println!("RESTARTS {}", gmres.get_iterations());
    println!("RESIDUAL {residual}");
    println!("TRUE_RESIDUAL {true_residual}");
}
