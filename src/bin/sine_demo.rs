//! Fits `sin(x)` with a small fixed-basis model via the Levenberg-Marquardt
//! harness in `linalg_kernel::nn`, demonstrating that the core's `Matrix` +
//! `solve_symmetric`/`solve_qr` surface is sufficient to drive an external
//! optimizer. Not a neural-network library — see `nn::Trainable`.

use clap::Parser;

use linalg_kernel::nn::{Example, LevenbergMarquardt, Trainable};
use linalg_kernel::Matrix;

#[derive(Parser)]
#[command(about = "Fit sin(x) with a small fixed-basis model")]
struct Args {
    /// Number of training samples over [0, 2*pi).
    #[arg(short = 's', long, default_value_t = 64)]
    samples: usize,

    /// Maximum Levenberg-Marquardt steps.
    #[arg(short = 'm', long, default_value_t = 50)]
    max_steps: usize,
}

/// y = w0*sin(x) + w1*sin(3x) + w2*sin(5x), a 3-weight odd-harmonic model.
struct HarmonicModel {
    weights: Matrix,
}

impl HarmonicModel {
    fn basis(x: f64) -> [f64; 3] {
        [x.sin(), (3.0 * x).sin(), (5.0 * x).sin()]
    }
}

impl Trainable for HarmonicModel {
    fn weights(&self) -> &Matrix {
        &self.weights
    }

    fn set_weights(&mut self, weights: Matrix) {
        self.weights = weights;
    }

    fn forward(&self, input: &Matrix) -> Matrix {
        let basis = Self::basis(input.get(0, 0));
        let y = (0..3).map(|i| self.weights.get(i, 0) * basis[i]).sum();
        Matrix::filled(1, 1, y)
    }

    fn backprop(&self, input: &Matrix, target: &Matrix) -> (f64, Matrix) {
        let basis = Self::basis(input.get(0, 0));
        let prediction = self.forward(input).get(0, 0);
        let residual = prediction - target.get(0, 0);
        let mut gradient = Matrix::new(3, 1);
        for i in 0..3 {
            gradient.set(i, 0, basis[i]);
        }
        (residual, gradient)
    }

    fn reduce_loss(&self, dataset: &[Example]) -> f64 {
        dataset
            .iter()
            .map(|(input, target)| {
                let (r, _) = self.backprop(input, target);
                r * r
            })
            .sum::<f64>()
            / dataset.len() as f64
    }
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let dataset: Vec<Example> = (0..args.samples)
        .map(|i| {
            let x = 2.0 * std::f64::consts::PI * i as f64 / args.samples as f64;
            (Matrix::filled(1, 1, x), Matrix::filled(1, 1, x.sin()))
        })
        .collect();

    let mut model = HarmonicModel {
        weights: Matrix::new(3, 1),
    };
    let trainer = LevenbergMarquardt::new(1e-4, args.max_steps);

    match trainer.train(&mut model, &dataset) {
        Ok(loss) => {
            println!("METRICS loss={loss}");
            println!(
                "WEIGHTS w0={} w1={} w2={}",
                model.weights.get(0, 0),
                model.weights.get(1, 0),
                model.weights.get(2, 0)
            );
        }
        Err(e) => eprintln!("training failed: {e}"),
    }
}
