//! A thin Levenberg-Marquardt-style training harness, included only to
//! demonstrate that the core's public surface — a Jacobian-shaped `Matrix`,
//! `solve_symmetric`, and its `solve_qr` fallback — is enough to drive an
//! external optimizer. Not a neural-network library: no layers, no
//! backprop-through-a-graph, no activation zoo. A caller supplies those by
//! implementing [`Trainable`] over whatever model it has.

use crate::base::Matrix;
use crate::error::TrainingError;

/// One training example: an input vector and the target output it should
/// produce.
pub type Example = (Matrix, Matrix);

/// A model the harness can fit: a weight vector plus a forward pass and a
/// per-example residual/gradient.
pub trait Trainable {
    fn weights(&self) -> &Matrix;
    fn set_weights(&mut self, weights: Matrix);
    fn forward(&self, input: &Matrix) -> Matrix;
    /// The scalar residual (prediction minus target) and its gradient with
    /// respect to every weight, for one example.
    fn backprop(&self, input: &Matrix, target: &Matrix) -> (f64, Matrix);
    fn reduce_loss(&self, dataset: &[Example]) -> f64;
}

/// Damped Gauss-Newton (Levenberg-Marquardt) trainer: accumulates a
/// Jacobian over a full dataset pass, solves the damped normal equations,
/// and applies the resulting weight update.
pub struct LevenbergMarquardt {
    damping: f64,
    max_steps: usize,
}

impl LevenbergMarquardt {
    pub fn new(damping: f64, max_steps: usize) -> Self {
        LevenbergMarquardt { damping, max_steps }
    }

    /// Runs up to `max_steps` update passes over `dataset`, returning the
    /// final loss. Fails if a step's update is non-finite (`DivergedUpdate`)
    /// or if both the Cholesky solve and its QR fallback leave the damped
    /// normal equations unsolved (`UnsolvableNormalEquations`).
    pub fn train<M: Trainable>(
        &self,
        model: &mut M,
        dataset: &[Example],
    ) -> Result<f64, TrainingError> {
        let mut loss = model.reduce_loss(dataset);
        for _ in 0..self.max_steps {
            let weight_count = model.weights().rows();
            let mut jacobian = Matrix::new(dataset.len(), weight_count);
            let mut residuals = Matrix::new(dataset.len(), 1);
            for (row, (input, target)) in dataset.iter().enumerate() {
                let (residual, gradient) = model.backprop(input, target);
                residuals.set(row, 0, residual);
                for col in 0..weight_count {
                    jacobian.set(row, col, gradient.get(col, 0));
                }
            }

            let jt = jacobian.transpose();
            let mut normal = &jt * &jacobian;
            for i in 0..weight_count {
                let damped = normal.get(i, i) + self.damping;
                normal.set(i, i, damped);
            }
            let rhs = &jt * &residuals;

            let mut delta = Matrix::new(weight_count, 1);
            let solved = normal.solve_symmetric(&rhs, &mut delta);
            let delta = if solved { delta } else { normal.solve_qr(rhs) };

            if (0..weight_count).any(|i| delta.get(i, 0).is_nan()) {
                return Err(if solved {
                    TrainingError::DivergedUpdate
                } else {
                    TrainingError::UnsolvableNormalEquations
                });
            }

            let updated = model.weights() - &delta;
            model.set_weights(updated);

            let new_loss = model.reduce_loss(dataset);
            if !new_loss.is_finite() {
                return Err(TrainingError::DivergedUpdate);
            }
            loss = new_loss;
        }
        Ok(loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// y = w0 + w1 * x, the simplest possible `Trainable`.
    struct LinearModel {
        weights: Matrix,
    }

    impl Trainable for LinearModel {
        fn weights(&self) -> &Matrix {
            &self.weights
        }

        fn set_weights(&mut self, weights: Matrix) {
            self.weights = weights;
        }

        fn forward(&self, input: &Matrix) -> Matrix {
            let x = input.get(0, 0);
            Matrix::filled(1, 1, self.weights.get(0, 0) + self.weights.get(1, 0) * x)
        }

        fn backprop(&self, input: &Matrix, target: &Matrix) -> (f64, Matrix) {
            let x = input.get(0, 0);
            let prediction = self.forward(input).get(0, 0);
            let residual = prediction - target.get(0, 0);
            let mut gradient = Matrix::new(2, 1);
            gradient.set(0, 0, 1.0);
            gradient.set(1, 0, x);
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

    #[test]
    fn fits_a_line() {
        let dataset: Vec<Example> = (0..10)
            .map(|i| {
                let x = i as f64;
                (Matrix::filled(1, 1, x), Matrix::filled(1, 1, 3.0 + 2.0 * x))
            })
            .collect();
        let mut model = LinearModel {
            weights: Matrix::new(2, 1),
        };
        let trainer = LevenbergMarquardt::new(1e-3, 20);
        let loss = trainer.train(&mut model, &dataset).expect("should converge");
        assert_abs_diff_eq!(loss, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(model.weights().get(0, 0), 3.0, epsilon = 1e-3);
        assert_abs_diff_eq!(model.weights().get(1, 0), 2.0, epsilon = 1e-3);
    }
}
