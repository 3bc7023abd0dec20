use crate::model::linear::LinearParams;

/// Trait for gradient-based optimizers.
///
/// Optimizers update model parameters from computed gradients; the
/// [`Trainer`](crate::trainer::Trainer) owns the loop and delegates each
/// update here, so any model can be paired with any optimizer without
/// dynamic dispatch.
pub trait Optimizer<P> {
    /// Performs an optimization step:
    /// ```text
    /// params_new = params - learning_rate * gradients
    /// ```
    ///
    /// Returns a new owned instance of updated parameters.
    fn step(&self, params: &P, gradients: &P) -> P;
}

/// Stochastic Gradient Descent (SGD) optimizer.
///
/// ```text
/// θ ← θ - η · ∇L(θ)
/// ```
/// where `η` is the learning rate and `∇L(θ)` is the loss gradient.
#[derive(Clone, Copy, Debug)]
pub struct SGD {
    lr: f64,
}

impl SGD {
    pub fn new(lr: f64) -> Self {
        Self { lr }
    }

    pub fn learning_rate(&self) -> f64 {
        self.lr
    }
}

impl Optimizer<LinearParams> for SGD {
    fn step(&self, params: &LinearParams, grads: &LinearParams) -> LinearParams {
        LinearParams {
            weights: &params.weights - &(&grads.weights * self.lr),
            bias: params.bias - grads.bias * self.lr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_sgd_step() {
        let params = LinearParams {
            weights: array![1.0, 2.0, 3.0],
            bias: 0.5,
        };
        let grads = LinearParams {
            weights: array![10.0, -20.0, 5.0],
            bias: -1.0,
        };
        let updated = SGD::new(0.1).step(&params, &grads);
        assert_eq!(updated.weights.to_vec(), vec![0.0, 4.0, 2.5]);
        assert!((updated.bias - 0.6).abs() < 1e-12);
    }
}
