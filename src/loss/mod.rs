use ndarray::Array1;

/// A trait for differentiable loss functions used during model training.
///
/// Implementors must define:
/// - How to compute the scalar loss value (for logging/metrics).
/// - How to compute the gradient of the loss w.r.t. the model's predictions.
///
/// This gradient is passed to the model's `backward()` method to update parameters.
pub trait Loss {
    type Prediction;
    type Target;

    /// Computes the scalar loss value (for logging/metrics).
    fn loss(&self, prediction: &Self::Prediction, target: &Self::Target) -> f64;

    /// Computes the gradient of the loss w.r.t. the prediction: ∂L/∂pred.
    fn grad_wrt_prediction(
        &self,
        prediction: &Self::Prediction,
        target: &Self::Target,
    ) -> Self::Prediction;
}

/// Mean Squared Error (MSE) loss: `L = (1/n) * Σ(pred_i - target_i)^2`
///
/// Gradient w.r.t. prediction: `∂L/∂pred = (pred - target) / n`
///
/// The factor of 2 is omitted; it is absorbed into the learning rate.
#[derive(Clone, Copy, Debug, Default)]
pub struct MSELoss;

impl Loss for MSELoss {
    type Prediction = Array1<f64>;
    type Target = Array1<f64>;

    fn loss(&self, pred: &Self::Prediction, target: &Self::Target) -> f64 {
        if pred.is_empty() {
            return 0.0;
        }
        let diff = pred - target;
        diff.dot(&diff) / pred.len() as f64
    }

    fn grad_wrt_prediction(&self, pred: &Self::Prediction, target: &Self::Target) -> Array1<f64> {
        let n = pred.len().max(1) as f64;
        (pred - target) / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mse_loss() {
        let pred = array![3.0, 5.0];
        let target = array![1.0, 2.0];

        let mse = MSELoss;
        // ((3-1)^2 + (5-2)^2) / 2 = (4 + 9) / 2 = 6.5
        assert!((mse.loss(&pred, &target) - 6.5).abs() < 1e-12);

        // grad = (pred - target) / n = [2.0, 3.0] / 2 = [1.0, 1.5]
        let grad = mse.grad_wrt_prediction(&pred, &target);
        assert_eq!(grad.to_vec(), vec![1.0, 1.5]);
    }
}
