use crate::model::linear::{LinearParams, LinearRegression};
use crate::model::TrainableModel;
use ndarray::Array1;

/// Penalty added to the data loss, with its gradient w.r.t. the parameters.
pub trait Regularizer<M: TrainableModel> {
    fn regularizer_penalty_grad(&self, model: &M) -> (f64, M::Gradients);
}

/// Ridge penalty `λ‖w‖²` on the weights; the intercept is not penalized.
#[derive(Clone, Copy, Debug)]
pub struct L2 {
    lambda: f64,
}

impl L2 {
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }
}

impl Regularizer<LinearRegression> for L2 {
    fn regularizer_penalty_grad(&self, model: &LinearRegression) -> (f64, LinearParams) {
        let weights = &model.params().weights;
        let penalty = self.lambda * weights.dot(weights);
        let grad = LinearParams {
            weights: weights * (2.0 * self.lambda),
            bias: 0.0,
        };
        (penalty, grad)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoRegularizer;

impl Regularizer<LinearRegression> for NoRegularizer {
    fn regularizer_penalty_grad(&self, model: &LinearRegression) -> (f64, LinearParams) {
        let grad = LinearParams {
            weights: Array1::zeros(model.params().weights.len()),
            bias: 0.0,
        };
        (0.0, grad)
    }
}
