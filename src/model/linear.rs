use crate::model::{Fitted, InferenceModel, ParamOps, TrainableModel, Unfitted};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Weights and intercept of a linear regressor: `y = X·w + b`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearParams {
    pub weights: Array1<f64>,
    pub bias: f64,
}

/// Plain-vector form of [`LinearParams`] stored inside model artifacts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializableLinearParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl From<&LinearParams> for SerializableLinearParams {
    fn from(params: &LinearParams) -> Self {
        Self {
            weights: params.weights.to_vec(),
            bias: params.bias,
        }
    }
}

impl From<SerializableLinearParams> for LinearParams {
    fn from(value: SerializableLinearParams) -> Self {
        Self {
            weights: Array1::from_vec(value.weights),
            bias: value.bias,
        }
    }
}

impl ParamOps for LinearParams {
    fn add(&self, other: &Self) -> Self {
        Self {
            weights: &self.weights + &other.weights,
            bias: self.bias + other.bias,
        }
    }

    fn scale(&self, scalar: f64) -> Self {
        Self {
            weights: &self.weights * scalar,
            bias: self.bias * scalar,
        }
    }
}

pub struct LinearModel<S> {
    params: LinearParams,
    _state: PhantomData<S>,
}

impl<S> Clone for LinearModel<S> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            _state: PhantomData,
        }
    }
}

impl<S> std::fmt::Debug for LinearModel<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearModel")
            .field("params", &self.params)
            .finish()
    }
}

impl LinearModel<Fitted> {
    /// Create a new fitted linear model from params.
    pub fn new(params: LinearParams) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn n_features(&self) -> usize {
        self.params.weights.len()
    }

    pub fn params(&self) -> &LinearParams {
        &self.params
    }
}

impl InferenceModel for LinearModel<Fitted> {
    type InputSingle = Array1<f64>;
    type InputBatch = Array2<f64>;
    type OutputSingle = f64;
    type OutputBatch = Array1<f64>;
    type ParamsRepr = SerializableLinearParams;

    /// Predict on a single sample (feature vector).
    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle {
        self.params.weights.dot(input) + self.params.bias
    }

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch {
        input.dot(&self.params.weights) + self.params.bias
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        (&self.params).into()
    }

    fn from_params(params: Self::ParamsRepr) -> Self {
        Self::new(params.into())
    }
}

impl TrainableModel for LinearModel<Unfitted> {
    type Params = LinearParams;
    type Gradients = LinearParams;
    type Prediction = Array1<f64>;
    type Input = Array2<f64>;
    type Output = LinearModel<Fitted>;

    fn forward(&self, x: &Self::Input) -> Self::Prediction {
        x.dot(&self.params.weights) + self.params.bias
    }

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn update_params(&mut self, params: &Self::Params) {
        self.params = params.clone();
    }

    fn into_fitted(self) -> LinearModel<Fitted> {
        LinearModel::<Fitted>::new(self.params)
    }

    // ∂L/∂w = Xᵀ·g, ∂L/∂b = Σg
    fn backward(&self, x: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients {
        LinearParams {
            weights: x.t().dot(grad_output),
            bias: grad_output.sum(),
        }
    }
}

pub type LinearRegression = LinearModel<Unfitted>;

impl LinearRegression {
    /// Zero-initialized regressor over `n_features` inputs.
    pub fn new(n_features: usize) -> Self {
        let params = LinearParams {
            weights: Array1::zeros(n_features),
            bias: 0.0,
        };
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn from_params(params: LinearParams) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}
