//! Model traits and the linear regressor.
//!
//! A model is trained as [`TrainableModel`] and consumed by [`Trainer::fit`],
//! which returns its [`InferenceModel`] counterpart. The two halves are
//! distinct types, so an untrained model cannot be asked for predictions.
//!
//! [`Trainer::fit`]: crate::trainer::Trainer::fit

pub mod linear;
pub mod state;

pub use linear::{LinearModel, LinearParams, LinearRegression, SerializableLinearParams};
pub use state::{Fitted, Unfitted};

/// Training-time interface: forward pass, gradients, parameter updates.
pub trait TrainableModel {
    type Input;
    type Prediction;
    type Params: ParamOps;
    type Gradients;
    type Output;

    fn forward(&self, input: &Self::Input) -> Self::Prediction;
    fn backward(&self, input: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients;
    fn params(&self) -> &Self::Params;
    fn update_params(&mut self, new_params: &Self::Params);

    /// Drop training state and keep the learned parameters.
    fn into_fitted(self) -> Self::Output;
}

/// Arithmetic on parameter sets, as needed by optimizers.
pub trait ParamOps: Clone {
    fn add(&self, other: &Self) -> Self;
    fn scale(&self, scalar: f64) -> Self;
}

/// Inference-time interface of a fitted model.
pub trait InferenceModel {
    type InputSingle;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;
    type ParamsRepr;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle;
    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch;
    fn extract_params(&self) -> Self::ParamsRepr;
    fn from_params(params: Self::ParamsRepr) -> Self
    where
        Self: Sized;
}
