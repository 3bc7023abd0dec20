//! Mini-batch gradient descent over a [`Dataset`].

use crate::{
    dataset::Dataset,
    error::PricingError,
    loss::Loss,
    model::{ParamOps, TrainableModel},
    optimizer::Optimizer,
    regularizers::Regularizer,
};
use ndarray::{Array1, Array2};
use std::marker::PhantomData;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("dataset is empty")]
    EmptyDataset,
    #[error("dataset length is unknown")]
    UnknownLength,
    #[error("failed to load batch: {0}")]
    Batch(String),
    #[error("loss diverged at epoch {epoch}")]
    Diverged { epoch: usize },
}

impl From<TrainingError> for PricingError {
    fn from(err: TrainingError) -> Self {
        PricingError::Data(err.to_string())
    }
}

pub struct Trainer<L, O, M, P, R>
where
    L: Loss,
    M: TrainableModel<Params = P, Gradients = P>,
    O: Optimizer<P>,
    R: Regularizer<M>,
{
    pub(crate) batch_size: usize,
    pub(crate) max_epochs: usize,
    pub(crate) verbose: bool,
    pub(crate) loss_fn: L,
    pub(crate) optimizer: O,
    pub(crate) regularizer: R,
    _phantom_model: PhantomData<M>,
}

pub struct TrainerBuilder<L, O, M, P, R>
where
    L: Loss,
    M: TrainableModel<Params = P, Gradients = P>,
    O: Optimizer<P>,
    R: Regularizer<M>,
{
    batch_size: usize,
    max_epochs: usize,
    verbose: bool,
    loss_fn: L,
    optimizer: O,
    regularizer: R,
    _phantom_model: PhantomData<M>,
}

impl<L, O, M, P, R> TrainerBuilder<L, O, M, P, R>
where
    L: Loss,
    M: TrainableModel<Params = P, Gradients = P>,
    O: Optimizer<P>,
    R: Regularizer<M>,
{
    pub fn new(loss_fn: L, optimizer: O, regularizer: R) -> Self {
        Self {
            batch_size: 32,
            max_epochs: 1000,
            verbose: false,
            loss_fn,
            optimizer,
            regularizer,
            _phantom_model: PhantomData,
        }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    /// Log every epoch at `info` instead of `debug`.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn build(self) -> Trainer<L, O, M, P, R> {
        Trainer {
            batch_size: self.batch_size,
            max_epochs: self.max_epochs,
            verbose: self.verbose,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
            regularizer: self.regularizer,
            _phantom_model: PhantomData,
        }
    }
}

impl<L, O, M, P, R> Trainer<L, O, M, P, R>
where
    L: Loss<Target = Array1<f64>, Prediction = Array1<f64>>,
    M: TrainableModel<Input = Array2<f64>, Prediction = Array1<f64>, Params = P, Gradients = P>,
    O: Optimizer<P>,
    R: Regularizer<M>,
    P: ParamOps,
{
    pub fn builder(loss_fn: L, optimizer: O, regularizer: R) -> TrainerBuilder<L, O, M, P, R> {
        TrainerBuilder::new(loss_fn, optimizer, regularizer)
    }

    /// Train `model` for `max_epochs` passes over `dataset` and return its
    /// fitted form. Epoch loss is the sample-weighted mean of batch losses
    /// (penalty included) and must stay finite.
    pub fn fit<D>(&self, mut model: M, dataset: &D) -> Result<M::Output, TrainingError>
    where
        D: Dataset,
    {
        let n_total = dataset.len().ok_or(TrainingError::UnknownLength)?;
        if n_total == 0 {
            return Err(TrainingError::EmptyDataset);
        }

        for epoch in 0..self.max_epochs {
            let mut total_loss = 0.0;
            for batch_result in dataset.batches(self.batch_size) {
                let (batch_x, batch_y) =
                    batch_result.map_err(|e| TrainingError::Batch(format!("{:?}", e)))?;
                let preds = model.forward(&batch_x);
                let (reg_penalty, reg_grad) = self.regularizer.regularizer_penalty_grad(&model);
                let batch_loss = self.loss_fn.loss(&preds, &batch_y) + reg_penalty;
                total_loss += batch_loss * batch_y.len() as f64;

                let grad_preds = self.loss_fn.grad_wrt_prediction(&preds, &batch_y);
                let grads = model.backward(&batch_x, &grad_preds);
                let new_params = self.optimizer.step(model.params(), &grads.add(&reg_grad));
                model.update_params(&new_params);
            }

            let avg_loss = total_loss / n_total as f64;
            if !avg_loss.is_finite() {
                tracing::warn!(epoch, "training loss is not finite");
                return Err(TrainingError::Diverged { epoch });
            }
            if self.verbose {
                tracing::info!(epoch, loss = avg_loss, "epoch finished");
            } else {
                tracing::debug!(epoch, loss = avg_loss, "epoch finished");
            }
        }

        Ok(model.into_fitted())
    }
}
