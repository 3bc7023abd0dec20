//! Pricing pipeline: column transformer plus linear regressor, fitted and
//! persisted as one unit.

use crate::dataset::{Frame, InMemoryDataset};
use crate::error::{PricingError, Result};
use crate::loss::MSELoss;
use crate::model::{
    Fitted, InferenceModel, LinearModel, LinearRegression, SerializableLinearParams,
};
use crate::optimizer::SGD;
use crate::preprocessing::{
    ColumnTransformer, ColumnTransformerParams, FittedColumnTransformer, FittedTransformer,
    Transformer,
};
use crate::regularizers::{NoRegularizer, Regularizer, L2};
use crate::schema::{validate_frame, CarRecord};
use crate::serialization::SerializableParams;
use crate::trainer::Trainer;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Gradient-descent settings for the regressor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainerSettings {
    pub learning_rate: f64,
    pub max_epochs: usize,
    pub batch_size: usize,
    /// L2 penalty on the weights; 0 disables it.
    pub l2: f64,
}

impl Default for TrainerSettings {
    fn default() -> Self {
        Self {
            learning_rate: 0.05,
            max_epochs: 1000,
            batch_size: 32,
            l2: 0.0,
        }
    }
}

/// Unfitted pricing pipeline.
#[derive(Clone, Debug)]
pub struct PricingPipeline {
    transformer: ColumnTransformer,
    settings: TrainerSettings,
}

impl Default for PricingPipeline {
    fn default() -> Self {
        Self::new(TrainerSettings::default())
    }
}

pub(crate) fn check_prices(prices: &[f64], n_rows: usize) -> Result<()> {
    if n_rows == 0 {
        return Err(PricingError::Data("training set is empty".into()));
    }
    if prices.len() != n_rows {
        return Err(PricingError::Data(format!(
            "{} prices for {} rows",
            prices.len(),
            n_rows
        )));
    }
    if let Some((row, price)) = prices
        .iter()
        .enumerate()
        .find(|(_, p)| !(p.is_finite() && **p > 0.0))
    {
        return Err(PricingError::Data(format!(
            "row {}: price {} is not a positive finite number",
            row, price
        )));
    }
    Ok(())
}

impl PricingPipeline {
    pub fn new(settings: TrainerSettings) -> Self {
        Self {
            transformer: ColumnTransformer::for_listings(),
            settings,
        }
    }

    pub fn settings(&self) -> &TrainerSettings {
        &self.settings
    }

    /// Fit the feature pipeline, then the regressor on its output.
    pub fn fit(&self, frame: &Frame, prices: &[f64]) -> Result<PricingModel> {
        validate_frame(frame)?;
        check_prices(prices, frame.n_rows())?;

        let transformer = self.transformer.fit(frame).map_err(PricingError::data)?;
        let x = transformer.transform(frame).map_err(PricingError::data)?;
        let dataset = InMemoryDataset::new(x, Array1::from_vec(prices.to_vec()))
            .map_err(PricingError::Data)?;

        let regressor = if self.settings.l2 > 0.0 {
            self.train(&dataset, L2::new(self.settings.l2))?
        } else {
            self.train(&dataset, NoRegularizer)?
        };

        tracing::info!(
            rows = frame.n_rows(),
            features = transformer.n_features_out(),
            "pricing pipeline fitted"
        );
        Ok(PricingModel {
            transformer,
            regressor,
        })
    }

    fn train<R>(&self, dataset: &InMemoryDataset, regularizer: R) -> Result<LinearModel<Fitted>>
    where
        R: Regularizer<LinearRegression>,
    {
        let trainer: Trainer<_, _, LinearRegression, _, _> =
            Trainer::builder(MSELoss, SGD::new(self.settings.learning_rate), regularizer)
                .batch_size(self.settings.batch_size)
                .max_epochs(self.settings.max_epochs)
                .build();
        Ok(trainer.fit(LinearRegression::new(dataset.n_features()), dataset)?)
    }
}

/// Persisted form of a [`PricingModel`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PricingModelParams {
    pub transformer: ColumnTransformerParams,
    pub regressor: SerializableLinearParams,
}

/// Fitted feature pipeline and regressor.
#[derive(Clone, Debug)]
pub struct PricingModel {
    transformer: FittedColumnTransformer,
    regressor: LinearModel<Fitted>,
}

impl PricingModel {
    pub fn transformer(&self) -> &FittedColumnTransformer {
        &self.transformer
    }

    pub fn regressor(&self) -> &LinearModel<Fitted> {
        &self.regressor
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.transformer.feature_names_out()
    }

    pub fn transform(&self, frame: &Frame) -> Result<Array2<f64>> {
        self.transformer
            .transform(frame)
            .map_err(PricingError::inference)
    }

    pub fn transform_record(&self, record: &CarRecord) -> Result<Array2<f64>> {
        self.transform(&Frame::from_records(std::slice::from_ref(record)))
    }

    /// Raw (unrounded) predictions for every row of `frame`.
    pub fn predict_frame(&self, frame: &Frame) -> Result<Array1<f64>> {
        Ok(self.regressor.predict_batch(&self.transform(frame)?))
    }

    pub fn predict_record(&self, record: &CarRecord) -> Result<f64> {
        let x = self.transform_record(record)?;
        Ok(self.regressor.predict(&x.row(0).to_owned()))
    }

    pub fn extract_params(&self) -> PricingModelParams {
        PricingModelParams {
            transformer: self.transformer.extract_params(),
            regressor: self.regressor.extract_params(),
        }
    }

    pub fn from_params(params: PricingModelParams) -> Result<Self> {
        let transformer = FittedColumnTransformer::from_params(params.transformer)
            .map_err(PricingError::inference)?;
        if params.regressor.weights.len() != transformer.n_features_out() {
            return Err(PricingError::Inference(format!(
                "regressor has {} weights but the pipeline produces {} features",
                params.regressor.weights.len(),
                transformer.n_features_out()
            )));
        }
        Ok(Self {
            transformer,
            regressor: LinearModel::<Fitted>::from_params(params.regressor),
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.extract_params()
            .to_bytes()
            .map_err(PricingError::inference)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let params = PricingModelParams::from_bytes(bytes).map_err(PricingError::inference)?;
        Self::from_params(params)
    }
}
