//! A training run: split, fit, publish, evaluate, record.

use crate::artifact::{self, new_run_id, ArtifactKey};
use crate::dataset::{load_listings, train_test_split, Frame};
use crate::error::Result;
use crate::metrics::RegressionMetrics;
use crate::pipeline::{check_prices, PricingPipeline, TrainerSettings};
use crate::storage::BlobStore;
use crate::tracking::{MetricsSink, RunRecord};
use ndarray::ArrayView1;
use serde::Serialize;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct TrainingOptions {
    pub experiment: String,
    pub model_name: String,
    pub bucket: String,
    pub prefix: String,
    pub test_size: f64,
    pub seed: u64,
    pub trainer: TrainerSettings,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            experiment: "getaround-pricing".into(),
            model_name: "getaround_pricing".into(),
            bucket: "artifacts".into(),
            prefix: "models".into(),
            test_size: 0.2,
            seed: 42,
            trainer: TrainerSettings::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrainingReport {
    pub run_id: String,
    pub artifact_key: String,
    pub metrics: RegressionMetrics,
    pub n_train: usize,
    pub n_test: usize,
}

pub struct TrainingRun<'a> {
    store: &'a dyn BlobStore,
    sink: &'a dyn MetricsSink,
    options: TrainingOptions,
}

impl<'a> TrainingRun<'a> {
    pub fn new(
        store: &'a dyn BlobStore,
        sink: &'a dyn MetricsSink,
        options: TrainingOptions,
    ) -> Self {
        Self {
            store,
            sink,
            options,
        }
    }

    pub fn options(&self) -> &TrainingOptions {
        &self.options
    }

    pub fn run_csv(&self, path: impl AsRef<Path>) -> Result<TrainingReport> {
        let (frame, prices) = load_listings(path)?;
        self.run(&frame, &prices)
    }

    pub fn run(&self, frame: &Frame, prices: &[f64]) -> Result<TrainingReport> {
        // Both splits feed the metrics, so every price is checked up front.
        check_prices(prices, frame.n_rows())?;
        let run_id = new_run_id();
        let span = tracing::info_span!("training_run", run_id = %run_id);
        let _guard = span.enter();

        let (train_idx, test_idx) =
            train_test_split(frame.n_rows(), self.options.test_size, self.options.seed)?;
        let pick = |idx: &[usize]| idx.iter().map(|&i| prices[i]).collect::<Vec<f64>>();
        let (train_frame, train_prices) = (frame.take_rows(&train_idx), pick(&train_idx));
        let (test_frame, test_prices) = (frame.take_rows(&test_idx), pick(&test_idx));
        tracing::info!(n_train = train_idx.len(), n_test = test_idx.len(), "split dataset");

        let model = PricingPipeline::new(self.options.trainer).fit(&train_frame, &train_prices)?;

        let key = ArtifactKey::new(&self.options.prefix, &self.options.model_name, &run_id);
        artifact::publish(self.store, &self.options.bucket, &key, &model)?;

        let predictions = model.predict_frame(&test_frame)?;
        let metrics =
            RegressionMetrics::compute(ArrayView1::from(&test_prices[..]), predictions.view())?;

        let artifact_key = key.to_string();
        self.sink.record(&RunRecord {
            experiment: self.options.experiment.clone(),
            run_id: run_id.clone(),
            model_name: self.options.model_name.clone(),
            artifact_key: artifact_key.clone(),
            recorded_at: chrono::Utc::now().to_rfc3339(),
            settings: self.options.trainer,
            n_train: train_idx.len(),
            n_test: test_idx.len(),
            metrics,
        })?;

        tracing::info!(
            artifact_key = %artifact_key,
            rmse = metrics.rmse,
            mae = metrics.mae,
            r2 = metrics.r2,
            "training run finished"
        );
        Ok(TrainingReport {
            run_id,
            artifact_key,
            metrics,
            n_train: train_idx.len(),
            n_test: test_idx.len(),
        })
    }
}
