//! # getaround-pricing
//!
//! Daily rental price prediction for a car-sharing marketplace: a feature
//! pipeline and linear regressor trained from a listings CSV, persisted as a
//! content-addressed artifact, and served one listing at a time.
//!
//! ## Core Design Principles
//!
//! - **One feature contract**: the fitted [`pipeline::PricingModel`] carries
//!   both the preprocessing and the regressor, so serving transforms rows
//!   exactly as training did.
//! - **Stateful Type Safety**: models and transformers carry their training
//!   state in the type system (`Unfitted` vs `Fitted`).
//! - **Validate at the boundary**: raw requests become typed
//!   [`schema::CarRecord`]s before any computation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use getaround_pricing::dataset::{synthetic, Frame};
//! use getaround_pricing::pipeline::PricingPipeline;
//!
//! let (records, prices) = synthetic::listings(500, 42);
//! let model = PricingPipeline::default().fit(&Frame::from_records(&records), &prices)?;
//! let price = model.predict_record(&records[0])?;
//! ```
//!
//! ## Module Structure
//!
//! - `schema`: listing columns, typed records and request validation
//! - `dataset`: frames, CSV loaders, splits and mini-batch datasets
//! - `preprocessing`: imputers, scaler, one-hot encoder, column transformer
//! - `model`, `loss`, `optimizer`, `regularizers`, `trainer`: the regressor
//! - `pipeline`: preprocessing plus regressor, fitted and persisted together
//! - `artifact`, `storage`: versioned artifacts in a blob store
//! - `training`, `tracking`, `metrics`: training runs and their metrics
//! - `predictor`, `server`: single-row prediction and its HTTP surface
//! - `market`: aggregate market tables

/// Versioned, digest-checked model artifacts.
pub mod artifact;

/// Layered configuration.
pub mod config;

/// Tabular frames, CSV loading and training datasets.
pub mod dataset;

pub mod error;

/// Differentiable loss functions for model training.
pub mod loss;

/// Market analysis tables.
pub mod market;

/// Regression metrics.
pub mod metrics;

/// Machine learning models with compile-time state safety.
pub mod model;

/// Optimization algorithms for parameter updates.
pub mod optimizer;

/// Feature pipeline plus regressor.
pub mod pipeline;

/// Single-row price prediction.
pub mod predictor;

/// Data preprocessing transformers.
pub mod preprocessing;

/// Weight regularization strategies.
pub mod regularizers;

/// Listing schema and request validation.
pub mod schema;

/// Parameter persistence.
pub mod serialization;

/// HTTP prediction API.
pub mod server;

/// Artifact blob stores.
pub mod storage;

pub mod telemetry;

/// Experiment tracking sinks.
pub mod tracking;

/// High-level training loop orchestration.
pub mod trainer;

/// Split, fit, publish, evaluate and record.
pub mod training;

pub use error::{PricingError, Result, ValidationError};
pub use pipeline::{PricingModel, PricingPipeline, TrainerSettings};
pub use predictor::{Prediction, Predictor, PriceBand};
pub use schema::{CarFeatures, CarRecord};
