//! Single-row price prediction over a pinned artifact.

use crate::artifact::{self, ArtifactMeta};
use crate::error::{PricingError, Result};
use crate::pipeline::PricingModel;
use crate::schema::{CarFeatures, CarRecord};
use crate::storage::BlobStore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of a successful prediction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub rental_price: f64,
}

impl Prediction {
    pub fn band(&self) -> PriceBand {
        PriceBand::of(self.rental_price)
    }
}

/// Coarse reading of a daily price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBand {
    Low,
    Typical,
    High,
}

impl PriceBand {
    pub fn of(price: f64) -> Self {
        if price < 50.0 {
            PriceBand::Low
        } else if price > 200.0 {
            PriceBand::High
        } else {
            PriceBand::Typical
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PriceBand::Low => "below the usual range for the fleet",
            PriceBand::Typical => "within the usual range for the fleet",
            PriceBand::High => "above the usual range for the fleet",
        }
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PriceBand::Low => "low",
            PriceBand::Typical => "typical",
            PriceBand::High => "high",
        };
        f.write_str(label)
    }
}

/// Round to cents. Values too large to scale are already whole cents.
fn round_cents(value: f64) -> f64 {
    let cents = value * 100.0;
    if cents.is_finite() {
        cents.round() / 100.0
    } else {
        value
    }
}

/// Immutable prediction handle, shared across requests.
#[derive(Clone, Debug)]
pub struct Predictor {
    model: PricingModel,
    meta: ArtifactMeta,
    key: String,
}

impl Predictor {
    pub fn new(model: PricingModel, meta: ArtifactMeta, key: impl Into<String>) -> Self {
        Self {
            model,
            meta,
            key: key.into(),
        }
    }

    /// Load and verify the artifact pinned by `(bucket, key)`.
    pub fn load(store: &dyn BlobStore, bucket: &str, key: &str) -> Result<Self> {
        let (model, meta) = artifact::load(store, bucket, key)?;
        Ok(Self::new(model, meta, key))
    }

    pub fn meta(&self) -> &ArtifactMeta {
        &self.meta
    }

    pub fn model_key(&self) -> &str {
        &self.key
    }

    pub fn model(&self) -> &PricingModel {
        &self.model
    }

    /// Price of one listing, rounded to cents. Negative or extreme values
    /// are returned as computed.
    pub fn predict(&self, record: &CarRecord) -> Result<Prediction> {
        record.validate()?;
        let raw = self.model.predict_record(record).map_err(|e| match e {
            e @ PricingError::Inference(_) => e,
            other => PricingError::inference(other),
        })?;
        if !raw.is_finite() {
            return Err(PricingError::Inference(format!(
                "model produced a non-finite price ({})",
                raw
            )));
        }
        Ok(Prediction {
            rental_price: round_cents(raw),
        })
    }

    /// Validate a raw request, then predict.
    pub fn predict_features(&self, features: CarFeatures) -> Result<Prediction> {
        let record = CarRecord::try_from(features)?;
        self.predict(&record)
    }
}
