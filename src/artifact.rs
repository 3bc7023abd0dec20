//! Versioned, content-addressed model artifacts.
//!
//! An artifact is an [`ArtifactEnvelope`] serialized with bincode. The payload
//! holds the [`PricingModel`] parameters; the envelope records who produced
//! it and the SHA-256 digest of the payload, checked on every load.

use crate::error::{PricingError, Result};
use crate::pipeline::PricingModel;
use crate::serialization::SerializableParams;
use crate::storage::BlobStore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

pub const FORMAT_VERSION: u32 = 1;

/// Fresh run id: a v4 UUID in simple (32 hex digit) form.
pub fn new_run_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Storage key `<prefix>/<model_name>_<run_id>.bin`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactKey {
    pub prefix: String,
    pub model_name: String,
    pub run_id: String,
}

impl ArtifactKey {
    pub fn new(prefix: &str, model_name: &str, run_id: &str) -> Self {
        Self {
            prefix: prefix.trim_matches('/').to_string(),
            model_name: model_name.to_string(),
            run_id: run_id.to_string(),
        }
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            write!(f, "{}_{}.bin", self.model_name, self.run_id)
        } else {
            write!(f, "{}/{}_{}.bin", self.prefix, self.model_name, self.run_id)
        }
    }
}

/// Descriptive fields of an artifact, without the payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    pub format_version: u32,
    pub model_name: String,
    pub run_id: String,
    /// RFC 3339 creation time.
    pub created_at: String,
    pub feature_names: Vec<String>,
    /// Lowercase hex SHA-256 of the payload.
    pub digest: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtifactEnvelope {
    pub meta: ArtifactMeta,
    pub payload: Vec<u8>,
}

fn digest_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

impl ArtifactEnvelope {
    pub fn seal(model: &PricingModel, model_name: &str, run_id: &str) -> Result<Self> {
        let payload = model.to_bytes()?;
        let meta = ArtifactMeta {
            format_version: FORMAT_VERSION,
            model_name: model_name.to_string(),
            run_id: run_id.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            feature_names: model.feature_names(),
            digest: digest_hex(&payload),
        };
        Ok(Self { meta, payload })
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        self.to_bytes().map_err(PricingError::inference)
    }

    /// Parse an envelope and check its format version. The payload digest is
    /// checked by [`open`](Self::open).
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let envelope = Self::from_bytes(bytes)
            .map_err(|e| PricingError::Inference(format!("unreadable artifact: {}", e)))?;
        if envelope.meta.format_version != FORMAT_VERSION {
            return Err(PricingError::Inference(format!(
                "unsupported artifact format version {} (expected {})",
                envelope.meta.format_version, FORMAT_VERSION
            )));
        }
        Ok(envelope)
    }

    /// Verify the digest and rebuild the model.
    pub fn open(&self) -> Result<PricingModel> {
        let actual = digest_hex(&self.payload);
        if actual != self.meta.digest {
            return Err(PricingError::Inference(format!(
                "artifact digest mismatch: recorded {}, computed {}",
                self.meta.digest, actual
            )));
        }
        let model = PricingModel::from_bytes(&self.payload)?;
        if model.feature_names() != self.meta.feature_names {
            return Err(PricingError::Inference(
                "artifact feature names do not match its payload".into(),
            ));
        }
        Ok(model)
    }
}

/// Seal `model` and upload it under `key`. Never overwrites.
pub fn publish(
    store: &dyn BlobStore,
    bucket: &str,
    key: &ArtifactKey,
    model: &PricingModel,
) -> Result<ArtifactMeta> {
    let envelope = ArtifactEnvelope::seal(model, &key.model_name, &key.run_id)?;
    let key = key.to_string();
    store.put(bucket, &key, &envelope.encode()?)?;
    tracing::info!(bucket, key = %key, digest = %envelope.meta.digest, "artifact published");
    Ok(envelope.meta)
}

/// Download, verify and rebuild the artifact stored under `key`.
pub fn load(
    store: &dyn BlobStore,
    bucket: &str,
    key: &str,
) -> Result<(PricingModel, ArtifactMeta)> {
    let bytes = store.get(bucket, key)?;
    let envelope = ArtifactEnvelope::decode(&bytes)?;
    let model = envelope.open()?;
    tracing::info!(
        bucket,
        key,
        run_id = %envelope.meta.run_id,
        created_at = %envelope.meta.created_at,
        "artifact loaded"
    );
    Ok((model, envelope.meta))
}
