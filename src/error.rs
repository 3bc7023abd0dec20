//! Error taxonomy for the pricing service.
//!
//! Library code returns [`PricingError`]; the binary wraps it with `anyhow`
//! context at the top level.

use crate::storage::StorageError;
use thiserror::Error;

/// A request field that failed validation at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not an accepted value")]
    UnknownCategory { field: &'static str, value: String },
    #[error("{field}: {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("malformed request: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum PricingError {
    /// Training columns are missing, unexpected or of the wrong kind.
    #[error("schema error: {0}")]
    Schema(String),
    /// Training values cannot be used (bad prices, empty set, divergence).
    #[error("data error: {0}")]
    Data(String),
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Transform or regressor failure while serving, or an unusable artifact.
    #[error("inference error: {0}")]
    Inference(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PricingError {
    pub fn data(err: impl std::fmt::Display) -> Self {
        PricingError::Data(err.to_string())
    }

    pub fn inference(err: impl std::fmt::Display) -> Self {
        PricingError::Inference(err.to_string())
    }

    /// Short machine-readable name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            PricingError::Schema(_) => "schema_error",
            PricingError::Data(_) => "data_error",
            PricingError::Validation(_) => "validation_error",
            PricingError::Inference(_) => "inference_error",
            PricingError::Storage(_) => "storage_error",
            PricingError::Config(_) => "config_error",
            PricingError::Io(_) => "io_error",
        }
    }
}

impl From<config::ConfigError> for PricingError {
    fn from(err: config::ConfigError) -> Self {
        PricingError::Config(err.to_string())
    }
}

pub type Result<T, E = PricingError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::OutOfRange {
            field: "mileage",
            value: 300_001,
            min: 0,
            max: 300_000,
        };
        assert_eq!(err.to_string(), "mileage: 300001 is outside [0, 300000]");

        let err = ValidationError::UnknownCategory {
            field: "model_key",
            value: "Tesla".to_string(),
        };
        assert!(err.to_string().contains("'Tesla'"));
    }

    #[test]
    fn test_kind_follows_variant() {
        let err: PricingError = ValidationError::Malformed("x".into()).into();
        assert_eq!(err.kind(), "validation_error");
        assert_eq!(PricingError::inference("boom").kind(), "inference_error");
        assert_eq!(PricingError::data("boom").to_string(), "data error: boom");
    }
}
