//! Error types for preprocessing operations.

use thiserror::Error;

/// Error type for transformer fitting and application.
#[derive(Debug, Error)]
pub enum PreprocessingError {
    /// Shape mismatch between expected and actual matrix dimensions.
    #[error("Invalid shape: expected {expected}, got {got}")]
    InvalidShape { expected: String, got: String },
    /// Numerical computation produced a value that cannot be used.
    #[error("Numerical error: {0}")]
    NumericalError(String),
    /// Data contains missing values where none are allowed.
    #[error("Missing values: {0}")]
    MissingValues(String),
    /// Invalid hyperparameter or unsupported operation.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// I/O failure during file operations.
    #[error("I/O error: {0}")]
    IoError(String),
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),
    /// Feature dimension mismatch.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// A named column was requested from a frame that does not hold it.
    #[error("Missing column: {0}")]
    MissingColumn(String),
    /// A category not seen during fit, with `HandleUnknown::Error`.
    #[error("Unknown category '{value}' in column {column}")]
    UnknownCategory { column: usize, value: String },
}

impl From<std::io::Error> for PreprocessingError {
    fn from(err: std::io::Error) -> Self {
        PreprocessingError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for PreprocessingError {
    fn from(err: bincode::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PreprocessingError {
    fn from(err: ndarray::ShapeError) -> Self {
        PreprocessingError::InvalidShape {
            expected: "compatible dimensions".to_string(),
            got: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_feature_mismatch() {
        let err = PreprocessingError::FeatureMismatch {
            expected_features: 9,
            got_features: 3,
        };
        assert_eq!(
            err.to_string(),
            "Feature mismatch: expected 9 features, got 3"
        );
    }

    #[test]
    fn test_error_display_unknown_category() {
        let err = PreprocessingError::UnknownCategory {
            column: 0,
            value: "Tesla".to_string(),
        };
        assert!(err.to_string().contains("Tesla"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: PreprocessingError = io_err.into();
        assert!(matches!(err, PreprocessingError::IoError(_)));
    }

    #[test]
    fn test_error_from_bincode_error() {
        let bad_bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let bincode_result: Result<String, bincode::Error> = bincode::deserialize(bad_bytes);
        if let Err(e) = bincode_result {
            let err: PreprocessingError = e.into();
            assert!(matches!(err, PreprocessingError::SerializationError(_)));
        }
    }
}
