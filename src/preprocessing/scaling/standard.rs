//! Standard Scaler (Z-score normalization).
//!
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the training mean and `s` the population standard deviation
//! (ddof = 0). A feature that was constant during fit has `s` recorded as 0
//! and standardizes to exactly 0 for every input, never NaN.
//!
//! # Example
//! ```ignore
//! use getaround_pricing::preprocessing::{StandardScaler, Transformer};
//!
//! let fitted = StandardScaler::new().with_mean(true).with_std(true).fit(&data)?;
//! let scaled = fitted.transform(&data)?;
//! ```

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Array2, ArrayView1, Axis, Zip};
use serde::{Deserialize, Serialize};

/// Configuration for StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerConfig {
    /// Center the data before scaling.
    pub with_mean: bool,
    /// Scale the data to unit variance.
    pub with_std: bool,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

/// Serializable parameters for a fitted StandardScaler.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StandardScalerParams {
    pub config: StandardScalerConfig,
    /// Mean of each feature (zeros if `with_mean` is false).
    pub mean: Vec<f64>,
    /// Standard deviation of each feature; 0 marks a constant feature.
    pub std: Vec<f64>,
    pub n_features: usize,
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct StandardScaler {
    config: StandardScalerConfig,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to center data by mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }
}

fn column_moments(column: ArrayView1<'_, f64>) -> (f64, f64) {
    let n = column.len() as f64;
    let mean = column.sum() / n;

    let (min, max) = column
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if min == max {
        // Rounding in `mean` must not turn a constant column into a tiny scale.
        return (mean, 0.0);
    }

    let variance = column.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

impl Transformer for StandardScaler {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = StandardScalerParams;
    type Fitted = FittedStandardScaler;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.nrows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit StandardScaler on empty data".to_string(),
            ));
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(PreprocessingError::MissingValues(
                "StandardScaler requires finite input; impute first".to_string(),
            ));
        }

        let cols = data.ncols();
        let mut mean = Array1::zeros(cols);
        let mut std = Array1::ones(cols);
        for (idx, column) in data.axis_iter(Axis(1)).enumerate() {
            let (m, s) = column_moments(column);
            if self.config.with_mean {
                mean[idx] = m;
            }
            if self.config.with_std {
                std[idx] = s;
            }
        }

        Ok(FittedStandardScaler {
            config: self.config.clone(),
            mean,
            std,
            n_features: cols,
        })
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedStandardScaler {
    config: StandardScalerConfig,
    mean: Array1<f64>,
    std: Array1<f64>,
    n_features: usize,
}

impl FittedStandardScaler {
    /// Get the mean values for each feature.
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Get the standard deviation values for each feature.
    pub fn std(&self) -> &Array1<f64> {
        &self.std
    }

    fn check_width(&self, cols: usize) -> Result<(), PreprocessingError> {
        if cols != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: cols,
            });
        }
        Ok(())
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = StandardScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.check_width(data.ncols())?;

        let mut result = data.clone();
        for mut row in result.axis_iter_mut(Axis(0)) {
            Zip::from(&mut row)
                .and(&self.mean)
                .and(&self.std)
                .for_each(|x, &m, &s| {
                    *x = if s == 0.0 { 0.0 } else { (*x - m) / s };
                });
        }
        Ok(result)
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        self.check_width(data.ncols())?;

        let mut result = data.clone();
        for mut row in result.axis_iter_mut(Axis(0)) {
            Zip::from(&mut row)
                .and(&self.mean)
                .and(&self.std)
                .for_each(|z, &m, &s| {
                    *z = *z * s + m;
                });
        }
        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        StandardScalerParams {
            config: self.config.clone(),
            mean: self.mean.to_vec(),
            std: self.std.to_vec(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.mean.len() != params.n_features || params.std.len() != params.n_features {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} means and stds", params.n_features),
                got: format!("{} means, {} stds", params.mean.len(), params.std.len()),
            });
        }
        Ok(Self {
            config: params.config,
            mean: Array1::from(params.mean),
            std: Array1::from(params.std),
            n_features: params.n_features,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn create_test_data() -> Array2<f64> {
        array![[0.0, 1.0], [0.0, 1.0], [1.0, 3.0]]
    }

    #[test]
    fn test_standard_scaler_fit() {
        let fitted = StandardScaler::new().fit(&create_test_data()).unwrap();

        // Mean: [1/3, 5/3]
        let mean = fitted.mean();
        assert!((mean[0] - 1.0 / 3.0).abs() < 1e-10);
        assert!((mean[1] - 5.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_standard_scaler_transform() {
        let data = create_test_data();
        let transformed = StandardScaler::new().fit_transform(&data).unwrap();

        for column in transformed.axis_iter(Axis(1)) {
            let mean = column.sum() / 3.0;
            let var = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 3.0;
            assert!(mean.abs() < 1e-10, "mean = {}", mean);
            assert!((var.sqrt() - 1.0).abs() < 1e-8, "std = {}", var.sqrt());
        }
    }

    #[test]
    fn test_standard_scaler_inverse_transform() {
        let data = create_test_data();
        let fitted = StandardScaler::new().fit(&data).unwrap();

        let transformed = fitted.transform(&data).unwrap();
        let recovered = fitted.inverse_transform(&transformed).unwrap();

        for (o, r) in data.iter().zip(recovered.iter()) {
            assert!((o - r).abs() < 1e-10);
        }
    }

    #[test]
    fn test_standard_scaler_without_mean() {
        let fitted = StandardScaler::new()
            .with_mean(false)
            .fit(&create_test_data())
            .unwrap();
        assert!(fitted.mean().iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_standard_scaler_no_mean_no_std() {
        let data = create_test_data();
        let transformed = StandardScaler::new()
            .with_mean(false)
            .with_std(false)
            .fit_transform(&data)
            .unwrap();
        assert_eq!(transformed, data);
    }

    #[test]
    fn test_constant_feature_standardizes_to_zero() {
        // 0.1 * 3 does not sum back to exactly 0.3, so the mean is slightly off.
        let data = array![[0.1, 1.0], [0.1, 2.0], [0.1, 3.0]];
        let fitted = StandardScaler::new().fit(&data).unwrap();
        assert_eq!(fitted.std()[0], 0.0);

        let probe = array![[0.1, 2.0], [250.0, 2.0], [-3.0, 2.0]];
        let out = fitted.transform(&probe).unwrap();
        for row in 0..3 {
            assert_eq!(out[[row, 0]], 0.0);
            assert!(!out[[row, 0]].is_nan());
        }
    }

    #[test]
    fn test_standard_scaler_feature_mismatch() {
        let fitted = StandardScaler::new().fit(&create_test_data()).unwrap();
        let wrong = array![[1.0, 2.0, 3.0]];
        assert!(matches!(
            fitted.transform(&wrong),
            Err(PreprocessingError::FeatureMismatch {
                expected_features: 2,
                got_features: 3
            })
        ));
        assert!(matches!(
            fitted.inverse_transform(&wrong),
            Err(PreprocessingError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_standard_scaler_rejects_nan() {
        let data = array![[1.0], [f64::NAN]];
        assert!(StandardScaler::new().fit(&data).is_err());
    }

    #[test]
    fn test_standard_scaler_empty_data() {
        let data = Array2::<f64>::zeros((0, 2));
        assert!(StandardScaler::new().fit(&data).is_err());
    }

    #[test]
    fn test_standard_scaler_serialization_is_bit_identical() {
        let data = create_test_data();
        let fitted = StandardScaler::new().fit(&data).unwrap();
        let restored = FittedStandardScaler::from_params(fitted.extract_params()).unwrap();

        let t1 = fitted.transform(&data).unwrap();
        let t2 = restored.transform(&data).unwrap();
        for (a, b) in t1.iter().zip(t2.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_standard_scaler_save_load_file() {
        let data = create_test_data();
        let fitted = StandardScaler::new().fit(&data).unwrap();

        let temp_file = tempfile::NamedTempFile::new().unwrap();
        fitted.save_to_file(temp_file.path()).unwrap();
        let loaded = FittedStandardScaler::load_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded.n_features_in(), fitted.n_features_in());
        assert_eq!(
            loaded.transform(&data).unwrap(),
            fitted.transform(&data).unwrap()
        );
    }
}
