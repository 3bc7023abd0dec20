//! Simple Imputer for numeric columns.
//!
//! Missing values are encoded as NaN. Supports mean, median, most_frequent
//! and constant strategies; a column with no observed value imputes 0.

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Strategy for imputing missing values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace missing values with the mean of each column.
    #[default]
    Mean,
    /// Replace missing values with the median of each column.
    Median,
    /// Replace missing values with the most frequent value of each column.
    /// Ties resolve to the smallest value.
    MostFrequent,
    /// Replace missing values with a constant value.
    Constant(f64),
}

/// Serializable parameters for a fitted SimpleImputer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimpleImputerParams {
    pub strategy: ImputeStrategy,
    /// Fill value for each feature.
    pub statistics: Vec<f64>,
    pub n_features: usize,
}

/// SimpleImputer transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct SimpleImputer {
    strategy: ImputeStrategy,
}

impl SimpleImputer {
    /// Create a new SimpleImputer with the specified strategy.
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &ImputeStrategy {
        &self.strategy
    }
}

fn column_statistic(column: ArrayView1<'_, f64>, strategy: &ImputeStrategy) -> f64 {
    let mut observed: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();

    if let ImputeStrategy::Constant(value) = strategy {
        return *value;
    }
    if observed.is_empty() {
        return 0.0;
    }

    match strategy {
        ImputeStrategy::Mean => observed.iter().sum::<f64>() / observed.len() as f64,
        ImputeStrategy::Median => {
            observed.sort_by(f64::total_cmp);
            let n = observed.len();
            if n % 2 == 0 {
                (observed[n / 2 - 1] + observed[n / 2]) / 2.0
            } else {
                observed[n / 2]
            }
        }
        ImputeStrategy::MostFrequent => {
            observed.sort_by(f64::total_cmp);
            let mut best = observed[0];
            let mut best_count = 0usize;
            let mut i = 0;
            while i < observed.len() {
                let value = observed[i];
                let run = observed[i..].iter().take_while(|&&v| v == value).count();
                // Ascending order: only a strictly longer run replaces the smaller value.
                if run > best_count {
                    best = value;
                    best_count = run;
                }
                i += run;
            }
            best
        }
        ImputeStrategy::Constant(value) => *value,
    }
}

impl Transformer for SimpleImputer {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = SimpleImputerParams;
    type Fitted = FittedSimpleImputer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.nrows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit SimpleImputer on empty data".to_string(),
            ));
        }

        let statistics = data
            .axis_iter(Axis(1))
            .map(|column| column_statistic(column, &self.strategy))
            .collect();

        Ok(FittedSimpleImputer {
            strategy: self.strategy.clone(),
            statistics,
            n_features: data.ncols(),
        })
    }
}

/// Fitted SimpleImputer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedSimpleImputer {
    strategy: ImputeStrategy,
    statistics: Vec<f64>,
    n_features: usize,
}

impl FittedSimpleImputer {
    /// Fill value learned for each feature.
    pub fn statistics(&self) -> &[f64] {
        &self.statistics
    }
}

impl FittedTransformer for FittedSimpleImputer {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = SimpleImputerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        if data.ncols() != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: data.ncols(),
            });
        }

        let mut result = data.clone();
        for (mut column, &fill) in result.axis_iter_mut(Axis(1)).zip(&self.statistics) {
            column.mapv_inplace(|v| if v.is_nan() { fill } else { v });
        }
        Ok(result)
    }

    fn inverse_transform(&self, _data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        Err(PreprocessingError::InvalidParameter(
            "SimpleImputer does not support inverse_transform: imputed positions are not recorded"
                .to_string(),
        ))
    }

    fn extract_params(&self) -> Self::Params {
        SimpleImputerParams {
            strategy: self.strategy.clone(),
            statistics: self.statistics.clone(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.statistics.len() != params.n_features {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} statistics", params.n_features),
                got: format!("{} statistics", params.statistics.len()),
            });
        }
        Ok(Self {
            strategy: params.strategy,
            statistics: params.statistics,
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

    fn data_with_gaps() -> Array2<f64> {
        // [[1, NaN], [NaN, 4], [3, 4], [3, 10]]
        array![
            [1.0, f64::NAN],
            [f64::NAN, 4.0],
            [3.0, 4.0],
            [3.0, 10.0]
        ]
    }

    #[test]
    fn test_mean_strategy() {
        let fitted = SimpleImputer::new(ImputeStrategy::Mean)
            .fit(&data_with_gaps())
            .unwrap();
        let stats = fitted.statistics();
        assert!((stats[0] - 7.0 / 3.0).abs() < 1e-12);
        assert!((stats[1] - 6.0).abs() < 1e-12);

        let imputed = fitted.transform(&data_with_gaps()).unwrap();
        assert!((imputed[[1, 0]] - 7.0 / 3.0).abs() < 1e-12);
        assert_eq!(imputed[[0, 1]], 6.0);
        assert!(imputed.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_median_strategy() {
        let fitted = SimpleImputer::new(ImputeStrategy::Median)
            .fit(&data_with_gaps())
            .unwrap();
        assert_eq!(fitted.statistics(), &[3.0, 4.0]);
    }

    #[test]
    fn test_most_frequent_ties_pick_smallest() {
        let data = array![[2.0], [1.0], [2.0], [1.0], [5.0]];
        let fitted = SimpleImputer::new(ImputeStrategy::MostFrequent)
            .fit(&data)
            .unwrap();
        assert_eq!(fitted.statistics(), &[1.0]);
    }

    #[test]
    fn test_constant_strategy() {
        let fitted = SimpleImputer::new(ImputeStrategy::Constant(-1.0))
            .fit(&data_with_gaps())
            .unwrap();
        let imputed = fitted.transform(&data_with_gaps()).unwrap();
        assert_eq!(imputed[[1, 0]], -1.0);
        assert_eq!(imputed[[0, 1]], -1.0);
    }

    #[test]
    fn test_all_missing_column_imputes_zero() {
        let data = array![[f64::NAN, 1.0], [f64::NAN, 2.0]];
        let fitted = SimpleImputer::new(ImputeStrategy::Mean).fit(&data).unwrap();
        assert_eq!(fitted.statistics()[0], 0.0);
    }

    #[test]
    fn test_empty_data() {
        let data = Array2::<f64>::zeros((0, 2));
        assert!(matches!(
            SimpleImputer::default().fit(&data),
            Err(PreprocessingError::EmptyData(_))
        ));
    }

    #[test]
    fn test_feature_mismatch() {
        let fitted = SimpleImputer::default().fit(&data_with_gaps()).unwrap();
        let wrong = Array2::<f64>::zeros((1, 3));
        assert!(matches!(
            fitted.transform(&wrong),
            Err(PreprocessingError::FeatureMismatch {
                expected_features: 2,
                got_features: 3
            })
        ));
    }

    #[test]
    fn test_params_round_trip() {
        let fitted = SimpleImputer::default().fit(&data_with_gaps()).unwrap();
        let restored = FittedSimpleImputer::from_params(fitted.extract_params()).unwrap();
        let a = fitted.transform(&data_with_gaps()).unwrap();
        let b = restored.transform(&data_with_gaps()).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_save_load_file() {
        let fitted = SimpleImputer::default().fit(&data_with_gaps()).unwrap();
        let temp_file = std::env::temp_dir().join("pricing_test_simple_imputer.bin");
        fitted.save_to_file(&temp_file).unwrap();

        let loaded = FittedSimpleImputer::load_from_file(&temp_file).unwrap();
        assert_eq!(loaded.n_features_in(), 2);
        assert_eq!(loaded.statistics(), fitted.statistics());

        std::fs::remove_file(temp_file).ok();
    }
}
