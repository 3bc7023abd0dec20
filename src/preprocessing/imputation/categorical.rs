//! Imputer for categorical (string) columns.
//!
//! Input cells are `Option<String>`, `None` being a missing value. The output
//! is a dense `Array2<String>`, so an encoder downstream never sees a gap.

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Strategy for filling missing categories.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum CategoricalStrategy {
    /// Most frequent label; ties resolve to the lexicographically smallest.
    #[default]
    MostFrequent,
    /// A fixed label.
    Constant(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoricalImputerParams {
    pub strategy: CategoricalStrategy,
    pub statistics: Vec<String>,
    pub n_features: usize,
}

/// CategoricalImputer transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct CategoricalImputer {
    strategy: CategoricalStrategy,
}

impl CategoricalImputer {
    pub fn new(strategy: CategoricalStrategy) -> Self {
        Self { strategy }
    }
}

fn most_frequent(column: ArrayView1<'_, Option<String>>) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in column.iter().flatten() {
        *counts.entry(value.as_str()).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((value, count)),
        }
    }
    best.map(|(value, _)| value.to_string())
}

impl Transformer for CategoricalImputer {
    type Input = Array2<Option<String>>;
    type Output = Array2<String>;
    type Params = CategoricalImputerParams;
    type Fitted = FittedCategoricalImputer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.nrows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit CategoricalImputer on empty data".to_string(),
            ));
        }

        let mut statistics = Vec::with_capacity(data.ncols());
        for (idx, column) in data.axis_iter(Axis(1)).enumerate() {
            let fill = match &self.strategy {
                CategoricalStrategy::Constant(label) => label.clone(),
                CategoricalStrategy::MostFrequent => most_frequent(column).ok_or_else(|| {
                    PreprocessingError::MissingValues(format!(
                        "categorical column {} has no observed value",
                        idx
                    ))
                })?,
            };
            statistics.push(fill);
        }

        Ok(FittedCategoricalImputer {
            strategy: self.strategy.clone(),
            statistics,
            n_features: data.ncols(),
        })
    }
}

/// Fitted CategoricalImputer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedCategoricalImputer {
    strategy: CategoricalStrategy,
    statistics: Vec<String>,
    n_features: usize,
}

impl FittedCategoricalImputer {
    pub fn statistics(&self) -> &[String] {
        &self.statistics
    }
}

impl FittedTransformer for FittedCategoricalImputer {
    type Input = Array2<Option<String>>;
    type Output = Array2<String>;
    type Params = CategoricalImputerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        if data.ncols() != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: data.ncols(),
            });
        }

        Ok(Array2::from_shape_fn(data.dim(), |(row, col)| {
            match &data[[row, col]] {
                Some(value) => value.clone(),
                None => self.statistics[col].clone(),
            }
        }))
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        if data.ncols() != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: data.ncols(),
            });
        }
        Ok(data.mapv(Some))
    }

    fn extract_params(&self) -> Self::Params {
        CategoricalImputerParams {
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

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn test_most_frequent_fills_gaps() {
        let data = array![
            [s("diesel"), s("black")],
            [None, s("grey")],
            [s("diesel"), None],
            [s("petrol"), s("black")]
        ];
        let fitted = CategoricalImputer::default().fit(&data).unwrap();
        assert_eq!(fitted.statistics(), &["diesel", "black"]);

        let out = fitted.transform(&data).unwrap();
        assert_eq!(out[[1, 0]], "diesel");
        assert_eq!(out[[2, 1]], "black");
        assert_eq!(out[[3, 0]], "petrol");
    }

    #[test]
    fn test_ties_pick_lexicographically_smallest() {
        let data = array![[s("suv")], [s("coupe")], [s("suv")], [s("coupe")], [None]];
        let fitted = CategoricalImputer::default().fit(&data).unwrap();
        assert_eq!(fitted.statistics(), &["coupe"]);
    }

    #[test]
    fn test_constant_strategy() {
        let data = array![[None], [s("red")]];
        let fitted = CategoricalImputer::new(CategoricalStrategy::Constant("missing".into()))
            .fit(&data)
            .unwrap();
        assert_eq!(fitted.transform(&data).unwrap()[[0, 0]], "missing");
    }

    #[test]
    fn test_all_missing_column_is_rejected() {
        let data: Array2<Option<String>> = array![[None], [None]];
        assert!(matches!(
            CategoricalImputer::default().fit(&data),
            Err(PreprocessingError::MissingValues(_))
        ));
    }

    #[test]
    fn test_params_round_trip() {
        let data = array![[s("a"), s("x")], [s("b"), s("x")]];
        let fitted = CategoricalImputer::default().fit(&data).unwrap();
        let restored = FittedCategoricalImputer::from_params(fitted.extract_params()).unwrap();
        assert_eq!(restored.statistics(), fitted.statistics());
        assert_eq!(restored.n_features_in(), 2);
    }
}
