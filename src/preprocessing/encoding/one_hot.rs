//! One-hot encoding for categorical features.
//!
//! Each input column contributes one indicator per learned category, laid out
//! in sorted category order. With [`DropPolicy::First`] the smallest category
//! of every column has no indicator, so it encodes as an all-zero block.

use crate::preprocessing::encoding::{DropPolicy, HandleUnknown};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One-hot encoder for string categories.
///
/// # Example
/// ```ignore
/// use getaround_pricing::preprocessing::{DropPolicy, HandleUnknown, OneHotEncoder, Transformer};
///
/// // fuel: ["diesel", "petrol", "diesel"]
/// let fitted = OneHotEncoder::new()
///     .with_drop(DropPolicy::First)
///     .with_handle_unknown(HandleUnknown::Ignore)
///     .fit(&fuel)?;
/// // "diesel" is dropped: [[0], [1], [0]]
/// let encoded = fitted.transform(&fuel)?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct OneHotEncoder {
    handle_unknown: HandleUnknown,
    drop: DropPolicy,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }

    /// Set which category, if any, gets no indicator column.
    pub fn with_drop(mut self, drop: DropPolicy) -> Self {
        self.drop = drop;
        self
    }
}

/// Serializable parameters for a fitted OneHotEncoder.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OneHotEncoderParams {
    /// Sorted categories for each input column.
    pub categories: Vec<Vec<String>>,
    pub handle_unknown: HandleUnknown,
    pub drop: DropPolicy,
}

/// Fitted OneHotEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedOneHotEncoder {
    categories: Vec<Vec<String>>,
    /// Output width of each input column after dropping.
    n_values: Vec<usize>,
    n_features_out: usize,
    handle_unknown: HandleUnknown,
    drop: DropPolicy,
}

impl FittedOneHotEncoder {
    /// Categories learned for each feature, sorted.
    pub fn categories(&self) -> &[Vec<String>] {
        &self.categories
    }

    pub fn n_features_out(&self) -> usize {
        self.n_features_out
    }

    /// Output names `<input>_<category>`, skipping dropped categories.
    pub fn feature_names_out(&self, input_names: &[&str]) -> Vec<String> {
        let skip = self.skipped();
        input_names
            .iter()
            .zip(&self.categories)
            .flat_map(|(name, cats)| {
                cats.iter()
                    .skip(skip.min(cats.len()))
                    .map(move |cat| format!("{}_{}", name, cat))
            })
            .collect()
    }

    fn skipped(&self) -> usize {
        match self.drop {
            DropPolicy::None => 0,
            DropPolicy::First => 1,
        }
    }

    fn build(
        categories: Vec<Vec<String>>,
        handle_unknown: HandleUnknown,
        drop: DropPolicy,
    ) -> Self {
        let skip = match drop {
            DropPolicy::None => 0,
            DropPolicy::First => 1,
        };
        let n_values: Vec<usize> = categories
            .iter()
            .map(|cats| cats.len().saturating_sub(skip))
            .collect();
        let n_features_out = n_values.iter().sum();
        Self {
            categories,
            n_values,
            n_features_out,
            handle_unknown,
            drop,
        }
    }
}

impl Transformer for OneHotEncoder {
    type Input = Array2<String>;
    type Output = Array2<f64>;
    type Params = OneHotEncoderParams;
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.nrows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit OneHotEncoder on empty data".to_string(),
            ));
        }

        let categories = data
            .axis_iter(Axis(1))
            .map(|column| {
                column
                    .iter()
                    .cloned()
                    .collect::<BTreeSet<String>>()
                    .into_iter()
                    .collect()
            })
            .collect();

        Ok(FittedOneHotEncoder::build(
            categories,
            self.handle_unknown,
            self.drop,
        ))
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Input = Array2<String>;
    type Output = Array2<f64>;
    type Params = OneHotEncoderParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        if data.ncols() != self.categories.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.categories.len(),
                got_features: data.ncols(),
            });
        }

        let skip = self.skipped();
        let mut result = Array2::zeros((data.nrows(), self.n_features_out));

        for (row, values) in data.axis_iter(Axis(0)).enumerate() {
            let mut offset = 0;
            for (col, value) in values.iter().enumerate() {
                match self.categories[col].binary_search(value) {
                    Ok(idx) if idx >= skip => {
                        result[[row, offset + idx - skip]] = 1.0;
                    }
                    Ok(_) => {}
                    Err(_) => {
                        if self.handle_unknown == HandleUnknown::Error {
                            return Err(PreprocessingError::UnknownCategory {
                                column: col,
                                value: value.clone(),
                            });
                        }
                    }
                }
                offset += self.n_values[col];
            }
        }

        Ok(result)
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        if data.ncols() != self.n_features_out {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features_out,
                got_features: data.ncols(),
            });
        }

        let skip = self.skipped();
        let n_in = self.categories.len();
        let mut result = Array2::from_elem((data.nrows(), n_in), String::new());

        for (row, encoded) in data.axis_iter(Axis(0)).enumerate() {
            let mut offset = 0;
            for col in 0..n_in {
                let width = self.n_values[col];
                let active = (0..width).find(|&i| encoded[offset + i] > 0.5);
                result[[row, col]] = match (active, skip) {
                    (Some(i), _) => self.categories[col][i + skip].clone(),
                    (None, 1) if !self.categories[col].is_empty() => {
                        self.categories[col][0].clone()
                    }
                    _ => {
                        return Err(PreprocessingError::InvalidParameter(format!(
                            "row {} has no active indicator for column {}",
                            row, col
                        )))
                    }
                };
                offset += width;
            }
        }

        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        OneHotEncoderParams {
            categories: self.categories.clone(),
            handle_unknown: self.handle_unknown,
            drop: self.drop,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        for (col, cats) in params.categories.iter().enumerate() {
            if cats.windows(2).any(|w| w[0] >= w[1]) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "categories of column {} are not sorted and unique",
                    col
                )));
            }
        }
        Ok(Self::build(
            params.categories,
            params.handle_unknown,
            params.drop,
        ))
    }

    fn n_features_in(&self) -> usize {
        self.categories.len()
    }
}
