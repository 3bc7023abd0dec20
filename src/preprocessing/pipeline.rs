//! Two-stage branch pipelines.
//!
//! Each branch chains an imputer into the transformer that consumes its
//! dense output, so the type system guarantees the second stage never sees a
//! missing value:
//!
//! - [`NumericPipeline`]: `SimpleImputer` → `StandardScaler`
//! - [`CategoricalPipeline`]: `CategoricalImputer` → `OneHotEncoder`

use crate::preprocessing::encoding::{
    DropPolicy, FittedOneHotEncoder, HandleUnknown, OneHotEncoder, OneHotEncoderParams,
};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::imputation::{
    CategoricalImputer, CategoricalImputerParams, CategoricalStrategy, FittedCategoricalImputer,
    FittedSimpleImputer, ImputeStrategy, SimpleImputer, SimpleImputerParams,
};
use crate::preprocessing::scaling::{FittedStandardScaler, StandardScaler, StandardScalerParams};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Mean imputation followed by standardization.
#[derive(Clone, Debug)]
pub struct NumericPipeline {
    imputer: SimpleImputer,
    scaler: StandardScaler,
}

impl Default for NumericPipeline {
    fn default() -> Self {
        Self {
            imputer: SimpleImputer::new(ImputeStrategy::Mean),
            scaler: StandardScaler::new(),
        }
    }
}

impl NumericPipeline {
    pub fn new(imputer: SimpleImputer, scaler: StandardScaler) -> Self {
        Self { imputer, scaler }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NumericPipelineParams {
    pub imputer: SimpleImputerParams,
    pub scaler: StandardScalerParams,
}

#[derive(Clone, Debug)]
pub struct FittedNumericPipeline {
    imputer: FittedSimpleImputer,
    scaler: FittedStandardScaler,
}

impl FittedNumericPipeline {
    pub fn imputer(&self) -> &FittedSimpleImputer {
        &self.imputer
    }

    pub fn scaler(&self) -> &FittedStandardScaler {
        &self.scaler
    }
}

impl Transformer for NumericPipeline {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = NumericPipelineParams;
    type Fitted = FittedNumericPipeline;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let imputer = self.imputer.fit(data)?;
        let imputed = imputer.transform(data)?;
        let scaler = self.scaler.fit(&imputed)?;
        Ok(FittedNumericPipeline { imputer, scaler })
    }
}

impl FittedTransformer for FittedNumericPipeline {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = NumericPipelineParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let imputed = self.imputer.transform(data)?;
        self.scaler.transform(&imputed)
    }

    /// Undoes the scaling only; imputed cells keep their fill value.
    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        self.scaler.inverse_transform(data)
    }

    fn extract_params(&self) -> Self::Params {
        NumericPipelineParams {
            imputer: self.imputer.extract_params(),
            scaler: self.scaler.extract_params(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let imputer = FittedSimpleImputer::from_params(params.imputer)?;
        let scaler = FittedStandardScaler::from_params(params.scaler)?;
        if imputer.n_features_in() != scaler.n_features_in() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: imputer.n_features_in(),
                got_features: scaler.n_features_in(),
            });
        }
        Ok(Self { imputer, scaler })
    }

    fn n_features_in(&self) -> usize {
        self.imputer.n_features_in()
    }
}

/// Most-frequent imputation followed by one-hot encoding.
#[derive(Clone, Debug)]
pub struct CategoricalPipeline {
    imputer: CategoricalImputer,
    encoder: OneHotEncoder,
}

impl Default for CategoricalPipeline {
    /// First category dropped, unseen categories encoded as zeros.
    fn default() -> Self {
        Self {
            imputer: CategoricalImputer::new(CategoricalStrategy::MostFrequent),
            encoder: OneHotEncoder::new()
                .with_drop(DropPolicy::First)
                .with_handle_unknown(HandleUnknown::Ignore),
        }
    }
}

impl CategoricalPipeline {
    pub fn new(imputer: CategoricalImputer, encoder: OneHotEncoder) -> Self {
        Self { imputer, encoder }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoricalPipelineParams {
    pub imputer: CategoricalImputerParams,
    pub encoder: OneHotEncoderParams,
}

#[derive(Clone, Debug)]
pub struct FittedCategoricalPipeline {
    imputer: FittedCategoricalImputer,
    encoder: FittedOneHotEncoder,
}

impl FittedCategoricalPipeline {
    pub fn encoder(&self) -> &FittedOneHotEncoder {
        &self.encoder
    }

    pub fn n_features_out(&self) -> usize {
        self.encoder.n_features_out()
    }
}

impl Transformer for CategoricalPipeline {
    type Input = Array2<Option<String>>;
    type Output = Array2<f64>;
    type Params = CategoricalPipelineParams;
    type Fitted = FittedCategoricalPipeline;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let imputer = self.imputer.fit(data)?;
        let imputed = imputer.transform(data)?;
        let encoder = self.encoder.fit(&imputed)?;
        Ok(FittedCategoricalPipeline { imputer, encoder })
    }
}

impl FittedTransformer for FittedCategoricalPipeline {
    type Input = Array2<Option<String>>;
    type Output = Array2<f64>;
    type Params = CategoricalPipelineParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let imputed = self.imputer.transform(data)?;
        self.encoder.transform(&imputed)
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        let labels = self.encoder.inverse_transform(data)?;
        self.imputer.inverse_transform(&labels)
    }

    fn extract_params(&self) -> Self::Params {
        CategoricalPipelineParams {
            imputer: self.imputer.extract_params(),
            encoder: self.encoder.extract_params(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let imputer = FittedCategoricalImputer::from_params(params.imputer)?;
        let encoder = FittedOneHotEncoder::from_params(params.encoder)?;
        if imputer.n_features_in() != encoder.n_features_in() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: imputer.n_features_in(),
                got_features: encoder.n_features_in(),
            });
        }
        Ok(Self { imputer, encoder })
    }

    fn n_features_in(&self) -> usize {
        self.imputer.n_features_in()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_numeric_pipeline_imputes_then_scales() {
        // Column mean of [1, 3] is 2; after imputation the column is [1, 2, 3].
        let data = array![[1.0], [f64::NAN], [3.0]];
        let fitted = NumericPipeline::default().fit(&data).unwrap();
        let out = fitted.transform(&data).unwrap();

        let std = (2.0f64 / 3.0).sqrt();
        assert!((out[[0, 0]] + 1.0 / std).abs() < 1e-12);
        assert_eq!(out[[1, 0]], 0.0);
        assert!((out[[2, 0]] - 1.0 / std).abs() < 1e-12);
    }

    #[test]
    fn test_categorical_pipeline_defaults() {
        let data = array![
            [Some("diesel".to_string())],
            [Some("petrol".to_string())],
            [None]
        ];
        let fitted = CategoricalPipeline::default().fit(&data).unwrap();
        // Missing imputes "diesel" (tie, smallest), which is the dropped category.
        assert_eq!(fitted.n_features_out(), 1);
        let out = fitted.transform(&data).unwrap();
        assert_eq!(out.column(0).to_vec(), vec![0.0, 1.0, 0.0]);

        let unseen = fitted.transform(&array![[Some("electro".to_string())]]).unwrap();
        assert_eq!(unseen.row(0).to_vec(), vec![0.0]);
    }

    #[test]
    fn test_params_round_trip() {
        let data = array![[1.0, 5.0], [2.0, f64::NAN], [4.0, 5.0]];
        let fitted = NumericPipeline::default().fit(&data).unwrap();
        let restored = FittedNumericPipeline::from_params(fitted.extract_params()).unwrap();
        let a = fitted.transform(&data).unwrap();
        let b = restored.transform(&data).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }
}
