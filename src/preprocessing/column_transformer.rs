//! ColumnTransformer over a [`Frame`].
//!
//! Routes named numeric columns through a [`NumericPipeline`] and named
//! categorical columns through a [`CategoricalPipeline`], then concatenates
//! the numeric block followed by the categorical block. The column order is
//! fixed at construction and stored with the fitted parameters, so training
//! and serving always lay out features identically.

use crate::dataset::Frame;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::pipeline::{
    CategoricalPipeline, CategoricalPipelineParams, FittedCategoricalPipeline,
    FittedNumericPipeline, NumericPipeline, NumericPipelineParams,
};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::schema::{CATEGORICAL_FEATURES, NUMERIC_FEATURES};
use ndarray::{concatenate, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Unfitted column transformer.
#[derive(Clone, Debug)]
pub struct ColumnTransformer {
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
    numeric: NumericPipeline,
    categorical: CategoricalPipeline,
}

impl ColumnTransformer {
    pub fn new(numeric_columns: &[&str], categorical_columns: &[&str]) -> Self {
        Self {
            numeric_columns: numeric_columns.iter().map(|c| c.to_string()).collect(),
            categorical_columns: categorical_columns.iter().map(|c| c.to_string()).collect(),
            numeric: NumericPipeline::default(),
            categorical: CategoricalPipeline::default(),
        }
    }

    /// The listing feature layout with default branch pipelines.
    pub fn for_listings() -> Self {
        Self::new(&NUMERIC_FEATURES, &CATEGORICAL_FEATURES)
    }

    pub fn with_numeric(mut self, pipeline: NumericPipeline) -> Self {
        self.numeric = pipeline;
        self
    }

    pub fn with_categorical(mut self, pipeline: CategoricalPipeline) -> Self {
        self.categorical = pipeline;
        self
    }
}

fn names(columns: &[String]) -> Vec<&str> {
    columns.iter().map(String::as_str).collect()
}

/// Serializable parameters for a fitted ColumnTransformer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColumnTransformerParams {
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub numeric: NumericPipelineParams,
    pub categorical: CategoricalPipelineParams,
}

/// Fitted ColumnTransformer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedColumnTransformer {
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
    numeric: FittedNumericPipeline,
    categorical: FittedCategoricalPipeline,
}

impl FittedColumnTransformer {
    pub fn n_features_out(&self) -> usize {
        self.numeric.n_features_in() + self.categorical.n_features_out()
    }

    pub fn numeric(&self) -> &FittedNumericPipeline {
        &self.numeric
    }

    pub fn categorical(&self) -> &FittedCategoricalPipeline {
        &self.categorical
    }

    /// Output names: `num__<column>` then `cat__<column>_<category>`.
    pub fn feature_names_out(&self) -> Vec<String> {
        let numeric = self.numeric_columns.iter().map(|c| format!("num__{}", c));
        let categorical = self
            .categorical
            .encoder()
            .feature_names_out(&names(&self.categorical_columns))
            .into_iter()
            .map(|c| format!("cat__{}", c));
        numeric.chain(categorical).collect()
    }
}

impl Transformer for ColumnTransformer {
    type Input = Frame;
    type Output = Array2<f64>;
    type Params = ColumnTransformerParams;
    type Fitted = FittedColumnTransformer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit ColumnTransformer on an empty frame".to_string(),
            ));
        }

        let numeric = self
            .numeric
            .fit(&data.numeric_matrix(&names(&self.numeric_columns))?)?;
        let categorical = self
            .categorical
            .fit(&data.categorical_matrix(&names(&self.categorical_columns))?)?;

        Ok(FittedColumnTransformer {
            numeric_columns: self.numeric_columns.clone(),
            categorical_columns: self.categorical_columns.clone(),
            numeric,
            categorical,
        })
    }
}

impl FittedTransformer for FittedColumnTransformer {
    type Input = Frame;
    type Output = Array2<f64>;
    type Params = ColumnTransformerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let numeric = self
            .numeric
            .transform(&data.numeric_matrix(&names(&self.numeric_columns))?)?;
        let categorical = self
            .categorical
            .transform(&data.categorical_matrix(&names(&self.categorical_columns))?)?;

        Ok(concatenate(Axis(1), &[numeric.view(), categorical.view()])?)
    }

    fn inverse_transform(&self, _data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        Err(PreprocessingError::InvalidParameter(
            "ColumnTransformer does not support inverse_transform".to_string(),
        ))
    }

    fn extract_params(&self) -> Self::Params {
        ColumnTransformerParams {
            numeric_columns: self.numeric_columns.clone(),
            categorical_columns: self.categorical_columns.clone(),
            numeric: self.numeric.extract_params(),
            categorical: self.categorical.extract_params(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let numeric = FittedNumericPipeline::from_params(params.numeric)?;
        let categorical = FittedCategoricalPipeline::from_params(params.categorical)?;

        if numeric.n_features_in() != params.numeric_columns.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: params.numeric_columns.len(),
                got_features: numeric.n_features_in(),
            });
        }
        if categorical.n_features_in() != params.categorical_columns.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: params.categorical_columns.len(),
                got_features: categorical.n_features_in(),
            });
        }

        Ok(Self {
            numeric_columns: params.numeric_columns,
            categorical_columns: params.categorical_columns,
            numeric,
            categorical,
        })
    }

    /// Number of input columns read from the frame.
    fn n_features_in(&self) -> usize {
        self.numeric_columns.len() + self.categorical_columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;
    use crate::schema::fixtures::bmw_suv;
    use crate::schema::{CarType, Fuel, ModelKey};
    use crate::serialization::SerializableParams;

    fn small_fleet() -> Frame {
        let mut a = bmw_suv();
        let mut b = bmw_suv();
        let mut c = bmw_suv();
        a.mileage = 10_000;
        b.mileage = 20_000;
        b.model_key = ModelKey::Audi;
        b.fuel = Fuel::Petrol;
        c.mileage = 30_000;
        c.car_type = CarType::Van;
        c.options.has_gps = true;
        Frame::from_records(&[a, b, c])
    }

    #[test]
    fn test_layout_and_names() {
        let fitted = ColumnTransformer::for_listings().fit(&small_fleet()).unwrap();
        // 9 numeric + BMW (Audi dropped) + petrol (diesel dropped) + van (suv dropped)
        assert_eq!(fitted.n_features_out(), 12);
        let names = fitted.feature_names_out();
        assert_eq!(names[0], "num__mileage");
        assert_eq!(names[8], "num__winter_tires");
        assert_eq!(
            &names[9..],
            &["cat__model_key_BMW", "cat__fuel_petrol", "cat__car_type_van"]
        );
    }

    #[test]
    fn test_transform_values() {
        let frame = small_fleet();
        let out = ColumnTransformer::for_listings().fit_transform(&frame).unwrap();
        assert_eq!(out.dim(), (3, 12));

        // mileage [10k, 20k, 30k] standardizes to [-s, 0, s]
        assert_eq!(out[[1, 0]], 0.0);
        assert!((out[[0, 0]] + out[[2, 0]]).abs() < 1e-12);
        // engine_power is constant
        assert!(out.column(1).iter().all(|&v| v == 0.0));
        // one-hot block
        assert_eq!(out.row(0).slice(ndarray::s![9..]).to_vec(), vec![1.0, 0.0, 0.0]);
        assert_eq!(out.row(1).slice(ndarray::s![9..]).to_vec(), vec![0.0, 1.0, 0.0]);
        assert_eq!(out.row(2).slice(ndarray::s![9..]).to_vec(), vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_unseen_category_gives_zero_block() {
        let fitted = ColumnTransformer::for_listings().fit(&small_fleet()).unwrap();
        let mut probe = bmw_suv();
        probe.model_key = ModelKey::Ferrari;
        probe.fuel = Fuel::Electro;
        let out = fitted.transform(&Frame::from_records(&[probe])).unwrap();
        assert_eq!(out.row(0).slice(ndarray::s![9..]).to_vec(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_column_fails() {
        let fitted = ColumnTransformer::for_listings().fit(&small_fleet()).unwrap();
        let mut frame = small_fleet();
        frame.drop_column("car_type");
        assert!(matches!(
            fitted.transform(&frame),
            Err(PreprocessingError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_missing_values_are_imputed() {
        let frame = small_fleet();
        let fitted = ColumnTransformer::for_listings().fit(&frame).unwrap();

        let mut gappy = Frame::new();
        for name in frame.column_names() {
            let column = match frame.column(name).unwrap() {
                Column::Numeric(_) => Column::Numeric(vec![None]),
                Column::Categorical(_) => Column::Categorical(vec![None]),
            };
            gappy.push_column(name, column).unwrap();
        }
        let out = fitted.transform(&gappy).unwrap();
        assert!(out.iter().all(|v| v.is_finite()));
        // mean mileage imputes to the centre
        assert_eq!(out[[0, 0]], 0.0);
    }

    #[test]
    fn test_round_trip_is_bit_identical() {
        let frame = small_fleet();
        let fitted = ColumnTransformer::for_listings().fit(&frame).unwrap();

        let bytes = fitted.extract_params().to_bytes().unwrap();
        let params = ColumnTransformerParams::from_bytes(&bytes).unwrap();
        let restored = FittedColumnTransformer::from_params(params).unwrap();

        let a = fitted.transform(&frame).unwrap();
        let b = restored.transform(&frame).unwrap();
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
        assert_eq!(restored.feature_names_out(), fitted.feature_names_out());
    }
}
