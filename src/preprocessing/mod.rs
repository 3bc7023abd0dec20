//! Data preprocessing transformers.
//!
//! Every stage follows the same type-state split as the regressor: an
//! unfitted configuration implementing [`Transformer`] and a fitted value
//! implementing [`FittedTransformer`] that can be persisted and reloaded.
//!
//! # Stages
//!
//! - [`SimpleImputer`], [`CategoricalImputer`]: fill missing values
//! - [`StandardScaler`]: z-score standardization with training statistics
//! - [`OneHotEncoder`]: indicator columns for string categories
//! - [`NumericPipeline`], [`CategoricalPipeline`]: imputer then scaler/encoder
//! - [`ColumnTransformer`]: both branches over a [`Frame`](crate::dataset::Frame)
//!
//! # Example
//!
//! ```ignore
//! use getaround_pricing::preprocessing::{ColumnTransformer, FittedTransformer, Transformer};
//!
//! let fitted = ColumnTransformer::for_listings().fit(&train_frame)?;
//! fitted.save_to_file("preprocessor.bin")?;
//! let x = fitted.transform(&test_frame)?;
//! ```

pub mod column_transformer;
pub mod encoding;
pub mod error;
pub mod imputation;
pub mod pipeline;
pub mod scaling;
pub mod traits;

pub use column_transformer::{ColumnTransformer, ColumnTransformerParams, FittedColumnTransformer};
pub use encoding::{
    DropPolicy, FittedOneHotEncoder, HandleUnknown, OneHotEncoder, OneHotEncoderParams,
};
pub use error::PreprocessingError;
pub use imputation::{
    CategoricalImputer, CategoricalImputerParams, CategoricalStrategy, FittedCategoricalImputer,
    FittedSimpleImputer, ImputeStrategy, SimpleImputer, SimpleImputerParams,
};
pub use pipeline::{
    CategoricalPipeline, CategoricalPipelineParams, FittedCategoricalPipeline,
    FittedNumericPipeline, NumericPipeline, NumericPipelineParams,
};
pub use scaling::{
    FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams,
};
pub use traits::{FittedTransformer, Transformer};
