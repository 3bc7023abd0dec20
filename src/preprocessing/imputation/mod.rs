//! Imputation transformers for handling missing values.
//!
//! | Transformer | Input | Strategies |
//! |-------------|-------|------------|
//! | [`SimpleImputer`] | NaN-coded `Array2<f64>` | mean, median, most_frequent, constant |
//! | [`CategoricalImputer`] | `Array2<Option<String>>` | most_frequent, constant |

pub mod categorical;
pub mod simple;

pub use categorical::{
    CategoricalImputer, CategoricalImputerParams, CategoricalStrategy, FittedCategoricalImputer,
};
pub use simple::{FittedSimpleImputer, ImputeStrategy, SimpleImputer, SimpleImputerParams};
