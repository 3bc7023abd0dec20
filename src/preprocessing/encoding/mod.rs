//! Categorical feature encoding.
//!
//! Encoders take already-imputed string categories (`Array2<String>`) and
//! produce numeric indicator matrices.

mod one_hot;

pub use one_hot::{FittedOneHotEncoder, OneHotEncoder, OneHotEncoderParams};

use serde::{Deserialize, Serialize};

/// Strategy for handling unknown categories during transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleUnknown {
    /// Fail when an unknown category is encountered.
    #[default]
    Error,
    /// Encode an unknown category as an all-zero block.
    Ignore,
}

/// Which category of each column, if any, gets no indicator column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropPolicy {
    /// Keep one indicator per category.
    #[default]
    None,
    /// Drop the first (smallest) category of every column.
    First,
}
