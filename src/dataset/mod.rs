//! Datasets: the tabular [`Frame`] read from CSV, and the numeric
//! [`Dataset`] the trainer iterates in mini-batches.
//!
//! # Core Concepts
//!
//! - **Frame**: named, typed columns with missing values, before preprocessing.
//! - **Dataset**: `(X, y)` pairs after preprocessing, where `X` has shape
//!   `(n_samples, n_features)` and `y` has shape `(n_samples,)`.
//! - **Batch**: a contiguous range of samples for mini-batch gradient descent.
//!
//! # Example
//!
//! ```ignore
//! use getaround_pricing::dataset::{Dataset, InMemoryDataset};
//!
//! let dataset = InMemoryDataset::new(x, y)?;
//! for batch in dataset.batches(32) {
//!     let (x_batch, y_batch) = batch?;
//! }
//! ```

use ndarray::{Array1, Array2};
use std::{fmt::Debug, ops::Range};

pub mod frame;
pub mod loader;
pub mod memory;
pub mod split;
pub mod synthetic;

pub use self::frame::{Column, ColumnKind, Frame};
pub use self::loader::{load_delays, load_listings, read_delays, read_listings, DelayRecord};
pub use self::memory::InMemoryDataset;
pub use self::split::train_test_split;

/// Source of `(X, y)` batches for training.
pub trait Dataset {
    /// Error type returned when accessing data.
    type Error: Debug + 'static;

    /// Total number of samples, if known.
    fn len(&self) -> Option<usize>;

    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Iterator over consecutive batches; the last one may be smaller.
    /// A `batch_size` of 0 is treated as 1.
    fn batches(&self, batch_size: usize) -> DatasetBatchIter<'_, Self>
    where
        Self: Sized,
    {
        DatasetBatchIter {
            dataset: self,
            batch_size: batch_size.max(1),
            current: 0,
        }
    }

    /// Load the samples in `range` as a feature matrix and target vector.
    fn get_batch(&self, range: Range<usize>) -> Result<(Array2<f64>, Array1<f64>), Self::Error>;
}

/// Iterator over dataset batches, created by [`Dataset::batches`].
pub struct DatasetBatchIter<'a, D: ?Sized> {
    dataset: &'a D,
    batch_size: usize,
    /// Index of the next sample to yield.
    current: usize,
}

impl<'a, D: Dataset> Iterator for DatasetBatchIter<'a, D> {
    type Item = Result<(Array2<f64>, Array1<f64>), D::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.dataset.len()?;
        if self.current >= total {
            return None;
        }

        let end = (self.current + self.batch_size).min(total);
        let range = self.current..end;
        self.current = end;

        Some(self.dataset.get_batch(range))
    }
}
