use crate::dataset::Dataset;
use ndarray::{s, Array1, Array2};
use std::ops::Range;

/// Preprocessed design matrix and targets held in memory.
#[derive(Clone, Debug)]
pub struct InMemoryDataset {
    x: Array2<f64>,
    y: Array1<f64>,
}

impl InMemoryDataset {
    pub fn new(x: Array2<f64>, y: Array1<f64>) -> Result<Self, String> {
        if x.nrows() != y.len() {
            return Err(format!(
                "x has {} rows but y has {} values",
                x.nrows(),
                y.len()
            ));
        }
        if x.nrows() == 0 {
            return Err("Dataset is empty".into());
        }
        Ok(Self { x, y })
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn targets(&self) -> &Array1<f64> {
        &self.y
    }
}

impl Dataset for InMemoryDataset {
    type Error = std::convert::Infallible;

    fn len(&self) -> Option<usize> {
        Some(self.x.nrows())
    }

    fn get_batch(&self, range: Range<usize>) -> Result<(Array2<f64>, Array1<f64>), Self::Error> {
        let x = self.x.slice(s![range.clone(), ..]).to_owned();
        let y = self.y.slice(s![range]).to_owned();
        Ok((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rejects_length_mismatch_and_empty() {
        assert!(InMemoryDataset::new(array![[1.0], [2.0]], array![1.0]).is_err());
        assert!(InMemoryDataset::new(Array2::zeros((0, 3)), Array1::zeros(0)).is_err());
    }

    #[test]
    fn test_get_batch_slices_rows() {
        let ds = InMemoryDataset::new(
            array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]],
            array![10.0, 20.0, 30.0],
        )
        .unwrap();
        let (x, y) = ds.get_batch(1..3).unwrap();
        assert_eq!(x, array![[3.0, 4.0], [5.0, 6.0]]);
        assert_eq!(y, array![20.0, 30.0]);
        assert_eq!(ds.n_features(), 2);
    }
}
