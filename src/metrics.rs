//! Regression metrics for held-out evaluation.

use crate::error::{PricingError, Result};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    /// Compare predictions against true targets.
    ///
    /// R² is 1 for a perfect fit of constant targets and 0 for any other
    /// fit of constant targets.
    pub fn compute(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(PricingError::Data(format!(
                "metrics need equal lengths, got {} targets and {} predictions",
                y_true.len(),
                y_pred.len()
            )));
        }
        if y_true.is_empty() {
            return Err(PricingError::Data("metrics need at least one sample".into()));
        }

        let n = y_true.len() as f64;
        let residuals = &y_true - &y_pred;
        let ss_res = residuals.dot(&residuals);
        let mae = residuals.mapv(f64::abs).sum() / n;
        let mean = y_true.sum() / n;
        let ss_tot = y_true.mapv(|y| (y - mean).powi(2)).sum();

        let r2 = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else if ss_res == 0.0 {
            1.0
        } else {
            0.0
        };

        Ok(Self {
            rmse: (ss_res / n).sqrt(),
            mae,
            r2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_known_values() {
        let y = array![1.0, 2.0, 3.0, 4.0];
        let p = array![1.0, 2.0, 3.0, 6.0];
        let m = RegressionMetrics::compute(y.view(), p.view()).unwrap();
        assert!((m.rmse - 1.0).abs() < 1e-12);
        assert!((m.mae - 0.5).abs() < 1e-12);
        // ss_tot = 5, ss_res = 4
        assert!((m.r2 - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_constant_targets() {
        let y = array![5.0, 5.0];
        let exact = RegressionMetrics::compute(y.view(), y.view()).unwrap();
        assert_eq!(exact.r2, 1.0);
        let off = RegressionMetrics::compute(y.view(), array![4.0, 6.0].view()).unwrap();
        assert_eq!(off.r2, 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        let y = array![1.0, 2.0];
        let p = array![1.0];
        assert!(matches!(
            RegressionMetrics::compute(y.view(), p.view()),
            Err(PricingError::Data(_))
        ));
    }
}
