// ============================================================
// Layer 3 — Regression Metrics
// ============================================================
// Standard accuracy measures for a vector of predictions:
//
//   MSE  = mean((y - ŷ)²)
//   RMSE = √MSE
//   MAE  = mean(|y - ŷ|)
//   R²   = 1 - SS_res / SS_tot      (0 when SS_tot is 0)
//
// R² is the fraction of target variance the model explains.
// A constant target has no variance to explain, so R² is
// reported as 0 rather than dividing by zero.

use serde::{Deserialize, Serialize};

use crate::domain::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    /// Score `y_pred` against `y_true`.
    pub fn compute(y_true: &[f64], y_pred: &[f64]) -> Result<Self, ModelError> {
        if y_true.len() != y_pred.len() {
            return Err(ModelError::LengthMismatch {
                expected: y_true.len(),
                actual: y_pred.len(),
            });
        }
        if y_true.is_empty() {
            return Err(ModelError::EmptyInput);
        }

        let n = y_true.len() as f64;
        let mean = y_true.iter().sum::<f64>() / n;

        let mut ss_res = 0.0;
        let mut abs_sum = 0.0;
        let mut ss_tot = 0.0;
        for (t, p) in y_true.iter().zip(y_pred) {
            let err = t - p;
            ss_res += err * err;
            abs_sum += err.abs();
            ss_tot += (t - mean) * (t - mean);
        }

        let mse = ss_res / n;
        let r2 = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

        Ok(Self {
            mse,
            rmse: mse.sqrt(),
            mae: abs_sum / n,
            r2,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_closed_form_values() {
        // errors: 0.5, 0, -1, 1.5 → squared 0.25, 0, 1, 2.25
        let y = [3.0, -0.5, 2.0, 7.0];
        let p = [2.5, -0.5, 3.0, 5.5];
        let m = RegressionMetrics::compute(&y, &p).unwrap();

        assert!(close(m.mse, 3.5 / 4.0));
        assert!(close(m.rmse, (3.5f64 / 4.0).sqrt()));
        assert!(close(m.mae, 3.0 / 4.0));

        // mean 2.875; SS_tot = 0.015625 + 11.390625 + 0.765625 + 17.015625
        let ss_tot = 29.1875;
        assert!(close(m.r2, 1.0 - 3.5 / ss_tot));
    }

    #[test]
    fn test_perfect_prediction() {
        let y = [1.0, 2.0, 3.0];
        let m = RegressionMetrics::compute(&y, &y).unwrap();
        assert_eq!(m.mse, 0.0);
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.r2, 1.0);
    }

    #[test]
    fn test_constant_target_gives_zero_r2() {
        let y = [4.0, 4.0, 4.0];
        let p = [3.0, 4.0, 5.0];
        let m = RegressionMetrics::compute(&y, &p).unwrap();
        assert_eq!(m.r2, 0.0);
        assert!(close(m.mse, 2.0 / 3.0));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            RegressionMetrics::compute(&[], &[]),
            Err(ModelError::EmptyInput)
        ));
        assert!(matches!(
            RegressionMetrics::compute(&[1.0, 2.0], &[1.0]),
            Err(ModelError::LengthMismatch { expected: 2, actual: 1 })
        ));
    }
}
