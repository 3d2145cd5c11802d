// ============================================================
// Layer 5 — Gradient Boosting (linear base learners)
// ============================================================
// Starts from the mean target and repeatedly fits a linear
// regression to what is still unexplained:
//
//   F₀(x)   = mean(y)
//   rₘ      = y − Fₘ₋₁(x)
//   hₘ      = least-squares fit to rₘ
//   Fₘ(x)   = Fₘ₋₁(x) + η·hₘ(x)
//
// With a linear base learner this converges towards the
// ordinary least-squares solution, at a rate set by η.

use ndarray::{Array1, Array2};

use crate::domain::error::ModelError;
use crate::domain::params::{LinearParams, ModelParams};
use crate::domain::traits::{check_feature_count, check_training_data, Regressor};
use crate::ml::linear::{fit_linear, predict_linear};

#[derive(Debug, Clone)]
pub struct GradientBoosting {
    n_estimators: usize,
    learning_rate: f64,
    n_features: usize,
    initial_prediction: Option<f64>,
    stages: Vec<LinearParams>,
}

impl GradientBoosting {
    pub const NAME: &'static str = "Gradient Boosting";

    pub fn new(n_estimators: usize, learning_rate: f64) -> Self {
        Self {
            n_estimators,
            learning_rate,
            n_features: 0,
            initial_prediction: None,
            stages: Vec::new(),
        }
    }

    pub fn from_params(
        n_features: usize,
        initial_prediction: f64,
        learning_rate: f64,
        stages: Vec<LinearParams>,
    ) -> Self {
        Self {
            n_estimators: stages.len(),
            learning_rate,
            n_features,
            initial_prediction: Some(initial_prediction),
            stages,
        }
    }
}

impl Regressor for GradientBoosting {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        check_training_data(x, y)?;

        let initial = y.mean().ok_or(ModelError::EmptyInput)?;
        let mut current = Array1::from_elem(y.len(), initial);
        let mut stages = Vec::with_capacity(self.n_estimators);

        for stage in 0..self.n_estimators {
            let residuals = y - &current;
            let params = fit_linear(x, &residuals)?;
            current = current + predict_linear(&params, x)? * self.learning_rate;
            stages.push(params);

            if stage % 10 == 0 {
                let mse = (y - &current).mapv(|r| r * r).mean().unwrap_or(0.0);
                tracing::debug!("Boosting stage {}: train mse {:.4}", stage, mse);
            }
        }

        self.n_features = x.ncols();
        self.initial_prediction = Some(initial);
        self.stages = stages;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let initial = self
            .initial_prediction
            .ok_or_else(|| ModelError::NotFitted(Self::NAME.to_string()))?;
        check_feature_count(self.n_features, x)?;

        let mut out = Array1::from_elem(x.nrows(), initial);
        for params in &self.stages {
            out = out + predict_linear(params, x)? * self.learning_rate;
        }
        Ok(out)
    }

    fn params(&self) -> Option<ModelParams> {
        self.initial_prediction.map(|initial_prediction| ModelParams::Boosting {
            n_features: self.n_features,
            initial_prediction,
            learning_rate: self.learning_rate,
            stages: self.stages.clone(),
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Axis};

    fn linear_data() -> (Array2<f64>, Array1<f64>) {
        let x = array![[1.0, 0.0], [2.0, 1.0], [3.0, 5.0], [4.0, 2.0], [5.0, 3.0], [6.0, 7.0]];
        let y = x.map_axis(Axis(1), |r| 4.0 + 2.0 * r[0] - r[1]);
        (x, y)
    }

    #[test]
    fn test_zero_stages_predicts_mean() {
        let (x, y) = linear_data();
        let mut gb = GradientBoosting::new(0, 0.1);
        gb.fit(&x, &y).unwrap();
        let mean = y.mean().unwrap();
        assert!(gb.predict(&x).unwrap().iter().all(|p| (p - mean).abs() < 1e-12));
    }

    #[test]
    fn test_residual_shrinks_geometrically() {
        // On exactly linear data every stage removes a fraction η of
        // the remaining residual, so after m stages it is (1-η)^m.
        let (x, y) = linear_data();
        let mut gb = GradientBoosting::new(30, 0.1);
        gb.fit(&x, &y).unwrap();

        let pred = gb.predict(&x).unwrap();
        let mean = y.mean().unwrap();
        let shrink = 0.9f64.powi(30);
        for (p, t) in pred.iter().zip(y.iter()) {
            let expected = t - (t - mean) * shrink;
            assert!((p - expected).abs() < 1e-6, "{p} vs {expected}");
        }
    }

    #[test]
    fn test_params_round_trip() {
        let (x, y) = linear_data();
        let mut gb = GradientBoosting::new(5, 0.3);
        gb.fit(&x, &y).unwrap();

        let Some(ModelParams::Boosting { n_features, initial_prediction, learning_rate, stages }) = gb.params()
        else {
            panic!("expected boosting params");
        };
        assert_eq!(stages.len(), 5);
        let restored = GradientBoosting::from_params(n_features, initial_prediction, learning_rate, stages);
        assert_eq!(restored.predict(&x).unwrap(), gb.predict(&x).unwrap());
    }

    #[test]
    fn test_unfitted() {
        let gb = GradientBoosting::new(3, 0.1);
        assert!(gb.params().is_none());
        assert!(matches!(gb.predict(&Array2::zeros((1, 2))), Err(ModelError::NotFitted(_))));
    }
}
