// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Loads the bundle saved by `train` and predicts carbon
// sequestration for feature values supplied by the user.

use anyhow::{ensure, Result};

use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::Inferencer;

pub struct PredictUseCase {
    inferencer: Inferencer,
    test_r2:    f64,
}

impl PredictUseCase {
    /// Load the best model saved under `model_dir`.
    pub fn new(model_dir: &str) -> Result<Self> {
        let bundle = CheckpointManager::new(model_dir).load_bundle()?;
        let test_r2 = bundle.test_r2;
        let inferencer = Inferencer::new(bundle.params, bundle.feature_names)?;
        Ok(Self { inferencer, test_r2 })
    }

    pub fn model_name(&self) -> &str {
        self.inferencer.model_name()
    }

    pub fn feature_names(&self) -> &[String] {
        self.inferencer.feature_names()
    }

    /// Test R² recorded when the model was trained.
    pub fn test_r2(&self) -> f64 {
        self.test_r2
    }

    /// One value per feature, in the order `feature_names` lists them.
    pub fn predict(&self, values: &[f64]) -> Result<f64> {
        let names = self.feature_names();
        ensure!(
            values.len() == names.len(),
            "expected {} values ({}), got {}",
            names.len(),
            names.join(", "),
            values.len()
        );
        let pred = self.inferencer.predict_rows(&[values.to_vec()])?;
        tracing::debug!("{} predicted {:.3}", self.model_name(), pred[0]);
        Ok(pred[0])
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::params::{LinearParams, ModelParams};
    use crate::infra::checkpoint::ModelBundle;

    fn save_linear(dir: &std::path::Path) {
        let bundle = ModelBundle {
            model_name: "Linear Regression".into(),
            feature_names: vec!["NDVI".into(), "Soil".into()],
            test_r2: 0.9,
            feature_importance: vec![],
            params: ModelParams::Linear(LinearParams { bias: 2.0, weights: vec![10.0, 1.0] }),
            created_at: String::new(),
        };
        CheckpointManager::new(dir).save_bundle(&bundle).unwrap();
    }

    #[test]
    fn test_predict_from_saved_bundle() {
        let dir = tempfile::tempdir().unwrap();
        save_linear(dir.path());

        let uc = PredictUseCase::new(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(uc.model_name(), "Linear Regression");
        assert_eq!(uc.test_r2(), 0.9);
        assert!((uc.predict(&[0.5, 3.0]).unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_value_count_is_error() {
        let dir = tempfile::tempdir().unwrap();
        save_linear(dir.path());

        let uc = PredictUseCase::new(dir.path().to_str().unwrap()).unwrap();
        let err = uc.predict(&[0.5]).unwrap_err();
        assert!(err.to_string().contains("NDVI, Soil"));
    }

    #[test]
    fn test_missing_bundle_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PredictUseCase::new(dir.path().to_str().unwrap()).is_err());
    }
}
