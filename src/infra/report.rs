// ============================================================
// Layer 6 — JSON Reports
// ============================================================
// Serde shapes of the JSON files a run leaves behind, and the
// helpers that build them from training results.
//
//   train workflow:
//     model_training_results.json — per-model scores + run info
//     model_predictions.json      — every model's predictions
//   baseline workflow:
//     carbon_model_results.json   — linear fit, scores, importance
//     sample_predictions.json     — first test rows, actual vs predicted
//
// All files are pretty-printed and read back with `read_json`.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};

use crate::data::dataset::CarbonDataset;
use crate::domain::params::LinearParams;
use crate::ml::importance::Ranking;
use crate::ml::trainer::ModelResult;

pub const TRAINING_RESULTS_FILE: &str = "model_training_results.json";
pub const PREDICTIONS_FILE: &str = "model_predictions.json";
pub const BASELINE_RESULTS_FILE: &str = "carbon_model_results.json";
pub const SAMPLE_PREDICTIONS_FILE: &str = "sample_predictions.json";

/// Rows kept in `sample_predictions.json`.
pub const SAMPLE_PREDICTION_LIMIT: usize = 10;

/// Local time in ISO-8601 with microseconds.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Cannot write '{}'", path.display()))?;
    tracing::debug!("Wrote '{}'", path.display());
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path).with_context(|| format!("Cannot read '{}'", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("'{}' is not valid JSON for this report", path.display()))
}

// ─── Training workflow ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitInfo {
    pub train_samples: usize,
    pub test_samples: usize,
    pub n_features: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelScores {
    pub train_r2: f64,
    pub test_r2: f64,
    pub test_rmse: f64,
    pub test_mae: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub timestamp: String,
    pub models_trained: Vec<String>,
    pub best_model: Option<String>,
    pub best_test_r2: Option<f64>,
    pub feature_names: Vec<String>,
    pub data_info: SplitInfo,
    /// "<Model Name>_metrics" → scores
    #[serde(flatten)]
    pub model_metrics: BTreeMap<String, ModelScores>,
}

impl TrainingSummary {
    pub fn from_results(results: &[ModelResult], best: Option<&ModelResult>, ds: &CarbonDataset) -> Self {
        let model_metrics = results
            .iter()
            .map(|r| {
                let scores = ModelScores {
                    train_r2: r.train_metrics.r2,
                    test_r2: r.test_metrics.r2,
                    test_rmse: r.test_metrics.rmse,
                    test_mae: r.test_metrics.mae,
                };
                (format!("{}_metrics", r.name), scores)
            })
            .collect();

        Self {
            timestamp: timestamp(),
            models_trained: results.iter().map(|r| r.name.clone()).collect(),
            best_model: best.map(|b| b.name.clone()),
            best_test_r2: best.map(|b| b.test_metrics.r2),
            feature_names: ds.feature_names.clone(),
            data_info: SplitInfo {
                train_samples: ds.train_len(),
                test_samples: ds.test_len(),
                n_features: ds.n_features(),
            },
            model_metrics,
        }
    }
}

/// `model_predictions.json`: "<Name>_train_pred", "<Name>_test_pred",
/// plus the true targets of both partitions.
pub fn predictions_report(results: &[ModelResult], ds: &CarbonDataset) -> BTreeMap<String, Vec<f64>> {
    let mut out = BTreeMap::new();
    for r in results {
        out.insert(format!("{}_train_pred", r.name), r.train_predictions.to_vec());
        out.insert(format!("{}_test_pred", r.name), r.test_predictions.to_vec());
    }
    out.insert("y_train_true".to_string(), ds.y_train.to_vec());
    out.insert("y_test_true".to_string(), ds.y_test.to_vec());
    out
}

// ─── Baseline workflow ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub bias: f64,
    pub weights: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub train_r2: f64,
    pub train_rmse: f64,
    pub test_r2: f64,
    pub test_rmse: f64,
    pub test_mae: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub total_samples: usize,
    pub train_samples: usize,
    pub test_samples: usize,
    pub features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineReport {
    pub timestamp: String,
    pub model_type: String,
    pub feature_names: Vec<String>,
    pub model_coefficients: Coefficients,
    pub performance_metrics: PerformanceMetrics,
    pub feature_importance: BTreeMap<String, f64>,
    pub data_info: DatasetInfo,
}

impl BaselineReport {
    pub fn new(result: &ModelResult, params: &LinearParams, importance: &Ranking, ds: &CarbonDataset) -> Self {
        let weights = ds
            .feature_names
            .iter()
            .cloned()
            .zip(params.weights.iter().copied())
            .collect();

        Self {
            timestamp: timestamp(),
            model_type: result.name.clone(),
            feature_names: ds.feature_names.clone(),
            model_coefficients: Coefficients { bias: params.bias, weights },
            performance_metrics: PerformanceMetrics {
                train_r2: result.train_metrics.r2,
                train_rmse: result.train_metrics.rmse,
                test_r2: result.test_metrics.r2,
                test_rmse: result.test_metrics.rmse,
                test_mae: result.test_metrics.mae,
            },
            feature_importance: importance.iter().cloned().collect(),
            data_info: DatasetInfo {
                total_samples: ds.train_len() + ds.test_len(),
                train_samples: ds.train_len(),
                test_samples: ds.test_len(),
                features: ds.n_features(),
            },
        }
    }
}

/// One test row: its feature values keyed by name, actual and predicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePrediction {
    #[serde(flatten)]
    pub features: BTreeMap<String, f64>,
    pub actual_carbon_sequestration: f64,
    pub predicted_carbon_sequestration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePredictions {
    pub sample_predictions: Vec<SamplePrediction>,
}

impl SamplePredictions {
    /// Pair the first `limit` test rows with their predictions.
    pub fn from_test_rows(ds: &CarbonDataset, predictions: &[f64], limit: usize) -> Self {
        let sample_predictions = ds
            .test_table
            .samples
            .iter()
            .zip(predictions)
            .take(limit)
            .map(|(s, &pred)| SamplePrediction {
                features: ds.feature_names.iter().cloned().zip(s.features.iter().copied()).collect(),
                actual_carbon_sequestration: s.target,
                predicted_carbon_sequestration: pred,
            })
            .collect();
        Self { sample_predictions }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::UniformGenerator;
    use crate::domain::traits::{Regressor, SampleSource};
    use crate::ml::importance::coefficient_importance;
    use crate::ml::linear::LinearRegression;
    use crate::ml::trainer::{best_model, run_training};

    fn dataset(n: usize) -> CarbonDataset {
        let table = UniformGenerator::new(n, 42).load().unwrap();
        CarbonDataset::split(table, 0.8, None).unwrap()
    }

    fn linear_result(ds: &CarbonDataset) -> ModelResult {
        let models: Vec<Box<dyn Regressor>> = vec![Box::new(LinearRegression::new())];
        run_training(models, ds).remove(0)
    }

    #[test]
    fn test_training_summary_flattens_model_keys() {
        let ds = dataset(100);
        let results = vec![linear_result(&ds)];
        let summary = TrainingSummary::from_results(&results, best_model(&results), &ds);

        let value = serde_json::to_value(&summary).unwrap();
        assert!(value["Linear Regression_metrics"]["test_r2"].is_number());
        assert_eq!(value["best_model"], "Linear Regression");
        assert_eq!(value["data_info"]["train_samples"], 80);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TRAINING_RESULTS_FILE);
        write_json(&path, &summary).unwrap();
        let back: TrainingSummary = read_json(&path).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn test_floats_survive_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let scores = ModelScores {
            train_r2: 0.9599407147633504,
            test_r2: 1.8373928107784656,
            test_rmse: 2.718281828459045,
            test_mae: 1e-300,
        };
        write_json(&path, &scores).unwrap();
        let back: ModelScores = read_json(&path).unwrap();
        assert_eq!(back.train_r2.to_bits(), scores.train_r2.to_bits());
        assert_eq!(back.test_r2.to_bits(), scores.test_r2.to_bits());
        assert_eq!(back, scores);
    }

    #[test]
    fn test_predictions_report_keys() {
        let ds = dataset(50);
        let results = vec![linear_result(&ds)];
        let report = predictions_report(&results, &ds);

        assert_eq!(report["Linear Regression_train_pred"].len(), 40);
        assert_eq!(report["Linear Regression_test_pred"].len(), 10);
        assert_eq!(report["y_test_true"], ds.y_test.to_vec());
    }

    #[test]
    fn test_baseline_report_round_trip() {
        let ds = dataset(100);
        let result = linear_result(&ds);
        let params = match result.params.clone() {
            Some(crate::domain::params::ModelParams::Linear(p)) => p,
            other => panic!("expected linear params, got {other:?}"),
        };
        let importance = coefficient_importance(&params, &ds.feature_names);
        let report = BaselineReport::new(&result, &params, &importance, &ds);

        assert_eq!(report.data_info.total_samples, 100);
        assert_eq!(report.model_coefficients.weights.len(), 3);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(BASELINE_RESULTS_FILE);
        write_json(&path, &report).unwrap();
        assert_eq!(read_json::<BaselineReport>(&path).unwrap(), report);
    }

    #[test]
    fn test_sample_predictions_use_feature_names_as_keys() {
        let ds = dataset(100);
        let preds: Vec<f64> = (0..ds.test_len()).map(|i| i as f64).collect();
        let samples = SamplePredictions::from_test_rows(&ds, &preds, SAMPLE_PREDICTION_LIMIT);

        assert_eq!(samples.sample_predictions.len(), 10);
        let value = serde_json::to_value(&samples).unwrap();
        let first = &value["sample_predictions"][0];
        assert!(first["NDVI"].is_number());
        assert!(first["Soil_Carbon_Percent"].is_number());
        assert_eq!(first["predicted_carbon_sequestration"], 0.0);
    }

    #[test]
    fn test_sample_predictions_short_test_set() {
        let ds = dataset(20);
        let preds = vec![1.0; ds.test_len()];
        let samples = SamplePredictions::from_test_rows(&ds, &preds, SAMPLE_PREDICTION_LIMIT);
        assert_eq!(samples.sample_predictions.len(), 4);
    }
}
