// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Fits every configured model on the training partition, scores
// it on both partitions, and collects the results.
//
// A model that fails to fit or predict is reported and skipped;
// the remaining models still train. Only the successful results
// are returned.

use ndarray::Array1;

use crate::data::dataset::CarbonDataset;
use crate::domain::error::ModelError;
use crate::domain::metrics::RegressionMetrics;
use crate::domain::params::ModelParams;
use crate::domain::traits::Regressor;

/// Everything learned and measured for one model.
#[derive(Debug, Clone)]
pub struct ModelResult {
    pub name: String,
    pub train_metrics: RegressionMetrics,
    pub test_metrics: RegressionMetrics,
    pub train_predictions: Array1<f64>,
    pub test_predictions: Array1<f64>,
    pub params: Option<ModelParams>,
    pub loss_history: Vec<(usize, f64)>,
}

/// Fit one model and score it on both partitions.
pub fn train_and_evaluate(model: &mut dyn Regressor, ds: &CarbonDataset) -> Result<ModelResult, ModelError> {
    model.fit(&ds.x_train, &ds.y_train)?;

    let train_predictions = model.predict(&ds.x_train)?;
    let test_predictions = model.predict(&ds.x_test)?;

    let train_metrics = RegressionMetrics::compute(&ds.y_train.to_vec(), &train_predictions.to_vec())?;
    let test_metrics = RegressionMetrics::compute(&ds.y_test.to_vec(), &test_predictions.to_vec())?;

    Ok(ModelResult {
        name: model.name().to_string(),
        train_metrics,
        test_metrics,
        train_predictions,
        test_predictions,
        params: model.params(),
        loss_history: model.loss_history().to_vec(),
    })
}

/// Train all `models` in order, skipping (and reporting) failures.
pub fn run_training(models: Vec<Box<dyn Regressor>>, ds: &CarbonDataset) -> Vec<ModelResult> {
    let mut results = Vec::with_capacity(models.len());

    for mut model in models {
        println!("\nTraining {}...", model.name());
        tracing::info!("Training {}", model.name());

        match train_and_evaluate(model.as_mut(), ds) {
            Ok(result) => {
                println!("✓ {} trained successfully", result.name);
                println!(
                    "  Train R²: {:.3}, Test R²: {:.3}",
                    result.train_metrics.r2, result.test_metrics.r2
                );
                results.push(result);
            }
            Err(e) => {
                println!("✗ Error training {}: {}", model.name(), e);
                tracing::warn!("Skipping {}: {}", model.name(), e);
            }
        }
    }

    results
}

/// The result with the highest test R². Earlier results win ties;
/// NaN scores never win.
pub fn best_model(results: &[ModelResult]) -> Option<&ModelResult> {
    let mut best: Option<&ModelResult> = None;
    let mut best_r2 = f64::NEG_INFINITY;
    for r in results {
        if r.test_metrics.r2 > best_r2 {
            best_r2 = r.test_metrics.r2;
            best = Some(r);
        }
    }
    best
}
