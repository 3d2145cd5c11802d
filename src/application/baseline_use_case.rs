// ============================================================
// Layer 2 — BaselineUseCase
// ============================================================
// The simplest end-to-end model: uniform synthetic data and a
// single linear regression, reported in full (coefficients,
// importance, and the fitted equation).
//
//   Step 1: Generate uniform data       (Layer 4 - data)
//   Step 2: Split train/test            (Layer 4 - data)
//   Step 3: Fit and score the model     (Layer 5 - ml)
//   Step 4: Print the report
//   Step 5: Save the JSON results       (Layer 6 - infra)

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    dataset::CarbonDataset,
    synthetic::{UniformGenerator, DEFAULT_SAMPLES, DEFAULT_SEED},
};
use crate::domain::{params::LinearParams, traits::SampleSource};
use crate::infra::{
    checkpoint::{CheckpointManager, BASELINE_CONFIG_FILE},
    report::{self, BaselineReport, SamplePredictions, SAMPLE_PREDICTION_LIMIT},
};
use crate::ml::{
    importance::{coefficient_importance, Ranking},
    linear::LinearRegression,
    trainer::{train_and_evaluate, ModelResult},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineConfig {
    pub output_dir:     String,
    pub n_samples:      usize,
    pub seed:           u64,
    pub train_fraction: f64,
    pub shuffle_seed:   Option<u64>,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            output_dir:     "workspace".to_string(),
            n_samples:      DEFAULT_SAMPLES,
            seed:           DEFAULT_SEED,
            train_fraction: 0.8,
            shuffle_seed:   None,
        }
    }
}

pub struct BaselineOutcome {
    pub result:     ModelResult,
    pub params:     LinearParams,
    pub importance: Ranking,
}

pub struct BaselineUseCase {
    config: BaselineConfig,
}

impl BaselineUseCase {
    pub fn new(config: BaselineConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<BaselineOutcome> {
        let cfg = &self.config;
        println!("=== SIMPLE CARBON STOCK ESTIMATION MODEL ===\n");

        // ── Step 1: Generate data ────────────────────────────────────────────
        println!("Creating synthetic carbon stock data...");
        let table = UniformGenerator::new(cfg.n_samples, cfg.seed).load()?;
        println!("✓ Created {} samples", table.len());

        // ── Step 2: Split ────────────────────────────────────────────────────
        let ds = CarbonDataset::split(table, cfg.train_fraction, cfg.shuffle_seed)?;
        println!("✓ Split data: {} train, {} test samples", ds.train_len(), ds.test_len());

        // ── Step 3: Fit and score ────────────────────────────────────────────
        println!("\nTraining Carbon Stock Estimation Model...");
        let mut model = LinearRegression::new();
        let result = train_and_evaluate(&mut model, &ds)?;
        let params = model
            .coefficients()
            .cloned()
            .ok_or_else(|| anyhow!("{} has no coefficients after fitting", LinearRegression::NAME))?;
        println!("✓ Model trained successfully!");

        // ── Step 4: Report ───────────────────────────────────────────────────
        let importance = coefficient_importance(&params, &ds.feature_names);
        print_report(&result, &params, &importance, &ds.feature_names);

        // ── Step 5: Save ─────────────────────────────────────────────────────
        if let Err(e) = self.save_outputs(&result, &params, &importance, &ds) {
            println!("Error saving results: {e:#}");
            tracing::error!("Saving baseline results failed: {e:#}");
        }

        println!("\n{}", "=".repeat(60));
        println!("CARBON STOCK ESTIMATION MODEL COMPLETE");
        println!("{}", "=".repeat(60));
        println!("✓ Model trained with R² = {:.3}", result.test_metrics.r2);
        println!("✓ RMSE = {:.3} tCO₂e/ha", result.test_metrics.rmse);
        println!("✓ Results saved to {}/", cfg.output_dir);
        println!("\nModel Equation:");
        println!("{}", equation(&params, &ds.feature_names));

        Ok(BaselineOutcome { result, params, importance })
    }

    fn save_outputs(
        &self,
        result: &ModelResult,
        params: &LinearParams,
        importance: &Ranking,
        ds: &CarbonDataset,
    ) -> Result<()> {
        let out = PathBuf::from(&self.config.output_dir);

        let path = out.join(report::BASELINE_RESULTS_FILE);
        report::write_json(&path, &BaselineReport::new(result, params, importance, ds))?;
        println!("\n✓ Results saved to {}", path.display());

        let samples = SamplePredictions::from_test_rows(
            ds,
            result.test_predictions.as_slice().unwrap_or(&[]),
            SAMPLE_PREDICTION_LIMIT,
        );
        let path = out.join(report::SAMPLE_PREDICTIONS_FILE);
        report::write_json(&path, &samples)?;
        println!("✓ Sample predictions saved to {}", path.display());

        CheckpointManager::new(&out).save_config(BASELINE_CONFIG_FILE, &self.config)?;
        Ok(())
    }
}

fn print_report(result: &ModelResult, params: &LinearParams, importance: &Ranking, names: &[String]) {
    println!("\nMODEL PERFORMANCE:");
    println!("Training R²:   {:.3}", result.train_metrics.r2);
    println!("Training RMSE: {:.3}", result.train_metrics.rmse);
    println!("Test R²:       {:.3}", result.test_metrics.r2);
    println!("Test RMSE:     {:.3}", result.test_metrics.rmse);
    println!("Test MAE:      {:.3}", result.test_metrics.mae);

    println!("\nMODEL COEFFICIENTS:");
    println!("Bias: {:.3}", params.bias);
    for (name, w) in names.iter().zip(&params.weights) {
        println!("{}: {:.3}", name, w);
    }

    println!("\nFEATURE IMPORTANCE:");
    for (name, score) in importance {
        println!("{}: {:.3}", name, score);
    }
}

/// "Carbon Sequestration = b + w1 × name1 + ..." with 2 decimals.
pub fn equation(params: &LinearParams, names: &[String]) -> String {
    let mut eq = format!("Carbon Sequestration = {:.2}", params.bias);
    for (name, w) in names.iter().zip(&params.weights) {
        eq.push_str(&format!(" + {:.2} × {}", w, name));
    }
    eq
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equation_format() {
        let params = LinearParams { bias: 1.234, weights: vec![25.0, -0.156] };
        let names = vec!["NDVI".to_string(), "Canopy".to_string()];
        assert_eq!(
            equation(&params, &names),
            "Carbon Sequestration = 1.23 + 25.00 × NDVI + -0.16 × Canopy"
        );
    }

    #[test]
    fn test_baseline_recovers_generator_coefficients() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = BaselineConfig { output_dir: dir.path().display().to_string(), ..BaselineConfig::default() };
        let outcome = BaselineUseCase::new(cfg).execute().unwrap();

        // uniform data: 25·NDVI + 0.15·canopy + 6·soil + N(0, 3)
        assert!((outcome.params.weights[0] - 25.0).abs() < 3.0);
        assert!((outcome.params.weights[1] - 0.15).abs() < 0.05);
        assert!((outcome.params.weights[2] - 6.0).abs() < 0.5);
        assert!(outcome.result.test_metrics.r2 > 0.8);
        assert_eq!(outcome.importance[0].0, "NDVI");

        let report: BaselineReport = report::read_json(&dir.path().join(report::BASELINE_RESULTS_FILE)).unwrap();
        assert_eq!(report.data_info.total_samples, 1000);
        assert_eq!(report.data_info.test_samples, 200);

        let samples: SamplePredictions = report::read_json(&dir.path().join(report::SAMPLE_PREDICTIONS_FILE)).unwrap();
        assert_eq!(samples.sample_predictions.len(), 10);
        assert!(dir.path().join(BASELINE_CONFIG_FILE).exists());
    }
}
