// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the model comparison run in order:
//
//   Step 1: Load the dataset CSV, or generate one  (Layer 4 - data)
//   Step 2: Split train/test                       (Layer 4 - data)
//   Step 3: Train all four models                  (Layer 5 - ml)
//   Step 4: Compare and pick the best              (Layer 5 - ml)
//   Step 5: Rank features by correlation           (Layer 5 - ml)
//   Step 6: Save bundle, config and reports        (Layer 6 - infra)
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::data::{
    dataset::CarbonDataset,
    loader::load_or_generate,
    synthetic::{DistributedGenerator, DEFAULT_SAMPLES, DEFAULT_SEED},
};
use crate::domain::traits::Regressor;
use crate::infra::{
    checkpoint::{CheckpointManager, ModelBundle, CONFIG_FILE},
    metrics::LossLogger,
    report::{self, TrainingSummary},
};
use crate::ml::{
    boosting::GradientBoosting,
    forest::RandomForest,
    importance::{correlation_importance, Ranking},
    linear::LinearRegression,
    network::{NeuralNetwork, NeuralNetworkConfig},
    trainer::{best_model, run_training, ModelResult},
};

/// Features listed in the importance report.
const TOP_FEATURES: usize = 10;

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything that shapes a run. Saved next to the outputs so a run
// can be traced back to its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:      String,
    pub output_dir:     String,
    pub n_samples:      usize,
    pub seed:           u64,
    pub train_fraction: f64,
    pub shuffle_seed:   Option<u64>,
    pub n_trees:        usize,
    pub max_depth:      usize,
    pub n_estimators:   usize,
    pub boosting_lr:    f64,
    pub hidden_size:    usize,
    pub nn_lr:          f64,
    pub epochs:         usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:      "workspace/processed_carbon_data.csv".to_string(),
            output_dir:     "workspace".to_string(),
            n_samples:      DEFAULT_SAMPLES,
            seed:           DEFAULT_SEED,
            train_fraction: 0.8,
            shuffle_seed:   None,
            n_trees:        20,
            max_depth:      6,
            n_estimators:   30,
            boosting_lr:    0.1,
            hidden_size:    15,
            nn_lr:          0.01,
            epochs:         100,
        }
    }
}

impl TrainConfig {
    /// The four competing models, in reporting order.
    pub fn build_models(&self) -> Vec<Box<dyn Regressor>> {
        let nn = NeuralNetworkConfig::new()
            .with_hidden_size(self.hidden_size)
            .with_learning_rate(self.nn_lr)
            .with_epochs(self.epochs)
            .with_seed(self.seed);

        vec![
            Box::new(LinearRegression::new()),
            Box::new(RandomForest::new(self.n_trees, self.max_depth, self.seed)),
            Box::new(GradientBoosting::new(self.n_estimators, self.boosting_lr)),
            Box::new(NeuralNetwork::new(nn)),
        ]
    }
}

/// What a training run produced, for callers that want more than
/// the console report.
pub struct TrainOutcome {
    pub results:    Vec<ModelResult>,
    pub best_model: Option<String>,
    pub importance: Ranking,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainOutcome> {
        let cfg = &self.config;
        println!("=== CARBON STOCK ESTIMATION MODEL TRAINING ===\n");

        // ── Step 1: Load or generate the dataset ─────────────────────────────
        let generator = DistributedGenerator::new(cfg.n_samples, cfg.seed);
        let table = load_or_generate(Path::new(&cfg.data_path), &generator)?;

        // ── Step 2: Train / test split ───────────────────────────────────────
        let ds = CarbonDataset::split(table, cfg.train_fraction, cfg.shuffle_seed)?;
        println!("Training samples: {}", ds.train_len());
        println!("Test samples: {}", ds.test_len());
        println!("Features: {}", ds.n_features());
        tracing::info!(
            "Data shapes: X_train ({}, {}), X_test ({}, {})",
            ds.train_len(),
            ds.n_features(),
            ds.test_len(),
            ds.n_features()
        );

        // ── Step 3: Train every model ────────────────────────────────────────
        println!("\n1. TRAINING MODELS");
        println!("{}", "-".repeat(50));
        let results = run_training(cfg.build_models(), &ds);

        // ── Step 4: Comparison table ─────────────────────────────────────────
        println!("\n2. MODEL COMPARISON");
        println!("{}", "-".repeat(50));
        print_comparison(&results);

        let best = best_model(&results);
        match best {
            Some(b) => println!(
                "\nBest performing model: {} (Test R² = {:.3})",
                b.name, b.test_metrics.r2
            ),
            None => println!("\nNo model trained successfully"),
        }

        // ── Step 5: Feature importance ───────────────────────────────────────
        // Correlation with the target is model-agnostic, so it is
        // computed once for whichever model won.
        println!("\n3. FEATURE IMPORTANCE ANALYSIS");
        println!("{}", "-".repeat(50));
        let importance = correlation_importance(&ds.x_train, &ds.y_train, &ds.feature_names);
        if let Some(b) = best {
            println!("Analyzing feature importance for {}...", b.name);
            println!("Top {} most important features:", TOP_FEATURES);
            for (i, (feature, score)) in importance.iter().take(TOP_FEATURES).enumerate() {
                println!("  {:2}. {:<30}: {:.3}", i + 1, feature, score);
            }
        }

        // ── Step 6: Persist ──────────────────────────────────────────────────
        // A failed write is reported but does not discard the run.
        println!("\n4. SAVING MODELS AND RESULTS");
        println!("{}", "-".repeat(50));
        if let Err(e) = self.save_outputs(&results, best, &importance, &ds) {
            println!("Error saving results: {e:#}");
            tracing::error!("Saving results failed: {e:#}");
        }

        print_summary(&results, best, &cfg.output_dir);

        let best_model = best.map(|b| b.name.clone());
        Ok(TrainOutcome { results, best_model, importance })
    }

    fn save_outputs(
        &self,
        results: &[ModelResult],
        best: Option<&ModelResult>,
        importance: &Ranking,
        ds: &CarbonDataset,
    ) -> Result<()> {
        let out = PathBuf::from(&self.config.output_dir);
        let ckpt = CheckpointManager::new(&out);

        if let Some(b) = best {
            match &b.params {
                Some(params) => {
                    let bundle = ModelBundle {
                        model_name: b.name.clone(),
                        feature_names: ds.feature_names.clone(),
                        test_r2: b.test_metrics.r2,
                        feature_importance: importance.clone(),
                        params: params.clone(),
                        created_at: report::timestamp(),
                    };
                    let path = ckpt.save_bundle(&bundle)?;
                    println!("✓ Best model saved to {}", path.display());
                }
                None => tracing::warn!("{} has no parameters to save", b.name),
            }
        }
        ckpt.save_config(CONFIG_FILE, &self.config)?;

        let summary = TrainingSummary::from_results(results, best, ds);
        let path = out.join(report::TRAINING_RESULTS_FILE);
        report::write_json(&path, &summary)?;
        println!("✓ Training results saved to {}", path.display());

        let path = out.join(report::PREDICTIONS_FILE);
        report::write_json(&path, &report::predictions_report(results, ds))?;
        println!("✓ Model predictions saved to {}", path.display());

        let logger = LossLogger::create(&out)?;
        for r in results {
            logger.log_history(&r.name, &r.loss_history)?;
        }

        Ok(())
    }
}

fn print_comparison(results: &[ModelResult]) {
    println!(
        "{:<20} {:<10} {:<10} {:<12} {:<10}",
        "Model", "Train R²", "Test R²", "Test RMSE", "Test MAE"
    );
    println!("{}", "-".repeat(62));
    for r in results {
        println!(
            "{:<20} {:<10.3} {:<10.3} {:<12.3} {:<10.3}",
            r.name, r.train_metrics.r2, r.test_metrics.r2, r.test_metrics.rmse, r.test_metrics.mae
        );
    }
}

fn print_summary(results: &[ModelResult], best: Option<&ModelResult>, output_dir: &str) {
    println!("\n{}", "=".repeat(60));
    println!("MODEL TRAINING COMPLETE");
    println!("{}", "=".repeat(60));
    println!("✓ Trained {} models successfully", results.len());
    if let Some(b) = best {
        println!("✓ Best model: {} (R² = {:.3})", b.name, b.test_metrics.r2);
    }
    println!("✓ Models and results saved to {}/", output_dir);
    println!("\nFiles created:");
    println!("- best_carbon_model.mpk (trained model)");
    println!("- model_training_results.json (comprehensive results)");
    println!("- model_predictions.json (all predictions)");
    println!("- loss_history.csv (training loss curves)");
}
