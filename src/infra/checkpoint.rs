// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores the best trained model and the run
// configuration.
//
// What gets saved:
//   1. best_carbon_model.mpk — a ModelBundle: the model's
//                              parameter snapshot plus everything
//                              needed to use it (feature names,
//                              model name, test R², importance)
//   2. train_config.json     — hyper-parameters of the run
//      (baseline_config.json for the baseline workflow)
//
// The bundle is MessagePack (rmp-serde) with named fields, so it
// is compact but still self-describing: adding a field to the
// bundle does not silently shift the others.
//
// Reference: rmp-serde crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::domain::params::ModelParams;

pub const BUNDLE_FILE: &str = "best_carbon_model.mpk";
pub const CONFIG_FILE: &str = "train_config.json";
pub const BASELINE_CONFIG_FILE: &str = "baseline_config.json";

/// A trained model packaged for later prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub model_name: String,
    pub feature_names: Vec<String>,
    pub test_r2: f64,
    /// (feature, score), most important first
    pub feature_importance: Vec<(String, f64)>,
    pub params: ModelParams,
    pub created_at: String,
}

/// Manages saving and loading of model bundles.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn bundle_path(&self) -> PathBuf {
        self.dir.join(BUNDLE_FILE)
    }

    fn ensure_dir(&self) -> Result<()> {
        // create_dir_all creates parent directories too, like `mkdir -p`
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create directory '{}'", self.dir.display()))
    }

    /// Write the bundle and return where it went.
    pub fn save_bundle(&self, bundle: &ModelBundle) -> Result<PathBuf> {
        self.ensure_dir()?;
        let path = self.bundle_path();

        let bytes = rmp_serde::to_vec_named(bundle).context("Failed to encode model bundle")?;
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to save model to '{}'", path.display()))?;

        tracing::debug!("Saved {} bundle to '{}'", bundle.model_name, path.display());
        Ok(path)
    }

    pub fn load_bundle(&self) -> Result<ModelBundle> {
        let path = self.bundle_path();
        let bytes = fs::read(&path).with_context(|| {
            format!("Cannot read '{}'. Have you run 'train' first?", path.display())
        })?;

        let bundle: ModelBundle = rmp_serde::from_slice(&bytes)
            .with_context(|| format!("'{}' is not a valid model bundle", path.display()))?;

        tracing::info!("Loaded {} from '{}'", bundle.model_name, path.display());
        Ok(bundle)
    }

    /// Save a run configuration as pretty JSON under `file`.
    pub fn save_config<T: Serialize>(&self, file: &str, cfg: &T) -> Result<()> {
        self.ensure_dir()?;
        let path = self.dir.join(file);

        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.dir.join(file);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }
}
