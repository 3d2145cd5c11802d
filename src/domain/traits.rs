// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The training loop and the use cases program against these
// traits, not against concrete models or data sources:
//   - every regressor (linear, forest, boosting, network)
//     implements Regressor
//   - the CSV loader and both synthetic generators implement
//     SampleSource
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Trait Objects)

use anyhow::Result;
use ndarray::{Array1, Array2};

use crate::domain::error::ModelError;
use crate::domain::params::ModelParams;
use crate::domain::sample::FeatureTable;

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Anything that can produce a feature table.
///
/// Implementations:
///   - CsvLoader            → reads a previously processed dataset
///   - UniformGenerator     → LCG-driven synthetic data
///   - DistributedGenerator → beta/gamma/normal synthetic data
pub trait SampleSource {
    fn load(&self) -> Result<FeatureTable>;
}

// ─── Regressor ────────────────────────────────────────────────────────────────
/// A model that learns a mapping from feature rows to a target.
pub trait Regressor {
    /// Display name used in console tables and report keys.
    fn name(&self) -> &str;

    /// Learn parameters from a design matrix (samples × features)
    /// and its target vector.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError>;

    /// Predict one value per row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError>;

    /// Learned state, or `None` before `fit`.
    fn params(&self) -> Option<ModelParams>;

    /// `(epoch, loss)` pairs recorded during the last `fit`, for
    /// models trained iteratively.
    fn loss_history(&self) -> &[(usize, f64)] {
        &[]
    }
}

/// Shared argument check for `fit` implementations.
pub fn check_training_data(x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
    if x.nrows() == 0 {
        return Err(ModelError::EmptyInput);
    }
    if x.nrows() != y.len() {
        return Err(ModelError::LengthMismatch { expected: x.nrows(), actual: y.len() });
    }
    if !x.iter().all(|v| v.is_finite()) {
        return Err(ModelError::NonFinite("features"));
    }
    if !y.iter().all(|v| v.is_finite()) {
        return Err(ModelError::NonFinite("targets"));
    }
    Ok(())
}

/// Shared argument check for `predict` implementations.
pub fn check_feature_count(expected: usize, x: &Array2<f64>) -> Result<(), ModelError> {
    if x.ncols() != expected {
        return Err(ModelError::FeatureMismatch { expected, actual: x.ncols() });
    }
    Ok(())
}
