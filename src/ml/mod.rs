// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// The four regressors, the training loop that compares them, and
// the inferencer that rebuilds a saved model.
//
//   linear.rs     — normal equations + Gaussian elimination
//   forest.rs     — bootstrap ensemble of randomised trees
//   boosting.rs   — gradient boosting of linear residual fits
//   network.rs    — one-hidden-layer network trained with Burn
//   importance.rs — correlation / coefficient feature rankings
//   trainer.rs    — fit, score, skip failures, pick the best
//   inferencer.rs — snapshot → model → predictions
//
// Only network.rs imports Burn; everything else is plain ndarray.

pub mod linear;

pub mod forest;

pub mod boosting;

/// Burn-backed feed-forward regressor
pub mod network;

pub mod importance;

/// Training and evaluation loop shared by all models
pub mod trainer;

/// Prediction from a saved snapshot
pub mod inferencer;
