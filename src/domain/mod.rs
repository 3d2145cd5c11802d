// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits that define the core concepts:
// what a sample is, how a regression is scored, what a trained
// model's parameters look like, and what a model must be able
// to do.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only data types, pure math, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Feature rows, named columns and the target vector
pub mod sample;

// MSE / RMSE / MAE / R² over a pair of vectors
pub mod metrics;

// Serialisable parameter snapshots of trained models
pub mod params;

// Typed failures raised while fitting or predicting
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
