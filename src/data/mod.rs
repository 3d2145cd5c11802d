// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between "where do samples come from" and "design
// matrices ready for a model":
//
//   CSV file  ──or──  synthetic generator
//       │
//       ▼
//   FeatureTable      → named columns + rows
//       │
//       ▼
//   split_train_test  → 80/20 partition
//       │
//       ▼
//   CarbonDataset     → ndarray matrices for training and test

/// Reads and writes datasets as CSV
pub mod loader;

/// Deterministic synthetic datasets
pub mod synthetic;

/// Splits samples into train/test sets
pub mod splitter;

/// Train/test partitions as ndarray matrices
pub mod dataset;
