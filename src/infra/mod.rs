// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything a run writes to disk, kept out of the model code:
//
//   checkpoint.rs — the best model's bundle (MessagePack) and
//                   the run configuration (JSON)
//
//   metrics.rs    — loss curves of iterative models, one CSV
//                   row per logged epoch
//
//   report.rs     — the JSON result files of the train and
//                   baseline workflows
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Model bundle and config persistence
pub mod checkpoint;

/// Loss history CSV logger
pub mod metrics;

/// JSON result files
pub mod report;
