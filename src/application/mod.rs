// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Each use case runs one CLI command end to end by wiring the
// data, ml and infra layers together. No model math lives here.
//
//   train_use_case.rs    — compare all four models, save the best
//   baseline_use_case.rs — single linear model on uniform data
//   predict_use_case.rs  — predict with a saved model bundle
//   generate_use_case.rs — write a synthetic dataset CSV
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The model comparison workflow
pub mod train_use_case;

pub mod baseline_use_case;

// Inference from a saved bundle
pub mod predict_use_case;

pub mod generate_use_case;
