use thiserror::Error;

/// Failures raised by the numeric layer. The application layer
/// wraps these in `anyhow::Error` with context.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("no samples to work with")]
    EmptyInput,

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("model was fitted on {expected} features but input has {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("invalid model snapshot: {0}")]
    InvalidParams(String),

    #[error("{0} has not been fitted")]
    NotFitted(String),

    #[error("tensor conversion failed: {0}")]
    Tensor(String),
}
