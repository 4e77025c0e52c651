use thiserror::Error;

/// Crate-wide error type.
///
/// Setup failures (mesh load, operator assembly, factorization) abort before
/// a run ever starts. Failures raised mid-step are fatal: the semi-implicit
/// scheme has no recoverable state once a solve fails.
#[derive(Error, Debug)]
pub enum TdglError {
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("invalid operator: {0}")]
    InvalidOperator(String),

    #[error("solve failed at step {step}: {reason}")]
    SolveFailure { step: u64, reason: String },

    #[error("io failure: {0}")]
    IoFailure(String),
}

pub type Result<T> = std::result::Result<T, TdglError>;
