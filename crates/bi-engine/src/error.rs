//! Error types for the ordering engine.

use bi_core::CoreError;

/// Errors that can occur during engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The underlying encounter rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A roll formula could not be parsed.
    #[error("invalid roll formula: {0}")]
    InvalidFormula(String),

    /// Living combatants still have to roll before the operation can run.
    #[error("still waiting on initiative from: {}", .0.join(", "))]
    RollsPending(Vec<String>),
}

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
