//! Error types for client coordination.

use std::time::Duration;

use thiserror::Error;

/// Result type for coordination operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while coordinating clients.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The encounter ended while waiting on it.
    #[error("encounter ended")]
    EncounterEnded,

    /// Another client became the writer mid-operation.
    #[error("lost writer election")]
    LostElection,

    /// The caller cancelled the operation.
    #[error("cancelled")]
    Cancelled,

    /// Combatants were still unrolled when the wait ran out.
    #[error("timed out after {waited:?} waiting on: {}", .pending.join(", "))]
    Timeout {
        /// How long the wait lasted.
        waited: Duration,
        /// Names of combatants that never rolled.
        pending: Vec<String>,
    },

    /// A relay message could not be decoded.
    #[error("invalid relay message: {0}")]
    InvalidMessage(#[from] serde_json::Error),
}
