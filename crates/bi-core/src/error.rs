use crate::combatant::CombatantId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when reading or updating an encounter.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An operation needed an encounter but none is active.
    #[error("no active encounter")]
    NoActiveEncounter,

    /// The requested combatant is not part of the encounter.
    #[error("combatant not found: {0}")]
    CombatantNotFound(CombatantId),

    /// The encounter snapshot could not be (de)serialized.
    #[error("invalid encounter data: {0}")]
    Serde(#[from] serde_json::Error),
}
