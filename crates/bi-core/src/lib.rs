//! Core types for Bracket Initiative: combatants, encounters, and session users.
//!
//! These are the typed shapes the host glue marshals to and from the
//! virtual tabletop. The crate holds no behavior beyond bookkeeping on an
//! [`Encounter`] snapshot; ordering and bracketing live in `bi-engine`.

/// Combatant records, identifiers, and token dispositions.
pub mod combatant;
/// Encounter snapshots and initiative write requests.
pub mod encounter;
/// Error types used throughout the crate.
pub mod error;
/// Session users and their identifiers.
pub mod session;

/// Re-export combatant types.
pub use combatant::{CombatantId, CombatantRecord, Disposition};
/// Re-export encounter types.
pub use encounter::{ActiveEncounter, Encounter, InitiativeWrite};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export session types.
pub use session::{SessionUser, UserId};
