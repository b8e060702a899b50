//! Combatant ordering and bracketing engine.
//!
//! Sorts an encounter's combatants into turn order, groups them into
//! alternating ally/enemy brackets with divider placements, mirrors
//! initiative from leaders to their followers, and evaluates initiative
//! rolls with an optional physical-die override. Everything here is a pure
//! function of its input; persistence is returned as write requests.

pub mod bracket;
pub mod config;
pub mod engine;
pub mod error;
pub mod follow;
pub mod order;
pub mod roll;

pub use bracket::{Bracket, Divider, Partition, Viewer, partition};
pub use config::{EngineConfig, LeadingDivider, OrderingPolicy};
pub use engine::{InitiativeEngine, TrackerRow, TrackerView};
pub use error::{EngineError, EngineResult};
pub use follow::{
    FollowOutcome, Propagation, Unresolved, propagate_from, resolve_all, resolve_follow,
};
pub use order::{compare, is_ally, sort_combatants};
pub use roll::{InitiativeRoll, ManualRoll, RollFormula, roll_initiative};
