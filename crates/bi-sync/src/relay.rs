//! Messages relayed between clients over the host's pub/sub channel.

use bi_core::{CombatantId, SessionUser, UserId};
use serde::{Deserialize, Serialize};

use crate::election::is_authoritative;
use crate::error::SyncResult;

/// Channel name on the host relay.
pub const CHANNEL: &str = "module.bracket-initiative";

/// What happened to the combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayEvent {
    /// The combatant rolled; its followers need resolving.
    InitiativeRolled,
    /// A player supplied a physical die result.
    ManualRoll {
        /// The raw die value.
        value: i32,
    },
}

/// A request from one client to the writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayMessage {
    /// The combatant concerned.
    pub combatant: CombatantId,
    /// The event tag.
    pub event: RelayEvent,
}

impl RelayMessage {
    /// Build a message.
    pub fn new(combatant: CombatantId, event: RelayEvent) -> Self {
        Self { combatant, event }
    }

    /// Encode for the relay.
    pub fn to_json(&self) -> SyncResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from the relay.
    pub fn from_json(json: &str) -> SyncResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// What a client should do with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayAction {
    /// This client is the writer: perform the update.
    Apply,
    /// Pass the message on to the writer.
    Forward,
    /// Drop the message.
    Ignore,
}

/// Decide how `local` handles `message`.
///
/// The writer applies everything. Other clients forward only messages about
/// combatants they control, so a player cannot push updates for someone
/// else's token.
pub fn route(
    message: &RelayMessage,
    local: &UserId,
    users: &[SessionUser],
    controllable: &[CombatantId],
) -> RelayAction {
    if is_authoritative(local, users) {
        tracing::debug!(combatant = %message.combatant, event = ?message.event, "applying relayed update");
        RelayAction::Apply
    } else if controllable.contains(&message.combatant) {
        RelayAction::Forward
    } else {
        tracing::debug!(combatant = %message.combatant, user = %local, "ignoring relay for uncontrolled combatant");
        RelayAction::Ignore
    }
}
