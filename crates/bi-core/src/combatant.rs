use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier the host assigns to a combatant.
///
/// Stable for the life of an encounter and unique within one ordering pass.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombatantId(pub String);

impl CombatantId {
    /// Wrap a host identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CombatantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Token disposition code as reported by the host.
///
/// Only [`Disposition::FRIENDLY`] matters for ally classification; every
/// other code (including ones the host may add later) counts as non-friendly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Disposition(pub i8);

impl Disposition {
    /// Hidden from players entirely.
    pub const SECRET: Self = Self(-2);
    /// Hostile to the party.
    pub const HOSTILE: Self = Self(-1);
    /// Neither friend nor foe.
    pub const NEUTRAL: Self = Self(0);
    /// Friendly to the party.
    pub const FRIENDLY: Self = Self(1);

    /// Returns true for the friendly code.
    pub fn is_friendly(self) -> bool {
        self == Self::FRIENDLY
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::SECRET => write!(f, "secret"),
            Self::HOSTILE => write!(f, "hostile"),
            Self::NEUTRAL => write!(f, "neutral"),
            Self::FRIENDLY => write!(f, "friendly"),
            Self(code) => write!(f, "disposition({code})"),
        }
    }
}

/// One combatant as read fresh from the host on every relevant event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantRecord {
    /// Host identifier.
    pub id: CombatantId,
    /// Display name; also the key other combatants follow.
    pub name: String,
    /// Rolled initiative, `None` until rolled.
    #[serde(default)]
    pub initiative: Option<i32>,
    /// Whether any player owns this combatant's actor.
    #[serde(default)]
    pub has_player_owner: bool,
    /// Disposition of the combatant's token.
    #[serde(default)]
    pub disposition: Disposition,
    /// Dexterity score, only used as a tie-break.
    #[serde(default)]
    pub dexterity: Option<i32>,
    /// Name of another combatant whose initiative this one mirrors.
    #[serde(default)]
    pub follow_target: Option<String>,
    /// Whether the combatant is dead; defeated combatants never block rolls.
    #[serde(default)]
    pub defeated: bool,
}

impl CombatantRecord {
    /// Create an unrolled, neutral, non-player combatant.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CombatantId::new(id),
            name: name.into(),
            initiative: None,
            has_player_owner: false,
            disposition: Disposition::NEUTRAL,
            dexterity: None,
            follow_target: None,
            defeated: false,
        }
    }

    /// Set the rolled initiative.
    pub fn with_initiative(mut self, initiative: i32) -> Self {
        self.initiative = Some(initiative);
        self
    }

    /// Mark the combatant as owned by a player.
    pub fn owned_by_player(mut self) -> Self {
        self.has_player_owner = true;
        self
    }

    /// Set the token disposition.
    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }

    /// Set the dexterity score.
    pub fn with_dexterity(mut self, dexterity: i32) -> Self {
        self.dexterity = Some(dexterity);
        self
    }

    /// Follow another combatant by name.
    pub fn following(mut self, leader: impl Into<String>) -> Self {
        self.follow_target = Some(leader.into());
        self
    }

    /// Mark the combatant as defeated.
    pub fn defeated(mut self) -> Self {
        self.defeated = true;
        self
    }

    /// Returns true once an initiative value is present.
    pub fn has_rolled(&self) -> bool {
        self.initiative.is_some()
    }
}
