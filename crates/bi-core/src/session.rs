use std::fmt;

use serde::{Deserialize, Serialize};

/// Host identifier of a connected user. Ordered lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Wrap a host user identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A user known to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Host identifier.
    pub id: UserId,
    /// Whether the user has game-master privileges.
    pub is_gm: bool,
    /// Whether the user is currently connected.
    pub active: bool,
}

impl SessionUser {
    /// A connected game master.
    pub fn gm(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            is_gm: true,
            active: true,
        }
    }

    /// A connected player.
    pub fn player(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            is_gm: false,
            active: true,
        }
    }

    /// Mark the user as disconnected.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
