//! Configuration for the ordering engine.

use serde::{Deserialize, Serialize};

/// Tie-break policy for the turn-order comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingPolicy {
    /// Break initiative ties on dexterity before falling back to names.
    pub dexterity_tiebreak: bool,
}

impl Default for OrderingPolicy {
    fn default() -> Self {
        Self {
            dexterity_tiebreak: true,
        }
    }
}

/// When to place a divider in front of a tracker that opens with enemies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadingDivider {
    /// Never mark the leading enemies.
    Never,
    /// Mark them for player views only; GMs already see everything.
    #[default]
    PlayersOnly,
    /// Mark them for every viewer.
    Always,
}

/// Configuration for an [`InitiativeEngine`](crate::InitiativeEngine).
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Emit per-call debug traces.
    pub debug: bool,
    /// Comparator tie-break policy.
    pub ordering: OrderingPolicy,
    /// Leading divider presentation policy.
    pub leading_divider: LeadingDivider,
}

impl EngineConfig {
    /// Enable or disable debug traces.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Enable or disable the dexterity tie-break.
    pub fn with_dexterity_tiebreak(mut self, enabled: bool) -> Self {
        self.ordering.dexterity_tiebreak = enabled;
        self
    }

    /// Set the leading divider policy.
    pub fn with_leading_divider(mut self, policy: LeadingDivider) -> Self {
        self.leading_divider = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = EngineConfig::default();
        assert!(!cfg.debug);
        assert!(cfg.ordering.dexterity_tiebreak);
        assert_eq!(cfg.leading_divider, LeadingDivider::PlayersOnly);
    }

    #[test]
    fn builder_methods() {
        let cfg = EngineConfig::default()
            .with_debug(true)
            .with_dexterity_tiebreak(false)
            .with_leading_divider(LeadingDivider::Always);
        assert!(cfg.debug);
        assert!(!cfg.ordering.dexterity_tiebreak);
        assert_eq!(cfg.leading_divider, LeadingDivider::Always);
    }
}
