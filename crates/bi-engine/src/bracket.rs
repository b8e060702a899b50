//! Ally/enemy bracket partitioning of a sorted turn order.
//!
//! Walks the tracker in turn order and starts a new bracket every time
//! ally status flips between consecutive rolled combatants. Unrolled
//! combatants stay where they are in the display, get no bracket, and are
//! skipped when deciding adjacency.

use std::collections::BTreeMap;

use bi_core::{CombatantId, CombatantRecord};
use serde::Serialize;

use crate::config::LeadingDivider;
use crate::order::is_ally;

/// Who the tracker is being rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Viewer {
    /// A game master.
    Gm,
    /// A player.
    Player,
}

/// A combatant's bracket.
///
/// Serialized as the index, or `-1` when unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(into = "i32")]
pub enum Bracket {
    /// Not bracketed (initiative not rolled yet).
    Unassigned,
    /// Zero-based bracket index.
    Index(u32),
}

impl Bracket {
    /// The bracket index, if assigned.
    pub fn index(self) -> Option<u32> {
        match self {
            Self::Unassigned => None,
            Self::Index(i) => Some(i),
        }
    }
}

impl From<Bracket> for i32 {
    fn from(bracket: Bracket) -> Self {
        match bracket {
            Bracket::Unassigned => -1,
            Bracket::Index(i) => i32::try_from(i).unwrap_or(i32::MAX),
        }
    }
}

/// Where to render a boundary marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Divider {
    /// Render the marker directly above this combatant.
    Before(CombatantId),
    /// Render the marker directly below this combatant.
    After(CombatantId),
}

/// Brackets and divider placements for one render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
    /// Bracket per combatant.
    pub brackets: BTreeMap<CombatantId, Bracket>,
    /// Divider placements in display order.
    pub dividers: Vec<Divider>,
    /// Combatants still waiting on a roll, in display order.
    pub needs_roll: Vec<CombatantId>,
}

impl Partition {
    /// The bracket of a combatant; unknown ids are unassigned.
    pub fn bracket(&self, id: &CombatantId) -> Bracket {
        self.brackets.get(id).copied().unwrap_or(Bracket::Unassigned)
    }

    /// Returns true if a divider is placed directly above `id`.
    pub fn divider_before(&self, id: &CombatantId) -> bool {
        self.dividers
            .iter()
            .any(|d| matches!(d, Divider::Before(x) if x == id))
    }

    /// Returns true if a divider is placed directly below `id`.
    pub fn divider_after(&self, id: &CombatantId) -> bool {
        self.dividers
            .iter()
            .any(|d| matches!(d, Divider::After(x) if x == id))
    }

    /// Number of distinct brackets.
    pub fn bracket_count(&self) -> usize {
        self.brackets
            .values()
            .filter_map(|b| b.index())
            .max()
            .map_or(0, |max| max as usize + 1)
    }
}

fn marks_leading_enemies(policy: LeadingDivider, viewer: Viewer) -> bool {
    match policy {
        LeadingDivider::Never => false,
        LeadingDivider::PlayersOnly => viewer == Viewer::Player,
        LeadingDivider::Always => true,
    }
}

/// Partition a list already sorted into turn order.
pub fn partition(
    sorted: &[CombatantRecord],
    viewer: Viewer,
    policy: LeadingDivider,
) -> Partition {
    let mut result = Partition::default();
    // (bracket index, ally) of the previous rolled combatant.
    let mut previous: Option<(u32, bool)> = None;
    let mut last_rolled: Option<usize> = None;

    for (pos, record) in sorted.iter().enumerate() {
        if !record.has_rolled() {
            result
                .brackets
                .insert(record.id.clone(), Bracket::Unassigned);
            result.needs_roll.push(record.id.clone());
            continue;
        }

        let ally = is_ally(record);
        let index = match previous {
            None => {
                if !ally && marks_leading_enemies(policy, viewer) {
                    result.dividers.push(Divider::Before(record.id.clone()));
                }
                0
            }
            Some((index, was_ally)) if was_ally != ally => {
                result.dividers.push(Divider::Before(record.id.clone()));
                index + 1
            }
            Some((index, _)) => index,
        };

        previous = Some((index, ally));
        last_rolled = Some(pos);
        result
            .brackets
            .insert(record.id.clone(), Bracket::Index(index));
    }

    // Close off the rolled section when unrolled combatants trail it.
    if let Some(pos) = last_rolled.filter(|&pos| pos + 1 < sorted.len()) {
        result.dividers.push(Divider::After(sorted[pos].id.clone()));
    }

    result
}
