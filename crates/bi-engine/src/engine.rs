//! The initiative engine service object.
//!
//! `InitiativeEngine` bundles the comparator, the bracket partitioner and
//! the follow resolver behind one configured value. It keeps no state
//! between calls; construct one per encounter context and pass it by
//! reference to whatever handles host events.

use std::cmp::Ordering;

use bi_core::{ActiveEncounter, CombatantId, CombatantRecord, CoreError, Encounter};
use rand::rngs::StdRng;
use serde::Serialize;

use crate::bracket::{self, Bracket, Partition, Viewer};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::follow::{self, Propagation};
use crate::order;
use crate::roll::{self, InitiativeRoll};

/// One row of the rendered combat tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerRow {
    /// Combatant id.
    pub id: CombatantId,
    /// Display name.
    pub name: String,
    /// Rolled initiative.
    pub initiative: Option<i32>,
    /// Derived ally flag.
    pub ally: bool,
    /// Assigned bracket.
    pub bracket: Bracket,
    /// A divider sits directly above this row.
    pub divider_before: bool,
    /// A divider sits directly below this row.
    pub divider_after: bool,
}

/// The tracker in turn order, plus the raw partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerView {
    /// Rows in turn order.
    pub rows: Vec<TrackerRow>,
    /// Brackets, dividers, and the needs-roll list.
    pub partition: Partition,
}

/// Stateless ordering, bracketing and follow-resolution service.
#[derive(Debug, Clone, Default)]
pub struct InitiativeEngine {
    config: EngineConfig,
}

impl InitiativeEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compare two combatants for turn order.
    pub fn compare(&self, a: &CombatantRecord, b: &CombatantRecord) -> Ordering {
        order::compare(self.config.ordering, a, b)
    }

    /// Stable sort into turn order.
    pub fn sort(&self, records: &mut [CombatantRecord]) {
        order::sort_combatants(self.config.ordering, records);
    }

    /// A sorted copy of the encounter's combatants.
    pub fn sorted(&self, encounter: &Encounter) -> Vec<CombatantRecord> {
        let mut records = encounter.combatants.clone();
        self.sort(&mut records);
        records
    }

    /// Ally classification.
    pub fn is_ally(&self, record: &CombatantRecord) -> bool {
        order::is_ally(record)
    }

    /// Partition an already sorted list.
    pub fn partition(&self, sorted: &[CombatantRecord], viewer: Viewer) -> Partition {
        bracket::partition(sorted, viewer, self.config.leading_divider)
    }

    /// Sort and partition the active encounter for rendering.
    pub fn tracker(&self, slot: &ActiveEncounter, viewer: Viewer) -> EngineResult<TrackerView> {
        let encounter = slot.require()?;
        let sorted = self.sorted(encounter);
        let partition = self.partition(&sorted, viewer);
        if self.config.debug {
            tracing::debug!(
                combatants = sorted.len(),
                brackets = partition.bracket_count(),
                dividers = partition.dividers.len(),
                ?viewer,
                "tracker partitioned"
            );
        }

        let rows = sorted
            .into_iter()
            .map(|r| TrackerRow {
                ally: order::is_ally(&r),
                bracket: partition.bracket(&r.id),
                divider_before: partition.divider_before(&r.id),
                divider_after: partition.divider_after(&r.id),
                id: r.id,
                name: r.name,
                initiative: r.initiative,
            })
            .collect();
        Ok(TrackerView { rows, partition })
    }

    /// Resolve every follower in the active encounter.
    pub fn resolve_follows(&self, slot: &ActiveEncounter) -> EngineResult<Propagation> {
        let encounter = slot.require()?;
        let pass = follow::resolve_all(&encounter.combatants);
        self.trace_pass("full", &pass);
        Ok(pass)
    }

    /// Re-resolve the followers of one leader after it rolled.
    pub fn propagate_from(
        &self,
        slot: &ActiveEncounter,
        leader: &CombatantId,
    ) -> EngineResult<Propagation> {
        let encounter = slot.require()?;
        let pass = follow::propagate_from(&encounter.combatants, leader)
            .ok_or_else(|| CoreError::CombatantNotFound(leader.clone()))?;
        self.trace_pass("leader", &pass);
        Ok(pass)
    }

    /// Finish a "roll all": every living combatant must have rolled. Returns
    /// the turn to the top and mirrors leaders onto followers, applying the
    /// writes to the snapshot and returning them for the host.
    pub fn after_roll_all(&self, slot: &mut ActiveEncounter) -> EngineResult<Propagation> {
        let encounter = slot.require_mut()?;
        if !encounter.all_rolled() {
            let pending = encounter
                .missing_rolls()
                .into_iter()
                .map(str::to_string)
                .collect();
            return Err(EngineError::RollsPending(pending));
        }
        encounter.turn = 0;
        let pass = follow::resolve_all(&encounter.combatants);
        encounter.apply_all(&pass.writes)?;
        self.trace_pass("roll-all", &pass);
        Ok(pass)
    }

    /// Evaluate an initiative roll with an optional manual die value.
    pub fn roll(
        &self,
        formula: &str,
        manual_input: Option<&str>,
        rng: &mut StdRng,
    ) -> EngineResult<InitiativeRoll> {
        let roll = roll::roll_initiative(formula, manual_input, rng)?;
        if self.config.debug {
            tracing::debug!(formula = roll.formula(), total = roll.total(), "initiative rolled");
        }
        Ok(roll)
    }

    fn trace_pass(&self, kind: &str, pass: &Propagation) {
        if self.config.debug {
            tracing::debug!(
                kind,
                resolved = pass.outcomes.len(),
                writes = pass.writes.len(),
                "follow pass complete"
            );
        }
    }
}
