use serde::{Deserialize, Serialize};

use crate::combatant::{CombatantId, CombatantRecord};
use crate::error::{CoreError, CoreResult};

/// A request to persist a combatant's initiative on the host.
///
/// `value: None` clears the roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeWrite {
    /// The combatant to update.
    pub id: CombatantId,
    /// The new initiative.
    pub value: Option<i32>,
}

impl InitiativeWrite {
    /// A write that sets the initiative to `value`.
    pub fn set(id: CombatantId, value: i32) -> Self {
        Self {
            id,
            value: Some(value),
        }
    }

    /// A write that clears the initiative.
    pub fn clear(id: CombatantId) -> Self {
        Self { id, value: None }
    }
}

/// Snapshot of the host's active encounter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    /// Host identifier of the encounter.
    #[serde(default)]
    pub id: String,
    /// Current round (0 before the encounter starts).
    #[serde(default)]
    pub round: u32,
    /// Index of the current turn in the tracker.
    #[serde(default)]
    pub turn: u32,
    /// All combatants in host order.
    pub combatants: Vec<CombatantRecord>,
}

impl Encounter {
    /// Create an encounter from a list of combatants.
    pub fn new(combatants: Vec<CombatantRecord>) -> Self {
        Self {
            combatants,
            ..Self::default()
        }
    }

    /// Look up a combatant by id.
    pub fn combatant(&self, id: &CombatantId) -> Option<&CombatantRecord> {
        self.combatants.iter().find(|c| &c.id == id)
    }

    /// Look up a combatant by id for mutation.
    pub fn combatant_mut(&mut self, id: &CombatantId) -> CoreResult<&mut CombatantRecord> {
        self.combatants
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| CoreError::CombatantNotFound(id.clone()))
    }

    /// All combatants with exactly this name.
    pub fn by_name(&self, name: &str) -> Vec<&CombatantRecord> {
        self.combatants.iter().filter(|c| c.name == name).collect()
    }

    /// Apply a single write request.
    pub fn apply(&mut self, write: &InitiativeWrite) -> CoreResult<()> {
        self.combatant_mut(&write.id)?.initiative = write.value;
        Ok(())
    }

    /// Apply a batch of write requests, stopping at the first unknown id.
    pub fn apply_all<'a>(
        &mut self,
        writes: impl IntoIterator<Item = &'a InitiativeWrite>,
    ) -> CoreResult<()> {
        for write in writes {
            self.apply(write)?;
        }
        Ok(())
    }

    /// Names of living combatants that still need to roll.
    pub fn missing_rolls(&self) -> Vec<&str> {
        self.combatants
            .iter()
            .filter(|c| !c.defeated && !c.has_rolled())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Returns true once every living combatant has initiative.
    pub fn all_rolled(&self) -> bool {
        self.combatants.iter().all(|c| c.defeated || c.has_rolled())
    }

    /// Whether a user may (re)roll initiative right now.
    ///
    /// GMs always may. Players may only while the round's rolls are still
    /// being collected.
    pub fn can_roll(&self, is_gm: bool) -> bool {
        is_gm || !self.all_rolled()
    }

    /// Start the next round: bump the round, return to the first turn and
    /// clear every roll. Returns the clear requests for the host.
    pub fn advance_round(&mut self) -> Vec<InitiativeWrite> {
        self.round += 1;
        self.turn = 0;
        self.combatants
            .iter_mut()
            .map(|c| {
                c.initiative = None;
                InitiativeWrite::clear(c.id.clone())
            })
            .collect()
    }
}

/// The host's encounter slot: either an active encounter or nothing.
///
/// Serialized as the encounter itself, or `null` when there is none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveEncounter(pub Option<Encounter>);

impl ActiveEncounter {
    /// Parse the host's JSON encounter slot.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the slot back to pretty JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Borrow the active encounter or fail.
    pub fn require(&self) -> CoreResult<&Encounter> {
        self.0.as_ref().ok_or(CoreError::NoActiveEncounter)
    }

    /// Mutably borrow the active encounter or fail.
    pub fn require_mut(&mut self) -> CoreResult<&mut Encounter> {
        self.0.as_mut().ok_or(CoreError::NoActiveEncounter)
    }
}

impl From<Encounter> for ActiveEncounter {
    fn from(encounter: Encounter) -> Self {
        Self(Some(encounter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Encounter {
        Encounter::new(vec![
            CombatantRecord::new("a", "Aria").with_initiative(12),
            CombatantRecord::new("b", "Bram"),
            CombatantRecord::new("c", "Corpse").defeated(),
        ])
    }

    #[test]
    fn apply_updates_initiative() {
        let mut enc = sample();
        enc.apply(&InitiativeWrite::set(CombatantId::from("b"), 9))
            .unwrap();
        assert_eq!(enc.combatant(&"b".into()).unwrap().initiative, Some(9));
    }

    #[test]
    fn apply_unknown_id_fails() {
        let mut enc = sample();
        let err = enc
            .apply(&InitiativeWrite::set(CombatantId::from("zz"), 1))
            .unwrap_err();
        assert!(matches!(err, CoreError::CombatantNotFound(_)));
    }

    #[test]
    fn missing_rolls_skip_defeated() {
        let enc = sample();
        assert_eq!(enc.missing_rolls(), vec!["Bram"]);
        assert!(!enc.all_rolled());
    }

    #[test]
    fn players_roll_only_while_rolls_are_open() {
        let mut enc = sample();
        assert!(enc.can_roll(false));
        enc.apply(&InitiativeWrite::set("b".into(), 3)).unwrap();
        assert!(enc.all_rolled());
        assert!(!enc.can_roll(false));
        assert!(enc.can_roll(true));
    }

    #[test]
    fn advance_round_clears_everything() {
        let mut enc = sample();
        enc.round = 2;
        enc.turn = 1;
        let writes = enc.advance_round();
        assert_eq!(enc.round, 3);
        assert_eq!(enc.turn, 0);
        assert_eq!(writes.len(), 3);
        assert!(writes.iter().all(|w| w.value.is_none()));
        assert!(enc.combatants.iter().all(|c| c.initiative.is_none()));
    }

    #[test]
    fn null_slot_means_no_encounter() {
        let slot = ActiveEncounter::from_json("null").unwrap();
        assert!(matches!(slot.require(), Err(CoreError::NoActiveEncounter)));
    }

    #[test]
    fn slot_round_trips_through_json() {
        let slot = ActiveEncounter::from(sample());
        let json = slot.to_json().unwrap();
        let back = ActiveEncounter::from_json(&json).unwrap();
        assert_eq!(back, slot);
    }
}
