//! Leader-follower initiative propagation.
//!
//! A combatant may follow another by name, in which case its initiative
//! mirrors the leader's. Leaders can themselves follow someone, so a pass
//! resolves leaders before their followers and a chain settles in a single
//! pass. A per-pass visiting set cuts cycles: every member of a cycle, and
//! everyone chained into it, ends up [`Unresolved::Cycle`].

use std::collections::HashSet;
use std::fmt;

use bi_core::{CombatantId, CombatantRecord, InitiativeWrite};
use serde::Serialize;

/// Why a follower could not take its leader's initiative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unresolved {
    /// The combatant names itself as its leader.
    SelfReference,
    /// No combatant with the leader's name is in the encounter.
    TargetMissing,
    /// More than one combatant carries the leader's name.
    TargetAmbiguous,
    /// The leader has not rolled yet; retry after its roll.
    TargetNotRolled,
    /// The follow links loop back on themselves.
    Cycle,
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfReference => write!(f, "follows itself"),
            Self::TargetMissing => write!(f, "leader not in encounter"),
            Self::TargetAmbiguous => write!(f, "leader name is ambiguous"),
            Self::TargetNotRolled => write!(f, "leader has not rolled"),
            Self::Cycle => write!(f, "follow cycle"),
        }
    }
}

/// Result of resolving one combatant against its leader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowOutcome {
    /// The combatant follows nobody.
    NotApplicable,
    /// The combatant took the leader's value; a write is required.
    Updated(i32),
    /// The combatant already mirrors the leader; nothing to write.
    Current(i32),
    /// The leader could not be used.
    Unresolvable(Unresolved),
}

impl fmt::Display for FollowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApplicable => write!(f, "not following"),
            Self::Updated(v) => write!(f, "updated to {v}"),
            Self::Current(v) => write!(f, "already at {v}"),
            Self::Unresolvable(why) => write!(f, "unresolvable ({why})"),
        }
    }
}

/// Outcomes and write requests from one propagation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Propagation {
    /// Outcome per follower, in resolution order.
    pub outcomes: Vec<(CombatantId, FollowOutcome)>,
    /// Initiative writes for the host, at most one per combatant.
    pub writes: Vec<InitiativeWrite>,
}

impl Propagation {
    /// The outcome recorded for a combatant, if it was resolved.
    pub fn outcome(&self, id: &CombatantId) -> Option<FollowOutcome> {
        self.outcomes
            .iter()
            .find(|(oid, _)| oid == id)
            .map(|(_, o)| *o)
    }

    /// Returns true if the pass produced no writes.
    pub fn is_noop(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Find the single combatant a follower points at.
fn locate(
    records: &[CombatantRecord],
    follower: &CombatantRecord,
    target: &str,
) -> Result<usize, Unresolved> {
    let matches: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.name == target)
        .map(|(i, _)| i)
        .collect();
    if matches.iter().any(|&i| records[i].id == follower.id) {
        return Err(Unresolved::SelfReference);
    }
    match matches.as_slice() {
        [] => Err(Unresolved::TargetMissing),
        [only] => Ok(*only),
        _ => Err(Unresolved::TargetAmbiguous),
    }
}

/// Resolve one combatant against the current values of `active_set`.
///
/// Does not look past the leader: if the leader itself follows someone,
/// its current value is taken as-is. Use [`resolve_all`] for chains.
pub fn resolve_follow(
    combatant: &CombatantRecord,
    active_set: &[CombatantRecord],
) -> FollowOutcome {
    let Some(target) = combatant.follow_target.as_deref() else {
        return FollowOutcome::NotApplicable;
    };
    let leader = match locate(active_set, combatant, target) {
        Ok(i) => &active_set[i],
        Err(why) => return FollowOutcome::Unresolvable(why),
    };
    match leader.initiative {
        None => FollowOutcome::Unresolvable(Unresolved::TargetNotRolled),
        Some(v) if combatant.initiative == Some(v) => FollowOutcome::Current(v),
        Some(v) => FollowOutcome::Updated(v),
    }
}

#[derive(Clone, Copy)]
enum Visit {
    Unvisited,
    Visiting,
    Done(FollowOutcome),
}

/// Depth-first resolution state for one pass.
struct Pass<'a> {
    records: &'a [CombatantRecord],
    values: Vec<Option<i32>>,
    state: Vec<Visit>,
    order: Vec<usize>,
}

impl<'a> Pass<'a> {
    fn new(records: &'a [CombatantRecord]) -> Self {
        Self {
            records,
            values: records.iter().map(|r| r.initiative).collect(),
            state: vec![Visit::Unvisited; records.len()],
            order: Vec::new(),
        }
    }

    fn visit(&mut self, i: usize) -> FollowOutcome {
        match self.state[i] {
            Visit::Done(outcome) => return outcome,
            Visit::Visiting => return FollowOutcome::Unresolvable(Unresolved::Cycle),
            Visit::Unvisited => {}
        }

        let records = self.records;
        let record = &records[i];
        let Some(target) = record.follow_target.as_deref() else {
            return self.finish(i, FollowOutcome::NotApplicable);
        };
        let leader = match locate(records, record, target) {
            Ok(leader) => leader,
            Err(why) => return self.finish(i, FollowOutcome::Unresolvable(why)),
        };

        self.state[i] = Visit::Visiting;
        let upstream = self.visit(leader);
        let outcome = if upstream == FollowOutcome::Unresolvable(Unresolved::Cycle) {
            upstream
        } else {
            match self.values[leader] {
                None => FollowOutcome::Unresolvable(Unresolved::TargetNotRolled),
                Some(v) if self.values[i] == Some(v) => FollowOutcome::Current(v),
                Some(v) => {
                    self.values[i] = Some(v);
                    FollowOutcome::Updated(v)
                }
            }
        };
        self.finish(i, outcome)
    }

    fn finish(&mut self, i: usize, outcome: FollowOutcome) -> FollowOutcome {
        self.state[i] = Visit::Done(outcome);
        self.order.push(i);
        outcome
    }

    fn into_propagation(self, scope: impl Fn(usize) -> bool) -> Propagation {
        let mut result = Propagation::default();
        for &i in &self.order {
            let record = &self.records[i];
            if record.follow_target.is_none() || !scope(i) {
                continue;
            }
            let Visit::Done(outcome) = self.state[i] else {
                continue;
            };
            log_outcome(record, outcome);
            if let FollowOutcome::Updated(v) = outcome {
                result.writes.push(InitiativeWrite::set(record.id.clone(), v));
            }
            result.outcomes.push((record.id.clone(), outcome));
        }
        result
    }
}

fn log_outcome(record: &CombatantRecord, outcome: FollowOutcome) {
    match outcome {
        FollowOutcome::Unresolvable(Unresolved::TargetNotRolled) => tracing::debug!(
            combatant = %record.id,
            leader = record.follow_target.as_deref().unwrap_or_default(),
            "leader has not rolled yet"
        ),
        FollowOutcome::Unresolvable(why) => tracing::warn!(
            combatant = %record.id,
            name = %record.name,
            leader = record.follow_target.as_deref().unwrap_or_default(),
            "cannot follow: {why}"
        ),
        _ => {}
    }
}

/// Resolve every follower in the encounter in one pass.
pub fn resolve_all(records: &[CombatantRecord]) -> Propagation {
    let mut pass = Pass::new(records);
    for i in 0..records.len() {
        pass.visit(i);
    }
    pass.into_propagation(|_| true)
}

/// Re-resolve `leader` and everyone transitively following it.
///
/// Returns `None` if `leader` is not among `records`.
pub fn propagate_from(records: &[CombatantRecord], leader: &CombatantId) -> Option<Propagation> {
    let root = records.iter().position(|r| &r.id == leader)?;

    let mut scope = HashSet::from([root]);
    let mut queue = vec![root];
    while let Some(current) = queue.pop() {
        let name = records[current].name.as_str();
        for (i, r) in records.iter().enumerate() {
            if r.follow_target.as_deref() == Some(name) && scope.insert(i) {
                queue.push(i);
            }
        }
    }

    let mut pass = Pass::new(records);
    let mut members: Vec<usize> = scope.iter().copied().collect();
    members.sort_unstable();
    for &i in &members {
        pass.visit(i);
    }
    Some(pass.into_propagation(|i| scope.contains(&i)))
}
