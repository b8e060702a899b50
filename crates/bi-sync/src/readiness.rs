//! Bounded wait for every combatant to roll.
//!
//! After a bulk "roll all" the host settles rolls asynchronously. The
//! writer polls the encounter until every living combatant has initiative,
//! then carries on (turn reset, follow propagation). The wait gives up on
//! timeout, on cancellation, when the encounter goes away, or when this
//! client stops being the writer.

use std::time::Duration;

use bi_core::{CombatantRecord, SessionUser, UserId};
use tokio::time::{Instant, MissedTickBehavior};

use crate::cancel::CancelToken;
use crate::election::is_authoritative;
use crate::error::{SyncError, SyncResult};

/// Polling cadence and bound.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between polls.
    pub interval: Duration,
    /// Give up after this long.
    pub max_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            max_wait: Duration::from_secs(30),
        }
    }
}

impl PollConfig {
    /// Set the poll interval (at least one millisecond).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Set the maximum wait.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }
}

/// Read access to the host session, consulted fresh on every poll.
pub trait SessionView {
    /// Combatants of the active encounter, `None` when there is none.
    fn combatants(&self) -> Option<Vec<CombatantRecord>>;
    /// Users currently known to the session.
    fn users(&self) -> Vec<SessionUser>;
    /// The user this client runs as.
    fn local_user(&self) -> UserId;
}

/// Wait until every living combatant has rolled and return the settled
/// combatants.
pub async fn wait_until_rolled<V>(
    view: &V,
    config: &PollConfig,
    mut cancel: CancelToken,
) -> SyncResult<Vec<CombatantRecord>>
where
    V: SessionView + ?Sized,
{
    let start = Instant::now();
    let deadline = start + config.max_wait;
    let mut ticker = tokio::time::interval(config.interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let expiry = tokio::time::sleep_until(deadline);
    tokio::pin!(expiry);

    loop {
        // One last look at the encounter when the deadline fires between ticks.
        let expired = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SyncError::Cancelled),
            _ = ticker.tick() => false,
            _ = &mut expiry => true,
        };

        let Some(combatants) = view.combatants() else {
            return Err(SyncError::EncounterEnded);
        };
        if !is_authoritative(&view.local_user(), &view.users()) {
            return Err(SyncError::LostElection);
        }

        let pending: Vec<String> = combatants
            .iter()
            .filter(|c| !c.defeated && !c.has_rolled())
            .map(|c| c.name.clone())
            .collect();
        if pending.is_empty() {
            tracing::debug!(waited = ?start.elapsed(), "all combatants rolled");
            return Ok(combatants);
        }
        if expired || Instant::now() >= deadline {
            tracing::warn!(pending = pending.len(), "gave up waiting on initiative rolls");
            return Err(SyncError::Timeout {
                waited: start.elapsed(),
                pending,
            });
        }
        tracing::trace!(pending = pending.len(), "waiting on initiative rolls");
    }
}
