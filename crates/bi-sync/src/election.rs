//! Writer election among connected game masters.

use bi_core::{SessionUser, UserId};

/// The client allowed to persist changes: the connected GM with the
/// smallest id. `None` when no GM is connected.
///
/// Recompute on every decision; GMs come and go between events.
pub fn elect_writer(users: &[SessionUser]) -> Option<UserId> {
    users
        .iter()
        .filter(|u| u.is_gm && u.active)
        .map(|u| &u.id)
        .min()
        .cloned()
}

/// Returns true if `local` is the elected writer.
pub fn is_authoritative(local: &UserId, users: &[SessionUser]) -> bool {
    elect_writer(users).as_ref() == Some(local)
}
