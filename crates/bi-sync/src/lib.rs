//! Single-writer coordination between connected clients.
//!
//! Only one client, the elected writer, persists initiative changes. Every
//! other client relays requests to it. The writer also owns the bounded
//! wait that follows a bulk roll.

pub mod cancel;
pub mod election;
pub mod error;
pub mod readiness;
pub mod relay;

pub use cancel::{CancelHandle, CancelToken, cancel_pair};
pub use election::{elect_writer, is_authoritative};
pub use error::{SyncError, SyncResult};
pub use readiness::{PollConfig, SessionView, wait_until_rolled};
pub use relay::{RelayAction, RelayEvent, RelayMessage, route};
