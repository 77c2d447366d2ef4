//! Port traits — the boundary between the flow and the outside world.
//!
//! ```text
//!   StatusService adapter ──▶ FlowController ──▶ EventSink adapter
//! ```
//!
//! The [`FlowController`](super::service::FlowController) consumes a
//! [`StatusService`] via generics and reports to a single [`EventSink`],
//! so the flow never touches a network client or a UI directly.

use core::future::Future;

use super::events::Event;
use super::profile::{Profile, Status};
use crate::error::ServiceError;

// ───────────────────────────────────────────────────────────────
// Status service port (driven adapter: backend ↔ flow)
// ───────────────────────────────────────────────────────────────

/// Fetches and submits the user's status, typically against a remote API.
///
/// The returned futures are polled on the controller's local executor, so
/// they need not be `Send`.  Implementations are free to hand the actual
/// work to other threads as long as they wake the future when done; the
/// controller applies the result on its own thread.
pub trait StatusService {
    /// Retrieve the current profile.
    fn fetch_status(&self) -> impl Future<Output = Result<Profile, ServiceError>>;

    /// Record a new status.  `Ok(false)` means the backend declined it;
    /// the flow treats that the same as an error.
    fn submit_status(&self, status: Status) -> impl Future<Output = Result<bool, ServiceError>>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: flow → UI / logging)
// ───────────────────────────────────────────────────────────────

/// Receives every [`Event`] the flow emits, in order.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

/// Adapts a closure to [`EventSink`].
pub struct CallbackSink<F>(pub F);

impl<F: FnMut(Event)> EventSink for CallbackSink<F> {
    fn emit(&mut self, event: Event) {
        (self.0)(event);
    }
}
