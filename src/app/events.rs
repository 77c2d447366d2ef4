//! Outbound flow events.
//!
//! The [`FlowController`](super::service::FlowController) emits these to its
//! single observer, one per state entry, in transition order.  Events are
//! informational only: nothing is buffered, so an observer attached late
//! misses whatever was emitted before it.

use serde::{Deserialize, Serialize};

/// Events dispatched by the flow to the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Event {
    /// Check state entered; the status is being fetched.
    Check,
    /// The status is up to date. Nothing to do until the next `check()`.
    UpToDate,
    /// The status is outdated. Prompt the user to update it, then call
    /// `update()` or `cancel()`.
    Prompt,
    /// The user declined to update when prompted.
    Postponed,
    /// Update state entered. Call `save(status)` or `cancel()`.
    Update,
    /// The user cancelled instead of saving.
    Cancelled,
    /// Save state entered; the status is being submitted. Followed by
    /// `Updated` or `Failed`.
    Save,
    /// The status was saved.
    Updated,
    /// Fetching or saving the status failed. The caller may retry with `check()`.
    Failed,
}

impl Event {
    /// `true` for events emitted on entry to the Final state, i.e. the ones
    /// that mark the end of an interaction.  After a terminal event the
    /// caller may start over with `check()`.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::UpToDate | Self::Postponed | Self::Cancelled | Self::Updated | Self::Failed
        )
    }
}
