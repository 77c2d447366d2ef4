//! Status values exchanged with the [`StatusService`](super::ports::StatusService).

use serde::{Deserialize, Serialize};

/// The user's status as collected by the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    Positive,
    Negative,
}

/// Whether a previously recorded status needs to be refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Validity {
    Current,
    Outdated,
}

/// A recorded status together with its validity.
///
/// Produced only by [`StatusService::fetch_status`](super::ports::StatusService::fetch_status)
/// and consumed once by the Check state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub status: Status,
    pub validity: Validity,
}

impl Profile {
    pub const fn new(status: Status, validity: Validity) -> Self {
        Self { status, validity }
    }

    /// `true` when the recorded status does not need refreshing.
    pub fn is_current(&self) -> bool {
        self.validity == Validity::Current
    }
}
