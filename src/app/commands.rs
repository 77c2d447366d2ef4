//! Inbound operations.
//!
//! These represent the actions the caller (typically a UI layer) requests
//! through the [`FlowController`](super::service::FlowController).  Each is
//! a no-op unless the active state handles it.

use super::profile::Status;

/// Operations dispatched to the active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Start an interaction. Handled by Final.
    Check,
    /// Opt in to updating the status. Handled by Prompt.
    Update,
    /// Save the given status. Handled by Update.
    Save(Status),
    /// Opt out. Handled by Prompt (postpone) and Update (cancel).
    Cancel,
}

impl Operation {
    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Update => "update",
            Self::Save(_) => "save",
            Self::Cancel => "cancel",
        }
    }

    /// Whether the state this operation leads to calls the status service.
    pub fn starts_service_call(&self) -> bool {
        matches!(self, Self::Check | Self::Save(_))
    }
}
