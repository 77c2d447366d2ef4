//! Application core — the status flow and its boundary.
//!
//! [`service::FlowController`] owns the FSM and drives it.  The status
//! backend and the observer are reached only through the **port traits**
//! in [`ports`], keeping this layer testable with mock adapters.

pub mod commands;
pub mod events;
pub mod ports;
pub mod profile;
pub mod service;
