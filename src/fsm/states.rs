//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers — no closures, no trait
//! objects.  Data a state needs (the pending status, the outcome) travels
//! in the [`FlowState`] variant itself; everything else goes through the
//! [`FlowContext`].
//!
//! ```text
//!  FINAL ──[check]──▶ CHECK ──[fetch ok, current]──▶ FINAL(upToDate)
//!    ▲                  │
//!    │         [fetch ok, outdated]     [fetch err]──▶ FINAL(failure)
//!    │                  ▼
//!    │               PROMPT ──[cancel]──▶ FINAL(userPostponed)
//!    │                  │
//!    │              [update]
//!    │                  ▼
//!    │               UPDATE ──[cancel]──▶ FINAL(userCancelled)
//!    │                  │
//!    │             [save(status)]
//!    │                  ▼
//!    └──[submit done]── SAVE   ok → success, err/false → failure
//! ```

use log::{debug, info, warn};

use super::context::{FlowContext, ServiceRequest};
use super::{Completion, FlowState, Outcome, StateDescriptor, StateId};
use crate::app::commands::Operation;
use crate::app::events::Event;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once per controller.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Check
        StateDescriptor {
            id: StateId::Check,
            name: "Check",
            on_enter: Some(check_enter),
            on_exit: Some(retire_ticket),
            on_operation: ignore_operation,
            on_completion: Some(check_completion),
        },
        // Index 1 — Prompt
        StateDescriptor {
            id: StateId::Prompt,
            name: "Prompt",
            on_enter: Some(prompt_enter),
            on_exit: None,
            on_operation: prompt_operation,
            on_completion: None,
        },
        // Index 2 — Update
        StateDescriptor {
            id: StateId::Update,
            name: "Update",
            on_enter: Some(update_enter),
            on_exit: None,
            on_operation: update_operation,
            on_completion: None,
        },
        // Index 3 — Save
        StateDescriptor {
            id: StateId::Save,
            name: "Save",
            on_enter: Some(save_enter),
            on_exit: Some(retire_ticket),
            on_operation: ignore_operation,
            on_completion: Some(save_completion),
        },
        // Index 4 — Final
        StateDescriptor {
            id: StateId::Final,
            name: "Final",
            on_enter: Some(final_enter),
            on_exit: None,
            on_operation: final_operation,
            on_completion: None,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared handlers
// ═══════════════════════════════════════════════════════════════════════════

fn ignore_operation(_state: &FlowState, _op: Operation) -> Option<FlowState> {
    None
}

fn retire_ticket(_state: &FlowState, ctx: &mut FlowContext) {
    if let Some(ticket) = ctx.live_ticket() {
        debug!("retiring ticket {}", ticket.value());
    }
    ctx.retire_ticket();
}

// ═══════════════════════════════════════════════════════════════════════════
//  CHECK state — fetching the recorded status
// ═══════════════════════════════════════════════════════════════════════════

fn check_enter(_state: &FlowState, ctx: &mut FlowContext) {
    if ctx.config.announce_check {
        ctx.emit(Event::Check);
    }
    let ticket = ctx.issue_ticket();
    ctx.request(ServiceRequest::FetchStatus(ticket));
    debug!("CHECK: fetching status (ticket {})", ticket.value());
}

fn check_completion(_state: &FlowState, completion: Completion) -> Option<FlowState> {
    match completion {
        Completion::Fetched { result: Ok(profile), .. } if profile.is_current() => {
            Some(FlowState::Final {
                outcome: Outcome::UpToDate,
            })
        }
        Completion::Fetched { result: Ok(profile), .. } => {
            debug!("CHECK: {:?} status is outdated", profile.status);
            Some(FlowState::Prompt)
        }
        Completion::Fetched { result: Err(e), .. } => {
            warn!("CHECK: fetch failed: {}", e);
            Some(FlowState::Final {
                outcome: Outcome::Failure,
            })
        }
        Completion::Submitted { .. } => {
            debug_assert!(false, "submit completion delivered to Check");
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  PROMPT state — status outdated, asking the user to update
// ═══════════════════════════════════════════════════════════════════════════

fn prompt_enter(_state: &FlowState, ctx: &mut FlowContext) {
    ctx.emit(Event::Prompt);
}

fn prompt_operation(_state: &FlowState, op: Operation) -> Option<FlowState> {
    match op {
        Operation::Update => Some(FlowState::Update),
        Operation::Cancel => Some(FlowState::Final {
            outcome: Outcome::UserPostponed,
        }),
        Operation::Check | Operation::Save(_) => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  UPDATE state — user is editing their status
// ═══════════════════════════════════════════════════════════════════════════

fn update_enter(_state: &FlowState, ctx: &mut FlowContext) {
    ctx.emit(Event::Update);
}

fn update_operation(_state: &FlowState, op: Operation) -> Option<FlowState> {
    match op {
        Operation::Save(status) => Some(FlowState::Save { status }),
        Operation::Cancel => Some(FlowState::Final {
            outcome: Outcome::UserCancelled,
        }),
        Operation::Check | Operation::Update => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  SAVE state — submitting the new status
// ═══════════════════════════════════════════════════════════════════════════

fn save_enter(state: &FlowState, ctx: &mut FlowContext) {
    let FlowState::Save { status } = *state else {
        debug_assert!(false, "save_enter called for {:?}", state);
        return;
    };
    ctx.emit(Event::Save);
    let ticket = ctx.issue_ticket();
    ctx.request(ServiceRequest::SubmitStatus(ticket, status));
    info!("SAVE: submitting {:?} (ticket {})", status, ticket.value());
}

fn save_completion(_state: &FlowState, completion: Completion) -> Option<FlowState> {
    match completion {
        Completion::Submitted { result: Ok(true), .. } => Some(FlowState::Final {
            outcome: Outcome::Success,
        }),
        Completion::Submitted { result: Ok(false), .. } => {
            warn!("SAVE: service declined the submission");
            Some(FlowState::Final {
                outcome: Outcome::Failure,
            })
        }
        Completion::Submitted { result: Err(e), .. } => {
            warn!("SAVE: submit failed: {}", e);
            Some(FlowState::Final {
                outcome: Outcome::Failure,
            })
        }
        Completion::Fetched { .. } => {
            debug_assert!(false, "fetch completion delivered to Save");
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  FINAL state — interaction over, ready to start again
// ═══════════════════════════════════════════════════════════════════════════

fn final_enter(state: &FlowState, ctx: &mut FlowContext) {
    let FlowState::Final { outcome } = *state else {
        debug_assert!(false, "final_enter called for {:?}", state);
        return;
    };
    info!("FINAL: {:?}", outcome);
    ctx.emit(outcome.event());
}

fn final_operation(_state: &FlowState, op: Operation) -> Option<FlowState> {
    match op {
        Operation::Check => Some(FlowState::Check),
        Operation::Update | Operation::Save(_) | Operation::Cancel => None,
    }
}
