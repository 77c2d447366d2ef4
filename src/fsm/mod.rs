//! Function-pointer finite state machine engine for the status flow.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  StateTable                                                   │
//! │  ┌────────┬──────────┬──────────┬──────────────┬────────────┐ │
//! │  │ StateId│ on_enter │ on_exit  │ on_operation │on_completion│ │
//! │  ├────────┼──────────┼──────────┼──────────────┼────────────┤ │
//! │  │ Check  │ fn       │ fn       │ fn -> Option │ fn -> Option│ │
//! │  │ Prompt │ fn       │ —        │ fn -> Option │ —           │ │
//! │  │ Update │ fn       │ —        │ fn -> Option │ —           │ │
//! │  │ Save   │ fn       │ fn       │ fn -> Option │ fn -> Option│ │
//! │  │ Final  │ fn       │ —        │ fn -> Option │ —           │ │
//! │  └────────┴──────────┴──────────┴──────────────┴────────────┘ │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine holds exactly one [`FlowState`].  An operation or a service
//! completion is handed to the current state's handler; if it returns
//! `Some(next)`, the engine runs `on_exit` for the current state, installs
//! `next`, then runs `on_enter` for it.  Transitions are never nested:
//! handlers only return the next state, they never transition themselves.

pub mod context;
pub mod states;

use context::{FlowContext, Ticket};
use log::{debug, info};

use crate::app::commands::Operation;
use crate::app::events::Event;
use crate::app::profile::{Profile, Status};
use crate::error::ServiceError;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all flow states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Check = 0,
    Prompt = 1,
    Update = 2,
    Save = 3,
    Final = 4,
}

impl StateId {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 5;
}

// ---------------------------------------------------------------------------
// Flow data
// ---------------------------------------------------------------------------

/// Why an interaction ended.  Only selects the event Final emits on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    UpToDate,
    UserPostponed,
    UserCancelled,
    Failure,
    Success,
}

impl Outcome {
    /// The event Final emits for this outcome.
    pub fn event(self) -> Event {
        match self {
            Self::Failure => Event::Failed,
            Self::Success => Event::Updated,
            Self::UpToDate => Event::UpToDate,
            Self::UserPostponed => Event::Postponed,
            Self::UserCancelled => Event::Cancelled,
        }
    }
}

/// The active state, carrying only the data that state needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Check,
    Prompt,
    Update,
    Save { status: Status },
    Final { outcome: Outcome },
}

impl FlowState {
    /// The state a controller starts in.  Installed without running its
    /// entry action, so nothing is emitted at construction.
    pub const SEED: Self = Self::Final {
        outcome: Outcome::Failure,
    };

    pub fn id(&self) -> StateId {
        match self {
            Self::Check => StateId::Check,
            Self::Prompt => StateId::Prompt,
            Self::Update => StateId::Update,
            Self::Save { .. } => StateId::Save,
            Self::Final { .. } => StateId::Final,
        }
    }
}

/// Result of a service call, delivered back to the state that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Fetched {
        ticket: Ticket,
        result: Result<Profile, ServiceError>,
    },
    Submitted {
        ticket: Ticket,
        result: Result<bool, ServiceError>,
    },
}

impl Completion {
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::Fetched { ticket, .. } | Self::Submitted { ticket, .. } => *ticket,
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&FlowState, &mut FlowContext);

/// Signature for operation handlers.
/// Returns `Some(next)` to trigger a transition, or `None` to ignore.
pub type OperationFn = fn(&FlowState, Operation) -> Option<FlowState>;

/// Signature for service completion handlers.
pub type CompletionFn = fn(&FlowState, Completion) -> Option<FlowState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single flow state.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_operation: OperationFn,
    pub on_completion: Option<CompletionFn>,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// The single active state.
    current: FlowState,
    /// Transitions performed since construction.
    transitions: u64,
}

impl Fsm {
    /// Construct an FSM resting in `initial`.  No entry action runs.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: FlowState) -> Self {
        Self {
            table,
            current: initial,
            transitions: 0,
        }
    }

    /// Construct an FSM resting in [`FlowState::SEED`].
    pub fn seeded(table: [StateDescriptor; StateId::COUNT]) -> Self {
        Self::new(table, FlowState::SEED)
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        self.current.id()
    }

    /// The current state, including its data.
    pub fn state(&self) -> &FlowState {
        &self.current
    }

    /// Number of transitions performed so far.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Hand an operation to the current state.
    /// Returns `true` if it caused a transition.
    pub fn dispatch(&mut self, op: Operation, ctx: &mut FlowContext) -> bool {
        let handler = self.descriptor().on_operation;
        match handler(&self.current, op) {
            Some(next) => {
                self.transition(next, ctx);
                true
            }
            None => false,
        }
    }

    /// Hand a service completion to the current state.
    ///
    /// Completions whose ticket is no longer live are discarded: the state
    /// that requested them has already been left.  Returns `true` if the
    /// completion caused a transition.
    pub fn complete(&mut self, completion: Completion, ctx: &mut FlowContext) -> bool {
        let ticket = completion.ticket();
        if !ctx.is_live(ticket) {
            debug!(
                "FSM: discarding stale completion (ticket {}) in {}",
                ticket.value(),
                self.descriptor().name
            );
            return false;
        }

        let Some(handler) = self.descriptor().on_completion else {
            debug!("FSM: {} does not accept completions", self.descriptor().name);
            return false;
        };

        match handler(&self.current, completion) {
            Some(next) => {
                self.transition(next, ctx);
                true
            }
            None => false,
        }
    }

    /// Leave the current state and reinstall [`FlowState::SEED`] without
    /// running its entry action.  Any in-flight call becomes stale.
    pub fn reset(&mut self, ctx: &mut FlowContext) {
        info!("FSM reset from {}", self.descriptor().name);
        if let Some(exit) = self.descriptor().on_exit {
            exit(&self.current, ctx);
        }
        self.current = FlowState::SEED;
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn descriptor(&self) -> &StateDescriptor {
        &self.table[self.current.id() as usize]
    }

    fn transition(&mut self, next: FlowState, ctx: &mut FlowContext) {
        info!(
            "FSM transition: {} -> {}",
            self.descriptor().name,
            self.table[next.id() as usize].name
        );

        // Exit current state
        if let Some(exit) = self.descriptor().on_exit {
            exit(&self.current, ctx);
        }

        // Install and enter the next one
        self.current = next;
        self.transitions += 1;
        if let Some(enter) = self.descriptor().on_enter {
            enter(&self.current, ctx);
        }
    }
}
