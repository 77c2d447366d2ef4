//! Shared mutable context threaded through every FSM handler.
//!
//! State handlers never touch the observer or the status service
//! directly.  They queue events and service requests here, and the
//! [`FlowController`](crate::app::service::FlowController) drains both
//! after each transition: events go to the observer, requests are spawned
//! on the controller's executor.
//!
//! The context also owns the ticket counter behind the stale-completion
//! guard.  Entering Check or Save issues a fresh ticket and makes it live;
//! exiting retires it.  A completion is applied only while its ticket is
//! still live.

use heapless::Vec;
use log::warn;

use crate::app::events::Event;
use crate::app::profile::Status;
use crate::config::FlowConfig;

/// Capacity of the event outbox between drains.
/// One operation or completion triggers at most one transition, and each
/// entry emits at most one event.
pub const OUTBOX_CAP: usize = 4;

/// Capacity of the service request queue between drains.
pub const REQUEST_CAP: usize = 2;

// ---------------------------------------------------------------------------
// Tickets and requests
// ---------------------------------------------------------------------------

/// Identifies one asynchronous service call issued by a Check or Save entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A service call requested by a state entry action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceRequest {
    FetchStatus(Ticket),
    SubmitStatus(Ticket, Status),
}

impl ServiceRequest {
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::FetchStatus(t) | Self::SubmitStatus(t, _) => *t,
        }
    }
}

// ---------------------------------------------------------------------------
// FlowContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FlowContext {
    /// Controller configuration (read-only to handlers).
    pub config: FlowConfig,
    outbox: Vec<Event, OUTBOX_CAP>,
    requests: Vec<ServiceRequest, REQUEST_CAP>,
    tickets_issued: u64,
    live_ticket: Option<Ticket>,
}

impl FlowContext {
    pub fn new(config: FlowConfig) -> Self {
        Self {
            config,
            outbox: Vec::new(),
            requests: Vec::new(),
            tickets_issued: 0,
            live_ticket: None,
        }
    }

    // -- Events --

    /// Queue an event for the observer.
    pub fn emit(&mut self, event: Event) {
        if self.outbox.push(event).is_err() {
            warn!("outbox full, dropping {:?}", event);
        }
    }

    /// Take every queued event, oldest first.
    pub fn take_events(&mut self) -> Vec<Event, OUTBOX_CAP> {
        core::mem::take(&mut self.outbox)
    }

    // -- Service requests --

    /// Queue a service call for the controller to spawn.
    pub fn request(&mut self, req: ServiceRequest) {
        if self.requests.push(req).is_err() {
            warn!("request queue full, dropping {:?}", req);
        }
    }

    /// Take every queued service request, oldest first.
    pub fn take_requests(&mut self) -> Vec<ServiceRequest, REQUEST_CAP> {
        core::mem::take(&mut self.requests)
    }

    // -- Tickets --

    /// Issue a fresh ticket and make it the live one.
    pub fn issue_ticket(&mut self) -> Ticket {
        self.tickets_issued += 1;
        let ticket = Ticket(self.tickets_issued);
        self.live_ticket = Some(ticket);
        ticket
    }

    /// Retire the live ticket; any completion still carrying it is stale.
    pub fn retire_ticket(&mut self) {
        self.live_ticket = None;
    }

    /// The ticket a completion must carry to be applied, if any.
    pub fn live_ticket(&self) -> Option<Ticket> {
        self.live_ticket
    }

    /// Whether `ticket` is the live ticket.
    pub fn is_live(&self, ticket: Ticket) -> bool {
        self.live_ticket == Some(ticket)
    }
}
