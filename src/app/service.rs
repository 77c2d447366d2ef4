//! Flow controller — the core of the status flow.
//!
//! [`FlowController`] owns the FSM, its context and a local executor.  It
//! exposes the caller-facing operations and delivers every emitted event to
//! a single observer.  The status backend is reached only through the
//! [`StatusService`] port.
//!
//! ```text
//!   check/update/save/cancel ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                                │      FlowController       │
//!            poll / settle ────▶ │  FSM · executor · inbox   │
//!                                └────────────┬─────────────┘
//!                                   spawn     │    ▲ Completion
//!                                             ▼    │
//!                                        StatusService
//! ```
//!
//! Operations never block: Check and Save queue their service call on the
//! executor and return.  The call's result comes back through the
//! completion channel and is applied by [`FlowController::poll`] or
//! [`FlowController::settle`], always on the thread that owns the
//! controller, so no transition ever races another.

use std::rc::Rc;

use edge_executor::LocalExecutor;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use futures_lite::future::block_on;
use log::{debug, info, warn};

use crate::config::FlowConfig;
use crate::fsm::context::{FlowContext, ServiceRequest};
use crate::fsm::states::build_state_table;
use crate::fsm::{Completion, Fsm, StateId};

use super::commands::Operation;
use super::events::Event;
use super::ports::{CallbackSink, EventSink, StatusService};
use super::profile::Status;

/// Maximum number of service tasks the executor can hold.
/// Also the cap on calls in flight, abandoned ones included: each task has
/// at most one wake-up queued, so the run queue cannot overflow.
pub const EXECUTOR_TASKS: usize = 8;

/// Depth of the completion channel (service tasks → controller).
/// A task that finds the channel full waits to send; its completion is
/// picked up by a later `poll()` or `settle()`.
const COMPLETION_DEPTH: usize = 4;

/// Upper bound on executor polls performed by one [`FlowController::poll`].
/// Tasks still runnable when the budget runs out, or woken by the final
/// drain of a full channel, are run by the next call.
const POLL_BUDGET: usize = 64;

type CompletionChannel = Channel<NoopRawMutex, Completion, COMPLETION_DEPTH>;

// ───────────────────────────────────────────────────────────────
// FlowController
// ───────────────────────────────────────────────────────────────

/// Drives one "Know Your Status" interaction at a time.
///
/// Usage:
/// 1. Register an observer with [`on_event`](Self::on_event) or
///    [`set_sink`](Self::set_sink) before invoking any operation; events
///    emitted with no observer are dropped.
/// 2. Call [`check`](Self::check).  Drive the executor with
///    [`poll`](Self::poll) from an event loop, or [`settle`](Self::settle)
///    to block until the service answers.
/// 3. React to the events: on `prompt` call [`update`](Self::update) or
///    [`cancel`](Self::cancel); on `update` call [`save`](Self::save) or
///    [`cancel`](Self::cancel).
///
/// Operations the active state does not handle are ignored.  `check()`
/// and `save()` are also ignored, with a warning, while
/// [`EXECUTOR_TASKS`] calls abandoned by [`reset`](Self::reset) are still
/// running.
pub struct FlowController<S> {
    fsm: Fsm,
    ctx: FlowContext,
    service: Rc<S>,
    executor: LocalExecutor<'static, EXECUTOR_TASKS>,
    completions: Rc<CompletionChannel>,
    /// Service calls spawned but not yet delivered back.
    in_flight: usize,
    observer: Option<Box<dyn EventSink>>,
}

impl<S: StatusService + 'static> FlowController<S> {
    /// Construct a controller with the default configuration.
    ///
    /// The controller starts in Final (failure outcome) without emitting
    /// anything, so `check()` is valid straight away.
    pub fn new(service: S) -> Self {
        Self::with_config(service, FlowConfig::default())
    }

    pub fn with_config(service: S, config: FlowConfig) -> Self {
        let fsm = Fsm::seeded(build_state_table());
        info!("FlowController ready in {:?}", fsm.current_state());
        Self {
            fsm,
            ctx: FlowContext::new(config),
            service: Rc::new(service),
            executor: LocalExecutor::new(),
            completions: Rc::new(Channel::new()),
            in_flight: 0,
            observer: None,
        }
    }

    // ── Observer ──────────────────────────────────────────────

    /// Register `callback` as the observer, replacing any previous one.
    pub fn on_event(&mut self, callback: impl FnMut(Event) + 'static) {
        self.set_sink(CallbackSink(callback));
    }

    /// Register `sink` as the observer, replacing any previous one.
    pub fn set_sink(&mut self, sink: impl EventSink + 'static) {
        if self.observer.replace(Box::new(sink)).is_some() {
            debug!("observer replaced");
        }
    }

    /// Remove the observer.  Later events are dropped.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    // ── Operations ────────────────────────────────────────────

    /// Check the user's status.  Handled in Final only.
    pub fn check(&mut self) {
        self.apply(Operation::Check);
    }

    /// Opt in to updating the status.  Handled in Prompt only.
    pub fn update(&mut self) {
        self.apply(Operation::Update);
    }

    /// Save the new status.  Handled in Update only.
    pub fn save(&mut self, status: Status) {
        self.apply(Operation::Save(status));
    }

    /// Opt out: postpones from Prompt, cancels from Update.
    pub fn cancel(&mut self) {
        self.apply(Operation::Cancel);
    }

    /// Abandon the current interaction and return to the initial Final
    /// state without emitting anything.  A service call still in flight
    /// runs to completion, but its result is discarded.
    pub fn reset(&mut self) {
        self.fsm.reset(&mut self.ctx);
        self.flush();
    }

    // ── Driving ───────────────────────────────────────────────

    /// Run ready service tasks and apply every completion delivered so far.
    /// Never blocks.  Returns the number of completions that changed state.
    ///
    /// When more calls finish at once than the completion channel holds,
    /// some stay pending after this returns; the next call picks them up.
    pub fn poll(&mut self) -> usize {
        for _ in 0..POLL_BUDGET {
            if !self.executor.try_tick() {
                break;
            }
        }
        self.drain_completions()
    }

    /// Block until the active Check or Save has its answer, applying
    /// completions as they arrive, then [`poll`](Self::poll) once to reap
    /// calls abandoned by [`reset`](Self::reset).  Returns the number of
    /// completions that changed state.
    ///
    /// Only the live call is waited for: an abandoned call that hangs never
    /// blocks this.  There is no timeout on the live call, so one that
    /// never resolves blocks this forever.
    pub fn settle(&mut self) -> usize {
        let mut applied = 0;
        while self.ctx.live_ticket().is_some() && self.in_flight > 0 {
            let completion = block_on(self.executor.run(self.completions.receive()));
            if self.apply_completion(completion) {
                applied += 1;
            }
            applied += self.drain_completions();
        }
        applied + self.poll()
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Whether any service call is still in flight, abandoned ones included.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Number of service calls spawned but not yet delivered back.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn config(&self) -> &FlowConfig {
        &self.ctx.config
    }

    /// The status service this controller calls.
    pub fn service(&self) -> &S {
        &self.service
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply(&mut self, op: Operation) {
        if op.starts_service_call() && self.saturated() {
            warn!(
                "{}() ignored in {:?}: {} abandoned service calls still running",
                op.name(),
                self.fsm.current_state(),
                self.in_flight
            );
            return;
        }
        if self.fsm.dispatch(op, &mut self.ctx) {
            self.flush();
            return;
        }
        let state = self.fsm.current_state();
        if self.ctx.config.warn_on_ignored {
            warn!("{}() ignored in {:?}", op.name(), state);
        } else {
            debug!("{}() ignored in {:?}", op.name(), state);
        }
    }

    /// Whether spawning another call could overflow the executor.
    ///
    /// With no live ticket every call in flight is abandoned, so running
    /// the ready ones first cannot move the flow.
    fn saturated(&mut self) -> bool {
        if self.ctx.live_ticket().is_some() || self.in_flight < EXECUTOR_TASKS {
            return false;
        }
        self.poll();
        self.in_flight >= EXECUTOR_TASKS
    }

    fn apply_completion(&mut self, completion: Completion) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        let changed = self.fsm.complete(completion, &mut self.ctx);
        self.flush();
        changed
    }

    fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions.try_receive() {
            if self.apply_completion(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Deliver queued events, then spawn queued service calls.
    fn flush(&mut self) {
        for event in self.ctx.take_events() {
            self.notify(event);
        }
        for req in self.ctx.take_requests() {
            self.spawn_request(req);
        }
    }

    fn notify(&mut self, event: Event) {
        match self.observer.as_mut() {
            Some(sink) => sink.emit(event),
            None => debug!("no observer, dropping {:?}", event),
        }
    }

    fn spawn_request(&mut self, req: ServiceRequest) {
        let service = Rc::clone(&self.service);
        let completions = Rc::clone(&self.completions);
        self.in_flight += 1;
        debug!(
            "spawning {:?} (ticket {}, {} in flight)",
            req,
            req.ticket().value(),
            self.in_flight
        );

        let task = match req {
            ServiceRequest::FetchStatus(ticket) => self.executor.spawn(async move {
                let result = service.fetch_status().await;
                completions.send(Completion::Fetched { ticket, result }).await;
            }),
            ServiceRequest::SubmitStatus(ticket, status) => self.executor.spawn(async move {
                let result = service.submit_status(status).await;
                completions
                    .send(Completion::Submitted { ticket, result })
                    .await;
            }),
        };
        task.detach();
    }
}
