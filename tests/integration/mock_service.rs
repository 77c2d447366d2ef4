//! Mock status service and event recorder for integration tests.
//!
//! Replies are queued per call kind.  A reply is either available at once
//! or held behind a [`Gate`] that the test opens later, which lets tests
//! act on the controller while a call is in flight.  A call with no queued
//! reply panics, failing the test.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;

use statusflow::{Event, EventSink, FlowController, Profile, ServiceError, Status, StatusService, Validity};

pub type FetchResult = Result<Profile, ServiceError>;
pub type SubmitResult = Result<bool, ServiceError>;

/// A reply the test releases by calling [`Signal::signal`].
pub type Gate<T> = Rc<Signal<NoopRawMutex, T>>;

pub enum Reply<T> {
    Now(T),
    Later(Gate<T>),
}

#[derive(Default)]
struct MockState {
    fetch_replies: RefCell<VecDeque<Reply<FetchResult>>>,
    submit_replies: RefCell<VecDeque<Reply<SubmitResult>>>,
    fetch_calls: Cell<u32>,
    submitted: RefCell<Vec<Status>>,
}

// ── MockService ───────────────────────────────────────────────

/// Cloning shares the reply queues and call records, so a test keeps a
/// handle after moving one clone into the controller.
#[derive(Clone, Default)]
pub struct MockService {
    state: Rc<MockState>,
}

#[allow(dead_code)]
impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_fetch(&self, result: FetchResult) -> &Self {
        self.state.fetch_replies.borrow_mut().push_back(Reply::Now(result));
        self
    }

    pub fn reply_profile(&self, validity: Validity) -> &Self {
        self.reply_fetch(Ok(Profile::new(Status::Negative, validity)))
    }

    pub fn reply_submit(&self, result: SubmitResult) -> &Self {
        self.state.submit_replies.borrow_mut().push_back(Reply::Now(result));
        self
    }

    /// Queue a fetch reply held until the returned gate is signalled.
    pub fn gate_fetch(&self) -> Gate<FetchResult> {
        let gate = Rc::new(Signal::new());
        self.state
            .fetch_replies
            .borrow_mut()
            .push_back(Reply::Later(Rc::clone(&gate)));
        gate
    }

    /// Queue a submit reply held until the returned gate is signalled.
    pub fn gate_submit(&self) -> Gate<SubmitResult> {
        let gate = Rc::new(Signal::new());
        self.state
            .submit_replies
            .borrow_mut()
            .push_back(Reply::Later(Rc::clone(&gate)));
        gate
    }

    pub fn fetch_calls(&self) -> u32 {
        self.state.fetch_calls.get()
    }

    pub fn submitted(&self) -> Vec<Status> {
        self.state.submitted.borrow().clone()
    }
}

impl StatusService for MockService {
    async fn fetch_status(&self) -> FetchResult {
        self.state.fetch_calls.set(self.state.fetch_calls.get() + 1);
        let reply = self.state.fetch_replies.borrow_mut().pop_front();
        match reply {
            Some(Reply::Now(result)) => result,
            Some(Reply::Later(gate)) => gate.wait().await,
            None => panic!("unexpected call to fetch_status"),
        }
    }

    async fn submit_status(&self, status: Status) -> SubmitResult {
        self.state.submitted.borrow_mut().push(status);
        let reply = self.state.submit_replies.borrow_mut().pop_front();
        match reply {
            Some(Reply::Now(result)) => result,
            Some(Reply::Later(gate)) => gate.wait().await,
            None => panic!("unexpected call to submit_status"),
        }
    }
}

// ── Event recorder ────────────────────────────────────────────

/// Sink that records every event it receives.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Rc<RefCell<Vec<Event>>>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Return the recorded events and forget them.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl EventSink for Recorder {
    fn emit(&mut self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

/// A controller over a fresh mock, with a recorder attached.
pub fn make_flow() -> (FlowController<MockService>, MockService, Recorder) {
    let service = MockService::new();
    let mut flow = FlowController::new(service.clone());
    let recorder = Recorder::default();
    flow.set_sink(recorder.clone());
    (flow, service, recorder)
}

/// Drive a controller into Update, discarding the events on the way.
#[allow(dead_code)]
pub fn into_update(flow: &mut FlowController<MockService>, service: &MockService, recorder: &Recorder) {
    service.reply_profile(Validity::Outdated);
    flow.check();
    flow.settle();
    flow.update();
    assert_eq!(flow.state(), statusflow::StateId::Update);
    recorder.take();
}
