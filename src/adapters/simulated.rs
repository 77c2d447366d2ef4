//! In-process simulated status service.
//!
//! Stands in for a remote backend when running the `statusflow` binary.
//! Behaviour is set by [`SimulatorConfig`]: the starting profile, whether
//! fetches fail, whether submissions are accepted, and how many executor
//! yields each call takes before resolving.  An accepted submission
//! replaces the stored profile with `{status, current}`, so a following
//! `check()` reports the status as up to date.

use core::cell::Cell;

use futures_lite::future::yield_now;
use log::debug;

use crate::app::ports::StatusService;
use crate::app::profile::{Profile, Status, Validity};
use crate::config::SimulatorConfig;
use crate::error::ServiceError;

pub struct SimulatedStatusService {
    profile: Cell<Profile>,
    fetch_fails: bool,
    accept_submissions: bool,
    latency_yields: u32,
    fetches: Cell<u32>,
    submissions: Cell<u32>,
}

impl SimulatedStatusService {
    pub fn new(config: &SimulatorConfig) -> Self {
        Self {
            profile: Cell::new(config.initial_profile()),
            fetch_fails: config.fetch_fails,
            accept_submissions: config.accept_submissions,
            latency_yields: config.latency_yields,
            fetches: Cell::new(0),
            submissions: Cell::new(0),
        }
    }

    /// The stored profile.
    pub fn profile(&self) -> Profile {
        self.profile.get()
    }

    /// Number of fetch calls received.
    pub fn fetches(&self) -> u32 {
        self.fetches.get()
    }

    /// Number of submit calls received.
    pub fn submissions(&self) -> u32 {
        self.submissions.get()
    }

    async fn simulate_latency(&self) {
        for _ in 0..self.latency_yields {
            yield_now().await;
        }
    }
}

impl StatusService for SimulatedStatusService {
    async fn fetch_status(&self) -> Result<Profile, ServiceError> {
        self.fetches.set(self.fetches.get() + 1);
        self.simulate_latency().await;
        if self.fetch_fails {
            debug!("SIM: fetch failing as configured");
            return Err(ServiceError::Unreachable);
        }
        Ok(self.profile.get())
    }

    async fn submit_status(&self, status: Status) -> Result<bool, ServiceError> {
        self.submissions.set(self.submissions.get() + 1);
        self.simulate_latency().await;
        if self.accept_submissions {
            self.profile.set(Profile::new(status, Validity::Current));
        } else {
            debug!("SIM: declining submission of {:?}", status);
        }
        Ok(self.accept_submissions)
    }
}
