//! StatusFlow library.
//!
//! The "Know Your Status" interaction core: a five-state flow (Check,
//! Prompt, Update, Save, Final) that checks whether the user's recorded
//! status is current, prompts for an update when it is not, and submits
//! the new status through an injected [`StatusService`].  Progress is
//! reported to a single observer as [`Event`]s.
//!
//! ```no_run
//! use statusflow::adapters::simulated::SimulatedStatusService;
//! use statusflow::config::SimulatorConfig;
//! use statusflow::{FlowController, Status};
//!
//! let mut flow = FlowController::new(SimulatedStatusService::new(&SimulatorConfig::default()));
//! flow.on_event(|event| println!("{event:?}"));
//! flow.check();
//! flow.settle();
//! flow.update();
//! flow.save(Status::Negative);
//! flow.settle();
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod fsm;

pub use app::events::Event;
pub use app::ports::{EventSink, StatusService};
pub use app::profile::{Profile, Status, Validity};
pub use app::service::FlowController;
pub use error::{Error, ServiceError};
pub use fsm::StateId;
