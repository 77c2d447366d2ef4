//! Configuration parameters
//!
//! Tunables for the flow controller and for the in-process simulated
//! status service used by the `statusflow` binary.  Every field has a
//! default, so a configuration document only needs the fields it changes.

use serde::{Deserialize, Serialize};

use crate::app::profile::{Profile, Status, Validity};
use crate::error::{ConfigError, Result};

/// Upper bound on simulated service latency, in executor yields.
pub const MAX_LATENCY_YIELDS: u32 = 1000;

/// Flow controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Emit the `check` event on entry to the Check state.
    /// When off, Check is silent and the first event of an interaction is
    /// its outcome (`upToDate`, `prompt` or `failed`).
    pub announce_check: bool,
    /// Log operations the active state ignores at `warn` instead of `debug`.
    pub warn_on_ignored: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            announce_check: true,
            warn_on_ignored: false,
        }
    }
}

/// Behaviour of the simulated status service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Status returned by fetch until a submission replaces it.
    pub status: Status,
    /// Validity returned by fetch until a submission replaces it.
    pub validity: Validity,
    /// Fail every fetch with `ServiceError::Unreachable`.
    pub fetch_fails: bool,
    /// Whether submissions report success.
    pub accept_submissions: bool,
    /// Executor yields before each call resolves.
    pub latency_yields: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            status: Status::Negative,
            validity: Validity::Outdated,
            fetch_fails: false,
            accept_submissions: true,
            latency_yields: 3,
        }
    }
}

impl SimulatorConfig {
    /// The profile the simulator starts out with.
    pub fn initial_profile(&self) -> Profile {
        Profile::new(self.status, self.validity)
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub flow: FlowConfig,
    pub simulator: SimulatorConfig,
}

impl Settings {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json).map_err(ConfigError::from)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values outside their permitted range.
    pub fn validate(&self) -> Result<()> {
        if self.simulator.latency_yields > MAX_LATENCY_YIELDS {
            return Err(ConfigError::ValidationFailed(
                "simulator.latency_yields exceeds MAX_LATENCY_YIELDS",
            )
            .into());
        }
        Ok(())
    }
}
