//! Error types for the status flow.
//!
//! Service errors never escape the flow: the Check and Save states turn
//! them into the `failed` event.  The crate-level [`Error`] only covers
//! fallible setup such as loading configuration.

use core::fmt;

// ---------------------------------------------------------------------------
// Service errors
// ---------------------------------------------------------------------------

/// Failure reported by a [`StatusService`](crate::app::ports::StatusService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The backend could not be reached.
    Unreachable,
    /// The backend refused the caller's credentials.
    Unauthorized,
    /// The backend replied with something that could not be decoded.
    Malformed,
    /// Any other backend-reported failure.
    Backend(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "status service unreachable"),
            Self::Unauthorized => write!(f, "status service rejected credentials"),
            Self::Malformed => write!(f, "malformed status service response"),
            Self::Backend(msg) => write!(f, "status service error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    Parse(String),
    /// A field failed range validation.
    /// The `&'static str` names the field and the rule.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
