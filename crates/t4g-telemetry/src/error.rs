//! Error types for telemetry setup.

use thiserror::Error;

/// Result type returned by telemetry setup.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Failure while configuring logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber")]
    SubscriberInstall {
        /// Error reported by `try_init`.
        source: tracing_subscriber::util::TryInitError,
    },
    /// A log format name was not recognised.
    #[error("unknown log format")]
    UnknownFormat {
        /// Rejected value.
        value: String,
    },
}
