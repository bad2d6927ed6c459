#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Telemetry primitives shared across the T4G workspace.
//!
//! Layout: `init.rs` (subscriber installation and logging configuration),
//! `error.rs` (error type for telemetry setup).

pub mod error;
pub mod init;

pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LogOutput, LoggingConfig, build_sha, init_logging};
