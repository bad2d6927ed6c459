//! # Design
//!
//! - Only construction-time and programmer errors live here.
//! - Expected remote failures are `CallOutcome` values, never `GatewayError`.

use thiserror::Error;

/// Result alias for gateway construction.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway construction error.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Building the HTTP client failed.
    #[error("failed to build HTTP client")]
    HttpClient {
        /// Source HTTP client error.
        source: reqwest::Error,
    },
}
