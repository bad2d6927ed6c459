#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Environment-backed configuration for the tenant gateway.
//!
//! Layout: `model.rs` (typed configuration), `loader.rs` (environment lookup and
//! validation), `error.rs` (`ConfigError`).

pub mod error;
pub mod loader;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    DEFAULT_API_URL, DEFAULT_REDIRECT_URI, DEFAULT_SCOPE, DEFAULT_TIMEOUT_SECS, ENV_API_URL,
    ENV_HTTP_TIMEOUT_SECS, ENV_IDP_AUDIENCE, ENV_IDP_CLIENT_ID, ENV_IDP_DOMAIN,
    ENV_IDP_REDIRECT_URI, ENV_IDP_SCOPE, ENV_LOG_FORMAT, ENV_LOG_LEVEL,
};
pub use model::{ApiConfig, GatewayConfig, IdentityProviderConfig, LogSettings};
