//! Typed configuration models.

use std::time::Duration;

use t4g_telemetry::LogFormat;
use url::Url;

/// Complete gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Identity provider settings.
    pub identity: IdentityProviderConfig,
    /// Resource API settings.
    pub api: ApiConfig,
    /// Logging settings.
    pub logging: LogSettings,
}

/// Settings for the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProviderConfig {
    /// Provider host, without scheme (e.g. `tenant.eu.auth0.com`).
    pub domain: String,
    /// OAuth client identifier registered for the dashboard.
    pub client_id: String,
    /// API audience requested for access tokens.
    pub audience: Option<String>,
    /// Where the provider redirects after login.
    pub redirect_uri: Url,
    /// Space-separated scopes requested at login.
    pub scope: String,
}

impl IdentityProviderConfig {
    /// Base URL of the provider (`https://{domain}/`).
    ///
    /// The domain is validated at load time, so this cannot fail for loaded
    /// configurations; hand-built values that are not hosts yield `None`.
    #[must_use]
    pub fn issuer(&self) -> Option<Url> {
        Url::parse(&format!("https://{}/", self.domain)).ok()
    }
}

/// Settings for the remote resource API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL every resource path is joined onto.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Logging preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Level directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}
