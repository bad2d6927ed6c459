//! Environment lookup and validation.

use std::time::Duration;

use t4g_telemetry::{DEFAULT_LOG_LEVEL, LogFormat};
use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{ApiConfig, GatewayConfig, IdentityProviderConfig, LogSettings};

/// Identity provider host.
pub const ENV_IDP_DOMAIN: &str = "T4G_IDP_DOMAIN";
/// OAuth client identifier.
pub const ENV_IDP_CLIENT_ID: &str = "T4G_IDP_CLIENT_ID";
/// Access token audience.
pub const ENV_IDP_AUDIENCE: &str = "T4G_IDP_AUDIENCE";
/// Login redirect target.
pub const ENV_IDP_REDIRECT_URI: &str = "T4G_IDP_REDIRECT_URI";
/// Requested scopes.
pub const ENV_IDP_SCOPE: &str = "T4G_IDP_SCOPE";
/// Resource API base URL.
pub const ENV_API_URL: &str = "T4G_API_URL";
/// Per-request timeout in seconds.
pub const ENV_HTTP_TIMEOUT_SECS: &str = "T4G_HTTP_TIMEOUT_SECS";
/// Log level directive.
pub const ENV_LOG_LEVEL: &str = "T4G_LOG_LEVEL";
/// Log output format (`json` or `pretty`).
pub const ENV_LOG_FORMAT: &str = "T4G_LOG_FORMAT";

/// Scopes requested when none are configured.
pub const DEFAULT_SCOPE: &str = "openid profile email read:tenant_data manage:tenant_business";
/// Resource API base URL when none is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/api";
/// Login redirect target when none is configured.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:5173/callback";
/// Request timeout when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

impl GatewayConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingEnv`] when the provider domain or client id
    /// is absent, and [`ConfigError::InvalidValue`] for unparseable values.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as absent.
    ///
    /// # Errors
    /// See [`GatewayConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| non_blank(&lookup, name);

        let domain = get(ENV_IDP_DOMAIN).ok_or(ConfigError::MissingEnv {
            name: ENV_IDP_DOMAIN,
        })?;
        let domain = normalize_domain(&domain)?;
        let client_id = get(ENV_IDP_CLIENT_ID).ok_or(ConfigError::MissingEnv {
            name: ENV_IDP_CLIENT_ID,
        })?;
        let redirect_uri = parse_url(
            ENV_IDP_REDIRECT_URI,
            get(ENV_IDP_REDIRECT_URI).as_deref().unwrap_or(DEFAULT_REDIRECT_URI),
        )?;
        let scope = get(ENV_IDP_SCOPE).unwrap_or_else(|| DEFAULT_SCOPE.to_string());
        if !scope.split_whitespace().any(|item| item == "openid") {
            return Err(ConfigError::InvalidValue {
                name: ENV_IDP_SCOPE,
                value: scope,
                reason: "missing_openid_scope",
            });
        }

        let base_url = parse_url(
            ENV_API_URL,
            get(ENV_API_URL).as_deref().unwrap_or(DEFAULT_API_URL),
        )?;
        let timeout = match get(ENV_HTTP_TIMEOUT_SECS) {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let config = Self {
            identity: IdentityProviderConfig {
                domain,
                client_id,
                audience: get(ENV_IDP_AUDIENCE),
                redirect_uri,
                scope,
            },
            api: ApiConfig { base_url, timeout },
            logging: LogSettings::from_lookup(&lookup)?,
        };
        tracing::debug!(
            domain = %config.identity.domain,
            api = %config.api.base_url,
            "gateway configuration loaded"
        );
        Ok(config)
    }
}

impl LogSettings {
    /// Load only the logging settings; identity settings may be absent.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for an unknown log format.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = match non_blank(&lookup, ENV_LOG_FORMAT) {
            Some(raw) => raw.parse::<LogFormat>().map_err(|_| ConfigError::InvalidValue {
                name: ENV_LOG_FORMAT,
                value: raw,
                reason: "unknown_log_format",
            })?,
            None => LogFormat::infer(),
        };
        Ok(Self {
            level: non_blank(&lookup, ENV_LOG_LEVEL)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            format,
        })
    }
}

fn non_blank<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn normalize_domain(raw: &str) -> ConfigResult<String> {
    let host = raw
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    let valid = !host.is_empty()
        && host
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | ':'));
    if valid {
        Ok(host.to_ascii_lowercase())
    } else {
        Err(ConfigError::InvalidValue {
            name: ENV_IDP_DOMAIN,
            value: raw.to_string(),
            reason: "not_a_host",
        })
    }
}

fn parse_url(name: &'static str, raw: &str) -> ConfigResult<Url> {
    let url = Url::parse(raw).map_err(|_| ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
        reason: "invalid_url",
    })?;
    if matches!(url.scheme(), "http" | "https") {
        Ok(url)
    } else {
        Err(ConfigError::InvalidValue {
            name,
            value: raw.to_string(),
            reason: "unsupported_scheme",
        })
    }
}

fn parse_timeout(raw: &str) -> ConfigResult<Duration> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidValue {
            name: ENV_HTTP_TIMEOUT_SECS,
            value: raw.to_string(),
            reason: "expected_positive_seconds",
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_fill_optional_values() {
        let config = GatewayConfig::from_lookup(lookup(&[
            (ENV_IDP_DOMAIN, "https://T4G.eu.auth0.com/"),
            (ENV_IDP_CLIENT_ID, "client-123"),
        ]))
        .expect("config should load");

        assert_eq!(config.identity.domain, "t4g.eu.auth0.com");
        assert_eq!(config.identity.scope, DEFAULT_SCOPE);
        assert!(config.identity.audience.is_none());
        assert_eq!(config.api.base_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.api.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
        assert_eq!(
            config.identity.issuer().map(String::from),
            Some("https://t4g.eu.auth0.com/".to_string())
        );
    }

    #[test]
    fn missing_provider_settings_are_reported_by_name() {
        let err = GatewayConfig::from_lookup(lookup(&[(ENV_IDP_CLIENT_ID, "client")]))
            .expect_err("domain is required");
        assert_eq!(
            err,
            ConfigError::MissingEnv {
                name: ENV_IDP_DOMAIN
            }
        );

        let err = GatewayConfig::from_lookup(lookup(&[
            (ENV_IDP_DOMAIN, "t4g.auth0.com"),
            (ENV_IDP_CLIENT_ID, "   "),
        ]))
        .expect_err("blank client id is missing");
        assert_eq!(
            err,
            ConfigError::MissingEnv {
                name: ENV_IDP_CLIENT_ID
            }
        );
    }

    #[test]
    fn invalid_values_carry_reason() {
        let base = [
            (ENV_IDP_DOMAIN, "t4g.auth0.com"),
            (ENV_IDP_CLIENT_ID, "client"),
        ];

        let mut pairs = base.to_vec();
        pairs.push((ENV_HTTP_TIMEOUT_SECS, "0"));
        assert!(matches!(
            GatewayConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::InvalidValue {
                reason: "expected_positive_seconds",
                ..
            })
        ));

        let mut pairs = base.to_vec();
        pairs.push((ENV_API_URL, "ftp://example.com"));
        assert!(matches!(
            GatewayConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::InvalidValue {
                reason: "unsupported_scheme",
                ..
            })
        ));

        let mut pairs = base.to_vec();
        pairs.push((ENV_IDP_SCOPE, "profile email"));
        assert!(matches!(
            GatewayConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::InvalidValue {
                reason: "missing_openid_scope",
                ..
            })
        ));

        let mut pairs = base.to_vec();
        pairs.push((ENV_LOG_FORMAT, "xml"));
        assert!(matches!(
            GatewayConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::InvalidValue {
                name: ENV_LOG_FORMAT,
                ..
            })
        ));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = GatewayConfig::from_lookup(lookup(&[
            (ENV_IDP_DOMAIN, "t4g.auth0.com"),
            (ENV_IDP_CLIENT_ID, "client"),
            (ENV_IDP_AUDIENCE, "https://api.t4g.space"),
            (ENV_API_URL, "https://api.t4g.space/api/"),
            (ENV_HTTP_TIMEOUT_SECS, "3"),
            (ENV_LOG_FORMAT, "json"),
        ]))
        .expect("config should load");
        assert_eq!(
            config.identity.audience.as_deref(),
            Some("https://api.t4g.space")
        );
        assert_eq!(config.api.timeout, Duration::from_secs(3));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn log_settings_load_without_identity() {
        let settings = LogSettings::from_lookup(lookup(&[
            (ENV_LOG_LEVEL, "debug,t4g_gateway=trace"),
            (ENV_LOG_FORMAT, "pretty"),
        ]))
        .expect("log settings should load");
        assert_eq!(settings.level, "debug,t4g_gateway=trace");
        assert_eq!(settings.format, LogFormat::Pretty);

        let err = LogSettings::from_lookup(lookup(&[(ENV_LOG_FORMAT, "xml")]))
            .expect_err("unknown format rejected");
        assert!(matches!(err, ConfigError::InvalidValue { name: ENV_LOG_FORMAT, .. }));
    }
}
