//! Redirect-flow URL helpers for the identity provider.

use rand::{Rng, distr::Alphanumeric};
use t4g_config::IdentityProviderConfig;
use url::Url;

use crate::credentials::CredentialError;

const STATE_LEN: usize = 32;

/// Build the provider's authorize URL for the redirect login flow.
///
/// # Errors
/// Returns [`CredentialError::Provider`] when the configured domain does not
/// form a valid URL.
pub fn authorize_url(config: &IdentityProviderConfig, state: &str) -> Result<Url, CredentialError> {
    let mut url = endpoint(config, "authorize")?;
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("response_type", "code")
            .append_pair("client_id", &config.client_id)
            .append_pair("redirect_uri", config.redirect_uri.as_str())
            .append_pair("scope", &config.scope)
            .append_pair("state", state);
        if let Some(audience) = &config.audience {
            query.append_pair("audience", audience);
        }
    }
    Ok(url)
}

/// Build the provider's logout URL, returning the browser to `return_to`.
///
/// # Errors
/// Returns [`CredentialError::Provider`] when the configured domain does not
/// form a valid URL.
pub fn logout_url(config: &IdentityProviderConfig, return_to: &Url) -> Result<Url, CredentialError> {
    let mut url = endpoint(config, "v2/logout")?;
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("returnTo", return_to.as_str());
    Ok(url)
}

/// Random opaque value for the `state` parameter.
#[must_use]
pub fn random_state() -> String {
    let mut rng = rand::rng();
    std::iter::repeat_with(|| rng.sample(Alphanumeric) as char)
        .take(STATE_LEN)
        .collect()
}

fn endpoint(config: &IdentityProviderConfig, path: &str) -> Result<Url, CredentialError> {
    config
        .issuer()
        .and_then(|issuer| issuer.join(path).ok())
        .ok_or_else(|| CredentialError::Provider {
            detail: format!("invalid provider domain '{}'", config.domain),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> IdentityProviderConfig {
        IdentityProviderConfig {
            domain: "t4g.eu.auth0.com".into(),
            client_id: "client-1".into(),
            audience: Some("https://api.t4g.space".into()),
            redirect_uri: Url::parse("http://localhost:5173/callback").expect("valid url"),
            scope: "openid profile email".into(),
        }
    }

    #[test]
    fn authorize_url_carries_flow_parameters() {
        let url = authorize_url(&config(), "state-1").expect("url should build");
        assert_eq!(url.host_str(), Some("t4g.eu.auth0.com"));
        assert_eq!(url.path(), "/authorize");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&("client_id".into(), "client-1".into())));
        assert!(pairs.contains(&("scope".into(), "openid profile email".into())));
        assert!(pairs.contains(&("state".into(), "state-1".into())));
        assert!(pairs.contains(&("audience".into(), "https://api.t4g.space".into())));
    }

    #[test]
    fn logout_url_returns_to_origin() {
        let origin = Url::parse("http://localhost:5173/").expect("valid url");
        let url = logout_url(&config(), &origin).expect("url should build");
        assert_eq!(url.path(), "/v2/logout");
        assert!(url.query().is_some_and(|query| query.contains("returnTo=http")));
    }

    #[test]
    fn invalid_domain_is_a_provider_error() {
        let mut broken = config();
        broken.domain = "bad host".into();
        assert!(matches!(
            authorize_url(&broken, "s"),
            Err(CredentialError::Provider { .. })
        ));
    }

    #[test]
    fn random_state_is_alphanumeric() {
        let state = random_state();
        assert_eq!(state.len(), STATE_LEN);
        assert!(state.chars().all(|ch| ch.is_ascii_alphanumeric()));
    }
}
