//! Capability boundary for the external identity provider.
//!
//! # Design
//! - The provider is opaque: login, callback completion, token issuance, and
//!   logout are the only operations the gateway consumes.
//! - Claims cross this boundary as a raw JSON object and are decoded by
//!   [`crate::claims::decode_claims`] before anything else sees them.

use std::fmt::{self, Debug, Formatter};

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::claims::ClaimSet;

/// Bearer credential issued by the provider.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw bearer token.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw token text, for building the authorization header.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl Debug for AccessToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("AccessToken(***)")
    }
}

/// Failures reported by a credential source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// No token can be issued without user interaction.
    #[error("token cannot be refreshed without user interaction")]
    SilentAuthFailure,
    /// The provider rejected the login (callback carried an error).
    #[error("login was rejected by the identity provider")]
    LoginRejected {
        /// Provider error code.
        error: String,
        /// Provider error description, when supplied.
        description: Option<String>,
    },
    /// The provider could not be reached.
    #[error("identity provider unreachable")]
    Transport {
        /// Transport failure detail.
        detail: String,
    },
    /// The provider answered with something unusable.
    #[error("identity provider failure")]
    Provider {
        /// Failure detail.
        detail: String,
    },
}

impl CredentialError {
    /// Human-readable description including context fields.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::SilentAuthFailure => self.to_string(),
            Self::LoginRejected {
                error,
                description: Some(description),
            } => format!("{self}: {error} ({description})"),
            Self::LoginRejected {
                error,
                description: None,
            } => format!("{self}: {error}"),
            Self::Transport { detail } | Self::Provider { detail } => format!("{self}: {detail}"),
        }
    }
}

/// Operations the gateway consumes from the identity provider.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Claims of an existing provider session, or `None` when signed out.
    async fn current_session(&self) -> Result<Option<ClaimSet>, CredentialError>;

    /// Start the provider-controlled redirect flow.
    async fn initiate_login(&self) -> Result<(), CredentialError>;

    /// Finish the redirect flow with the parameters delivered to the callback route.
    async fn complete_login(&self, callback: &CallbackParams) -> Result<ClaimSet, CredentialError>;

    /// Fresh (possibly silently refreshed) bearer credential.
    async fn acquire_token(&self) -> Result<AccessToken, CredentialError>;

    /// Terminate the provider session.
    async fn end_session(&self) -> Result<(), CredentialError>;
}

/// Parameters delivered to the login callback route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    /// Authorization code.
    pub code: Option<String>,
    /// Opaque state echoed back by the provider.
    pub state: Option<String>,
    /// Provider error code.
    pub error: Option<String>,
    /// Provider error description.
    pub error_description: Option<String>,
    /// ID token, for implicit-style callbacks.
    pub id_token: Option<String>,
}

impl CallbackParams {
    /// Read callback parameters from the query string, then the fragment.
    ///
    /// Query values win when a key appears in both.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self::default();
        let fragment_pairs = url
            .fragment()
            .map(|fragment| url::form_urlencoded::parse(fragment.as_bytes()).into_owned())
            .into_iter()
            .flatten();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .into_owned()
            .chain(fragment_pairs)
            .collect();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "code" => &mut params.code,
                "state" => &mut params.state,
                "error" => &mut params.error,
                "error_description" => &mut params.error_description,
                "id_token" => &mut params.id_token,
                _ => continue,
            };
            if slot.is_none() && !value.is_empty() {
                *slot = Some(value);
            }
        }
        params
    }

    /// The provider's rejection, when the callback carries one.
    #[must_use]
    pub fn rejection(&self) -> Option<CredentialError> {
        self.error
            .as_ref()
            .map(|error| CredentialError::LoginRejected {
                error: error.clone(),
                description: self.error_description.clone(),
            })
    }
}
