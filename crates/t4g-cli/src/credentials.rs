//! Credential source backed by tokens supplied on the command line.
//!
//! The CLI cannot host a browser redirect, so the session is whatever the
//! operator pastes in: an access token for API calls and an ID token for the
//! identity claims. Redirect callbacks are accepted when they carry an ID token.

use async_trait::async_trait;
use t4g_gateway::{
    AccessToken, CallbackParams, ClaimSet, CredentialError, CredentialSource, decode_jwt_payload,
};

use crate::client::{CliError, CliResult};

/// Tokens provided through flags or the environment.
#[derive(Debug, Default)]
pub(crate) struct StaticCredentialSource {
    access_token: Option<AccessToken>,
    claims: Option<ClaimSet>,
}

impl StaticCredentialSource {
    /// Build from optional raw tokens. A present but undecodable ID token is rejected.
    pub(crate) fn from_tokens(
        access_token: Option<String>,
        id_token: Option<String>,
    ) -> CliResult<Self> {
        let claims = id_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                decode_jwt_payload(token)
                    .map_err(|err| CliError::validation(format!("invalid --id-token: {err}")))
            })
            .transpose()?;
        let access_token = access_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .map(AccessToken::new);
        Ok(Self {
            access_token,
            claims,
        })
    }
}

#[async_trait]
impl CredentialSource for StaticCredentialSource {
    async fn current_session(&self) -> Result<Option<ClaimSet>, CredentialError> {
        Ok(self.claims.clone())
    }

    async fn initiate_login(&self) -> Result<(), CredentialError> {
        tracing::debug!("login redirect is completed in the browser");
        Ok(())
    }

    async fn complete_login(&self, callback: &CallbackParams) -> Result<ClaimSet, CredentialError> {
        match callback.id_token.as_deref() {
            Some(token) => decode_jwt_payload(token).map_err(|err| CredentialError::Provider {
                detail: format!("callback id_token rejected: {err}"),
            }),
            None if callback.code.is_some() => Err(CredentialError::Provider {
                detail: "authorization code exchange is not available from the CLI; \
                         pass the id_token from the callback instead"
                    .to_string(),
            }),
            None => Err(CredentialError::Provider {
                detail: "callback carried neither a code nor an id_token".to_string(),
            }),
        }
    }

    async fn acquire_token(&self) -> Result<AccessToken, CredentialError> {
        self.access_token
            .clone()
            .ok_or(CredentialError::SilentAuthFailure)
    }

    async fn end_session(&self) -> Result<(), CredentialError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use t4g_test_support::fixtures::{admin_claims, jwt_for};

    #[tokio::test]
    async fn id_token_claims_become_the_session() {
        let source =
            StaticCredentialSource::from_tokens(Some("tok".into()), Some(jwt_for(&admin_claims())))
                .expect("tokens accepted");
        assert_eq!(
            source.current_session().await.expect("session"),
            Some(admin_claims())
        );
        assert_eq!(
            source.acquire_token().await.expect("token").secret(),
            "tok"
        );
    }

    #[tokio::test]
    async fn missing_tokens_mean_signed_out() {
        let source = StaticCredentialSource::from_tokens(None, Some("  ".into()))
            .expect("blank token ignored");
        assert_eq!(source.current_session().await.expect("session"), None);
        assert_eq!(
            source.acquire_token().await,
            Err(CredentialError::SilentAuthFailure)
        );
    }

    #[test]
    fn garbage_id_token_is_a_validation_error() {
        let err = StaticCredentialSource::from_tokens(None, Some("not-a-jwt".into()))
            .expect_err("rejected");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn code_only_callbacks_are_rejected() {
        let source = StaticCredentialSource::default();
        let callback = CallbackParams {
            code: Some("abc".into()),
            ..CallbackParams::default()
        };
        assert!(matches!(
            source.complete_login(&callback).await,
            Err(CredentialError::Provider { .. })
        ));
    }
}
