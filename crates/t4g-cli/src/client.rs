//! Shared context, error types, and outcome classification for the CLI.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use reqwest::{Client, StatusCode, Url};
use t4g_api_models::ResourceId;
use t4g_gateway::{CallOutcome, Mediator, SessionStore};

use crate::credentials::StaticCredentialSource;

/// Hint appended to sign-in errors.
pub(crate) const SIGN_IN_HINT: &str =
    "pass --access-token and --id-token (or set T4G_ACCESS_TOKEN and T4G_ID_TOKEN)";

/// Exit status for rejected input, denied access, or a missing sign-in.
pub(crate) const EXIT_VALIDATION: i32 = 2;
/// Exit status for network, server, or local runtime failures.
pub(crate) const EXIT_FAILURE: i32 = 3;

/// Command failure, split by whether the operator can fix it by changing input.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        if matches!(self, Self::Validation(_)) {
            EXIT_VALIDATION
        } else {
            EXIT_FAILURE
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(message) => formatter.write_str(message),
            Self::Failure(error) => write!(formatter, "{error:#}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Session and mediator shared by command handlers.
#[derive(Clone, Debug)]
pub(crate) struct AppContext {
    pub(crate) session: SessionStore,
    pub(crate) mediator: Mediator,
}

impl AppContext {
    /// Build the HTTP client and an initialised session from command-line tokens.
    pub(crate) async fn connect(
        base_url: Url,
        timeout: Duration,
        source: StaticCredentialSource,
    ) -> CliResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| CliError::failure(anyhow!("cannot create HTTP client: {err}")))?;
        Ok(Self::with_client(client, base_url, source).await)
    }

    pub(crate) async fn with_client(
        client: Client,
        base_url: Url,
        source: StaticCredentialSource,
    ) -> Self {
        let session = SessionStore::new(Arc::new(source));
        let snapshot = session.initialize().await;
        tracing::debug!(status = ?snapshot.status(), "cli session initialised");
        let mediator = Mediator::new(session.clone(), client, base_url);
        Self { session, mediator }
    }
}

/// `--api-url` value parser.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    Url::parse(input).map_err(|err| format!("'{input}' is not an absolute URL: {err}"))
}

/// Parse a resource identifier argument.
pub(crate) fn parse_resource_id(input: &str) -> Result<ResourceId, String> {
    ResourceId::parse(input).map_err(|err| format!("invalid resource id '{input}': {err}"))
}

/// Turn a mediated call outcome into data or a CLI error.
pub(crate) fn expect_success<T>(outcome: CallOutcome<T>, action: &str) -> CliResult<T> {
    match outcome {
        CallOutcome::Success { data } => Ok(data),
        CallOutcome::Unauthenticated => Err(CliError::validation(format!(
            "{action}: sign-in required; {SIGN_IN_HINT}"
        ))),
        CallOutcome::Forbidden => Err(CliError::validation(format!(
            "{action}: access denied for this account"
        ))),
        CallOutcome::NetworkFailure { detail } => {
            Err(CliError::failure(anyhow!("{action}: request failed: {detail}")))
        }
        CallOutcome::ServerFailure { status, detail } => {
            let is_client_error = StatusCode::from_u16(status).is_ok_and(|code| {
                matches!(
                    code,
                    StatusCode::BAD_REQUEST
                        | StatusCode::NOT_FOUND
                        | StatusCode::CONFLICT
                        | StatusCode::UNPROCESSABLE_ENTITY
                )
            });
            if is_client_error {
                Err(CliError::validation(format!("{action}: {detail}")))
            } else {
                Err(CliError::failure(anyhow!(
                    "{action}: {detail} (status {status})"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_separate_validation_from_failure() {
        assert_eq!(CliError::validation("bad").exit_code(), 2);
        let failure = CliError::failure(anyhow!("boom"));
        assert_eq!(failure.exit_code(), 3);
        assert_eq!(failure.to_string(), "boom");
    }

    #[test]
    fn outcomes_map_to_exit_tiers() {
        assert_eq!(expect_success(CallOutcome::success(7), "x").ok(), Some(7));

        let denied = expect_success::<()>(CallOutcome::Forbidden, "list gifts")
            .expect_err("forbidden is an error");
        assert!(matches!(denied, CliError::Validation(ref message) if message.contains("access denied")));

        let conflict = expect_success::<()>(
            CallOutcome::ServerFailure {
                status: 409,
                detail: "duplicate name".into(),
            },
            "create gift",
        )
        .expect_err("conflict is an error");
        assert_eq!(conflict.exit_code(), 2);
        assert_eq!(conflict.to_string(), "create gift: duplicate name");

        let outage = expect_success::<()>(
            CallOutcome::ServerFailure {
                status: 503,
                detail: "maintenance".into(),
            },
            "list gifts",
        )
        .expect_err("outage is an error");
        assert_eq!(outage.exit_code(), 3);
    }

    #[test]
    fn resource_ids_are_validated() {
        assert!(parse_resource_id("gift-1").is_ok());
        assert!(parse_resource_id("../admin").is_err());
        assert!(parse_url("not a url").is_err());
    }
}
