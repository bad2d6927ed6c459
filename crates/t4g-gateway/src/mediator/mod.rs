//! Authorized request mediator.
//!
//! # Design
//! - Every call reads the session once; no network work happens unless the
//!   snapshot is `Authenticated`.
//! - A fresh credential is requested per call. Failing to get one is a
//!   session-level problem and reported as `Unauthenticated`.
//! - No retries here. Callers decide using [`CallOutcome::is_retryable`].
//! - Responses that land after the session generation moved are discarded.

mod outcome;

pub use outcome::CallOutcome;

use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use t4g_api_models::{
    Challenge, ChallengeDraft, DashboardAnalytics, DeleteAck, Gift, GiftDraft, ProblemDetails,
    ResourceId, TenantProfile, TenantProfilePatch,
};
use t4g_config::ApiConfig;
use url::Url;
use uuid::Uuid;

use crate::error::{GatewayError, GatewayResult};
use crate::session::{SessionGeneration, SessionStore};

const HEADER_REQUEST_ID: &str = "x-request-id";
const PATH_PROFILE: &str = "tenants/profile";
const PATH_ANALYTICS: &str = "tenants/dashboard/analytics";
const PATH_GIFTS: &str = "tenants/gifts";
const PATH_CHALLENGES: &str = "tenants/challenges";

/// Attaches credentials to resource calls and normalizes their failures.
#[derive(Clone, Debug)]
pub struct Mediator {
    session: SessionStore,
    client: Client,
    base_url: Url,
}

struct RawResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl Mediator {
    /// Build a mediator over an existing HTTP client.
    #[must_use]
    pub const fn new(session: SessionStore, client: Client, base_url: Url) -> Self {
        Self {
            session,
            client,
            base_url,
        }
    }

    /// Build a mediator with a client configured from `config`.
    ///
    /// # Errors
    /// Returns [`GatewayError::HttpClient`] when the HTTP client cannot be built.
    pub fn from_config(session: SessionStore, config: &ApiConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| GatewayError::HttpClient { source })?;
        Ok(Self::new(session, client, config.base_url.clone()))
    }

    /// Session this mediator reads from.
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// `GET /tenants/profile`.
    pub async fn tenant_profile(&self) -> CallOutcome<TenantProfile> {
        self.send(Method::GET, PATH_PROFILE.to_string(), None::<&()>)
            .await
            .and_then(decode_json)
    }

    /// `PUT /tenants/profile`.
    pub async fn update_tenant_profile(
        &self,
        patch: &TenantProfilePatch,
    ) -> CallOutcome<TenantProfile> {
        self.send(Method::PUT, PATH_PROFILE.to_string(), Some(patch))
            .await
            .and_then(decode_json)
    }

    /// `GET /tenants/dashboard/analytics`.
    pub async fn dashboard_analytics(&self) -> CallOutcome<DashboardAnalytics> {
        self.send(Method::GET, PATH_ANALYTICS.to_string(), None::<&()>)
            .await
            .and_then(decode_json)
    }

    /// `GET /tenants/gifts`.
    pub async fn list_gifts(&self) -> CallOutcome<Vec<Gift>> {
        self.send(Method::GET, PATH_GIFTS.to_string(), None::<&()>)
            .await
            .and_then(decode_json)
    }

    /// `POST /tenants/gifts`.
    pub async fn create_gift(&self, draft: &GiftDraft) -> CallOutcome<Gift> {
        self.send(Method::POST, PATH_GIFTS.to_string(), Some(draft))
            .await
            .and_then(decode_json)
    }

    /// `PUT /tenants/gifts/{id}`.
    pub async fn update_gift(&self, id: &ResourceId, draft: &GiftDraft) -> CallOutcome<Gift> {
        self.send(Method::PUT, format!("{PATH_GIFTS}/{id}"), Some(draft))
            .await
            .and_then(decode_json)
    }

    /// `DELETE /tenants/gifts/{id}`.
    pub async fn delete_gift(&self, id: &ResourceId) -> CallOutcome<DeleteAck> {
        self.send(Method::DELETE, format!("{PATH_GIFTS}/{id}"), None::<&()>)
            .await
            .and_then(decode_ack)
    }

    /// `GET /tenants/challenges`.
    pub async fn list_challenges(&self) -> CallOutcome<Vec<Challenge>> {
        self.send(Method::GET, PATH_CHALLENGES.to_string(), None::<&()>)
            .await
            .and_then(decode_json)
    }

    /// `POST /tenants/challenges`.
    pub async fn create_challenge(&self, draft: &ChallengeDraft) -> CallOutcome<Challenge> {
        self.send(Method::POST, PATH_CHALLENGES.to_string(), Some(draft))
            .await
            .and_then(decode_json)
    }

    /// `PUT /tenants/challenges/{id}`.
    pub async fn update_challenge(
        &self,
        id: &ResourceId,
        draft: &ChallengeDraft,
    ) -> CallOutcome<Challenge> {
        self.send(Method::PUT, format!("{PATH_CHALLENGES}/{id}"), Some(draft))
            .await
            .and_then(decode_json)
    }

    /// `DELETE /tenants/challenges/{id}`.
    pub async fn delete_challenge(&self, id: &ResourceId) -> CallOutcome<DeleteAck> {
        self.send(Method::DELETE, format!("{PATH_CHALLENGES}/{id}"), None::<&()>)
            .await
            .and_then(decode_ack)
    }

    async fn send<B>(&self, method: Method, path: String, body: Option<&B>) -> CallOutcome<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let snapshot = self.session.snapshot();
        if !snapshot.is_authenticated() {
            tracing::debug!(%method, path = %path, status = ?snapshot.status(), "call skipped without session");
            return CallOutcome::Unauthenticated;
        }
        let generation = snapshot.generation();

        let token = match self.session.access_token().await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(%method, path = %path, error = %err.describe(), "credential unavailable");
                return CallOutcome::Unauthenticated;
            }
        };
        if !self.session.is_current(generation) {
            tracing::debug!(%method, path = %path, "session ended while acquiring credential");
            return CallOutcome::Unauthenticated;
        }

        let url = self.resource_url(&path);
        let request_id = Uuid::new_v4().to_string();
        let mut request = self
            .client
            .request(method.clone(), url)
            .bearer_auth(token.secret())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(HEADER_REQUEST_ID, request_id.as_str());
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, path = %path, %request_id, "issuing resource call");
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(%method, path = %path, %request_id, error = %err, "transport failure");
                return self.discard_if_stale(
                    generation,
                    CallOutcome::NetworkFailure {
                        detail: err.to_string(),
                    },
                );
            }
        };
        let status = response.status();
        if let Some(outcome) = auth_failure(status) {
            tracing::debug!(%method, path = %path, %request_id, status = status.as_u16(), "resource call refused");
            return self.discard_if_stale(generation, outcome);
        }
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(err) => {
                return self.discard_if_stale(
                    generation,
                    CallOutcome::NetworkFailure {
                        detail: err.to_string(),
                    },
                );
            }
        };
        tracing::debug!(%method, path = %path, %request_id, status = status.as_u16(), "resource call finished");

        let outcome = classify(status, body);
        self.discard_if_stale(generation, outcome)
    }

    fn discard_if_stale<T>(
        &self,
        generation: SessionGeneration,
        outcome: CallOutcome<T>,
    ) -> CallOutcome<T> {
        if self.session.is_current(generation) {
            outcome
        } else {
            tracing::debug!(
                issued_under = generation.value(),
                "discarding response from an ended session"
            );
            CallOutcome::Unauthenticated
        }
    }

    fn resource_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

/// 401 and 403 are decided by status alone; the body is never consulted.
fn auth_failure<T>(status: StatusCode) -> Option<CallOutcome<T>> {
    match status {
        StatusCode::UNAUTHORIZED => Some(CallOutcome::Unauthenticated),
        StatusCode::FORBIDDEN => Some(CallOutcome::Forbidden),
        _ => None,
    }
}

fn classify(status: StatusCode, body: Vec<u8>) -> CallOutcome<RawResponse> {
    if let Some(outcome) = auth_failure(status) {
        return outcome;
    }
    match status {
        status if status.is_success() => CallOutcome::success(RawResponse { status, body }),
        status => CallOutcome::ServerFailure {
            status: status.as_u16(),
            detail: problem_detail(status, &body),
        },
    }
}

fn problem_detail(status: StatusCode, body: &[u8]) -> String {
    if let Ok(problem) = serde_json::from_slice::<ProblemDetails>(body) {
        return problem.detail.unwrap_or(problem.title);
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        format!("request failed with status {status}")
    } else {
        text
    }
}

fn decode_json<T: DeserializeOwned>(raw: RawResponse) -> CallOutcome<T> {
    serde_json::from_slice(&raw.body).map_or_else(
        |err| CallOutcome::ServerFailure {
            status: raw.status.as_u16(),
            detail: format!("malformed response body: {err}"),
        },
        CallOutcome::success,
    )
}

fn decode_ack(raw: RawResponse) -> CallOutcome<DeleteAck> {
    if raw.body.iter().all(u8::is_ascii_whitespace) {
        return CallOutcome::success(DeleteAck::default());
    }
    decode_json(raw)
}
