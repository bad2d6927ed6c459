//! Scripted identity provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use t4g_gateway::{AccessToken, CallbackParams, ClaimSet, CredentialError, CredentialSource};
use tokio::sync::Semaphore;

/// Token handed out by default.
pub const DEFAULT_TOKEN: &str = "test-access-token";

/// Credential source whose answers are scripted up front.
///
/// Every provider call is counted. Session lookups can be held open with
/// [`ScriptedCredentialSource::hold_session_queries`] and let through with
/// [`ScriptedCredentialSource::release`].
#[derive(Debug)]
pub struct ScriptedCredentialSource {
    session: Mutex<Result<Option<ClaimSet>, CredentialError>>,
    completion: Mutex<Result<ClaimSet, CredentialError>>,
    token: Mutex<Result<AccessToken, CredentialError>>,
    end_session: Mutex<Result<(), CredentialError>>,
    gate: Option<Semaphore>,
    session_queries: AtomicUsize,
    login_starts: AtomicUsize,
    login_completions: AtomicUsize,
    token_requests: AtomicUsize,
    session_ends: AtomicUsize,
}

impl ScriptedCredentialSource {
    /// Provider with an existing session for `claims`.
    #[must_use]
    pub fn signed_in(claims: ClaimSet) -> Self {
        Self::with_session(Ok(Some(claims)))
    }

    /// Provider with no session.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::with_session(Ok(None))
    }

    /// Provider whose session lookup fails.
    #[must_use]
    pub fn failing(error: CredentialError) -> Self {
        Self::with_session(Err(error))
    }

    fn with_session(session: Result<Option<ClaimSet>, CredentialError>) -> Self {
        Self {
            session: Mutex::new(session),
            completion: Mutex::new(Err(CredentialError::Provider {
                detail: "login completion not scripted".to_string(),
            })),
            token: Mutex::new(Ok(AccessToken::new(DEFAULT_TOKEN))),
            end_session: Mutex::new(Ok(())),
            gate: None,
            session_queries: AtomicUsize::new(0),
            login_starts: AtomicUsize::new(0),
            login_completions: AtomicUsize::new(0),
            token_requests: AtomicUsize::new(0),
            session_ends: AtomicUsize::new(0),
        }
    }

    /// Hand out `token` from `acquire_token`.
    #[must_use]
    pub fn with_token(self, token: &str) -> Self {
        *lock(&self.token) = Ok(AccessToken::new(token));
        self
    }

    /// Fail every `acquire_token` call.
    #[must_use]
    pub fn with_token_failure(self, error: CredentialError) -> Self {
        *lock(&self.token) = Err(error);
        self
    }

    /// Fail `end_session`.
    #[must_use]
    pub fn with_end_session_failure(self, error: CredentialError) -> Self {
        *lock(&self.end_session) = Err(error);
        self
    }

    /// Complete redirect logins with `claims`.
    #[must_use]
    pub fn with_login_completion(self, claims: ClaimSet) -> Self {
        *lock(&self.completion) = Ok(claims);
        self
    }

    /// Block session lookups until [`ScriptedCredentialSource::release`] is called.
    #[must_use]
    pub fn hold_session_queries(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    /// Let `count` held session lookups through.
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    /// Replace the scripted session lookup result.
    pub fn set_session(&self, session: Result<Option<ClaimSet>, CredentialError>) {
        *lock(&self.session) = session;
    }

    /// Number of `current_session` calls.
    #[must_use]
    pub fn session_queries(&self) -> usize {
        self.session_queries.load(Ordering::SeqCst)
    }

    /// Number of `initiate_login` calls.
    #[must_use]
    pub fn login_starts(&self) -> usize {
        self.login_starts.load(Ordering::SeqCst)
    }

    /// Number of `complete_login` calls.
    #[must_use]
    pub fn login_completions(&self) -> usize {
        self.login_completions.load(Ordering::SeqCst)
    }

    /// Number of `acquire_token` calls.
    #[must_use]
    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    /// Number of `end_session` calls.
    #[must_use]
    pub fn session_ends(&self) -> usize {
        self.session_ends.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialSource for ScriptedCredentialSource {
    async fn current_session(&self) -> Result<Option<ClaimSet>, CredentialError> {
        self.session_queries.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|err| CredentialError::Transport {
                    detail: err.to_string(),
                })?
                .forget();
        }
        lock(&self.session).clone()
    }

    async fn initiate_login(&self) -> Result<(), CredentialError> {
        self.login_starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn complete_login(&self, _callback: &CallbackParams) -> Result<ClaimSet, CredentialError> {
        self.login_completions.fetch_add(1, Ordering::SeqCst);
        let completion = lock(&self.completion).clone();
        if let Ok(claims) = &completion {
            *lock(&self.session) = Ok(Some(claims.clone()));
        }
        completion
    }

    async fn acquire_token(&self) -> Result<AccessToken, CredentialError> {
        self.token_requests.fetch_add(1, Ordering::SeqCst);
        lock(&self.token).clone()
    }

    async fn end_session(&self) -> Result<(), CredentialError> {
        self.session_ends.fetch_add(1, Ordering::SeqCst);
        let outcome = lock(&self.end_session).clone();
        if outcome.is_ok() {
            *lock(&self.session) = Ok(None);
        }
        outcome
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
