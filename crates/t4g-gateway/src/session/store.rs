//! Process-wide owner of the session snapshot.
//!
//! # Design
//! - Exactly one writer: every transition goes through this type; readers get
//!   clones of the published snapshot or a `watch` receiver.
//! - Provider lookups are single-flight. A second `initialize()` joins the
//!   pending transition instead of issuing another provider round trip.
//! - `sign_out()` advances the generation before anything else so late
//!   results from the ended session are discarded.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::watch;

use crate::claims::{ClaimSet, TenantRole, decode_claims};
use crate::credentials::{AccessToken, CallbackParams, CredentialError, CredentialSource};
use crate::session::snapshot::{SessionGeneration, SessionSnapshot};

type Transition = Shared<BoxFuture<'static, SessionSnapshot>>;
type LookupResult = Result<Option<ClaimSet>, CredentialError>;

/// Handle to the session store. Clones share the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn CredentialSource>,
    state: watch::Sender<SessionSnapshot>,
    pending: Mutex<PendingSlot>,
}

#[derive(Default)]
struct PendingSlot {
    next_id: u64,
    current: Option<(u64, Transition)>,
}

impl SessionStore {
    /// Create a store in the `Loading` state backed by `source`.
    #[must_use]
    pub fn new(source: Arc<dyn CredentialSource>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::loading(SessionGeneration::default()));
        Self {
            inner: Arc::new(Inner {
                source,
                state,
                pending: Mutex::new(PendingSlot::default()),
            }),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.state.subscribe()
    }

    /// Whether work started under `generation` may still be applied.
    #[must_use]
    pub fn is_current(&self, generation: SessionGeneration) -> bool {
        self.inner.state.borrow().generation() == generation
    }

    /// True only for tenant administrators.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.inner.state.borrow().is_admin()
    }

    /// Whether the current tenant role is exactly `role`.
    #[must_use]
    pub fn has_role(&self, role: TenantRole) -> bool {
        self.inner.state.borrow().has_role(role)
    }

    /// Tenant identifier, when known.
    #[must_use]
    pub fn tenant_id(&self) -> Option<String> {
        self.inner.state.borrow().tenant_id().map(str::to_owned)
    }

    /// Business name, falling back to the user's display name.
    #[must_use]
    pub fn business_name(&self) -> Option<String> {
        self.inner.state.borrow().business_name().map(str::to_owned)
    }

    /// Ask the provider for an existing session and publish the result.
    ///
    /// Calls made while a transition is pending join it.
    pub async fn initialize(&self) -> SessionSnapshot {
        let transition = match self.start("initialize", true, |source| async move {
            source.current_session().await
        }) {
            Ok(transition) | Err(transition) => transition,
        };
        transition.await
    }

    /// Start the provider's redirect login. The session state is unchanged;
    /// the flow finishes through [`SessionStore::complete_sign_in`].
    ///
    /// # Errors
    /// Returns the provider's [`CredentialError`] when the redirect cannot start.
    pub async fn sign_in(&self) -> Result<(), CredentialError> {
        self.inner.source.initiate_login().await.inspect_err(|err| {
            tracing::warn!(error = %err.describe(), "failed to start login redirect");
        })
    }

    /// Finish the redirect login with the callback parameters.
    ///
    /// Waits for any pending transition, then runs its own through the same
    /// path as [`SessionStore::initialize`]. A sign-out during the wait ends
    /// the attempt without contacting the provider.
    pub async fn complete_sign_in(&self, callback: CallbackParams) -> SessionSnapshot {
        let entered = self.snapshot().generation();
        loop {
            if !self.is_current(entered) {
                tracing::info!("session ended before the login callback could complete");
                return self.snapshot();
            }
            let attempt = self.start("complete_sign_in", false, |source| {
                let callback = callback.clone();
                async move {
                    if let Some(rejection) = callback.rejection() {
                        return Err(rejection);
                    }
                    source.complete_login(&callback).await.map(Some)
                }
            });
            match attempt {
                Ok(transition) => return transition.await,
                Err(busy) => {
                    busy.await;
                }
            }
        }
    }

    /// End the session locally, then at the provider.
    ///
    /// Local state is cleared even when the provider call fails; the failure
    /// is logged and not returned.
    pub async fn sign_out(&self) -> SessionSnapshot {
        let ended = {
            let mut slot = lock(&self.inner.pending);
            slot.current = None;
            let mut ended = SessionSnapshot::default();
            self.inner.state.send_modify(|current| {
                *current = SessionSnapshot::unauthenticated(current.generation().next(), None);
                ended = current.clone();
            });
            ended
        };
        tracing::info!(
            generation = ended.generation().value(),
            "session ended locally"
        );

        if let Err(err) = self.inner.source.end_session().await {
            tracing::warn!(
                error = %err.describe(),
                "provider sign-out failed; local session already cleared"
            );
        }
        ended
    }

    pub(crate) async fn access_token(&self) -> Result<AccessToken, CredentialError> {
        self.inner.source.acquire_token().await
    }

    /// Start a transition, or hand back the pending one.
    ///
    /// `Ok` carries the transition the caller should await for its result:
    /// a new one, or the pending one when `join` is set. `Err` carries the
    /// pending transition when `join` is unset.
    fn start<F, Fut>(&self, label: &'static str, join: bool, lookup: F) -> Result<Transition, Transition>
    where
        F: Fn(Arc<dyn CredentialSource>) -> Fut,
        Fut: Future<Output = LookupResult> + Send + 'static,
    {
        let mut slot = lock(&self.inner.pending);
        if let Some((_, pending)) = slot.current.as_ref() {
            tracing::debug!(label, "session transition already pending");
            return if join {
                Ok(pending.clone())
            } else {
                Err(pending.clone())
            };
        }

        let id = slot.next_id;
        slot.next_id = slot.next_id.wrapping_add(1);
        let started = self.begin_loading();
        let inner = Arc::clone(&self.inner);
        let lookup = lookup(Arc::clone(&self.inner.source));
        let transition = async move {
            let result = lookup.await;
            inner.finish(label, id, started, result)
        }
        .boxed()
        .shared();
        slot.current = Some((id, transition.clone()));
        Ok(transition)
    }

    fn begin_loading(&self) -> SessionGeneration {
        let mut generation = SessionGeneration::default();
        self.inner.state.send_modify(|current| {
            generation = current.generation();
            *current = SessionSnapshot::loading(generation);
        });
        generation
    }
}

impl Inner {
    fn finish(
        &self,
        label: &'static str,
        id: u64,
        started: SessionGeneration,
        result: LookupResult,
    ) -> SessionSnapshot {
        let next = match result {
            Ok(Some(claims)) => match decode_claims(&claims) {
                Ok(decoded) => {
                    tracing::info!(
                        label,
                        subject = %decoded.identity.id,
                        tenant_role = ?decoded.tenant.as_ref().and_then(|tenant| tenant.tenant_role),
                        "session authenticated"
                    );
                    SessionSnapshot::authenticated(started, decoded)
                }
                Err(err) => {
                    tracing::warn!(label, error = ?err, "identity claims rejected");
                    SessionSnapshot::unauthenticated(
                        started,
                        Some(format!("invalid identity claims: {}", err.describe())),
                    )
                }
            },
            Ok(None) => {
                tracing::info!(label, "no provider session");
                SessionSnapshot::unauthenticated(started, None)
            }
            Err(err) => {
                tracing::warn!(label, error = %err.describe(), "session lookup failed");
                SessionSnapshot::unauthenticated(started, Some(err.describe()))
            }
        };

        let mut slot = lock(&self.pending);
        let applied = self.state.send_if_modified(|current| {
            if current.generation() != started {
                return false;
            }
            *current = next;
            true
        });
        if !applied {
            tracing::debug!(label, "discarding session result from an ended session");
        }
        if slot.current.as_ref().is_some_and(|(pending, _)| *pending == id) {
            slot.current = None;
        }
        drop(slot);
        self.state.borrow().clone()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SessionStore")
            .field("snapshot", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
