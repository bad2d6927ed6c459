//! Immutable-per-update view of session and authorization state.
//!
//! # Design
//! - `identity` is set iff `status` is `Authenticated`; constructors are the
//!   only way to build a snapshot so the invariant cannot be broken.
//! - Role checks default to "not allowed" whenever a claim is missing.

use serde::Serialize;

use crate::claims::{DecodedIdentity, Identity, TenantClaims, TenantRole};

/// Authentication status of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No session store has reported yet.
    Unknown,
    /// The provider is being consulted.
    Loading,
    /// No usable session.
    Unauthenticated,
    /// Signed in.
    Authenticated,
}

/// Monotonic counter advanced whenever the session is ended locally.
///
/// Work started under one generation must not be applied under another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SessionGeneration(u64);

impl SessionGeneration {
    /// Raw counter value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Snapshot of session state published by the [`crate::SessionStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    status: SessionStatus,
    identity: Option<Identity>,
    tenant: Option<TenantClaims>,
    last_error: Option<String>,
    generation: SessionGeneration,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            status: SessionStatus::Unknown,
            identity: None,
            tenant: None,
            last_error: None,
            generation: SessionGeneration::default(),
        }
    }
}

impl SessionSnapshot {
    /// Session is being established.
    #[must_use]
    pub const fn loading(generation: SessionGeneration) -> Self {
        Self {
            status: SessionStatus::Loading,
            identity: None,
            tenant: None,
            last_error: None,
            generation,
        }
    }

    /// No session; `last_error` explains why when the lookup failed.
    #[must_use]
    pub const fn unauthenticated(generation: SessionGeneration, last_error: Option<String>) -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            identity: None,
            tenant: None,
            last_error,
            generation,
        }
    }

    /// Signed-in session built from decoded claims.
    #[must_use]
    pub fn authenticated(generation: SessionGeneration, decoded: DecodedIdentity) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            identity: Some(decoded.identity),
            tenant: decoded.tenant,
            last_error: None,
            generation,
        }
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Signed-in identity.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Tenant facts, when the provider supplied any.
    #[must_use]
    pub const fn tenant(&self) -> Option<&TenantClaims> {
        self.tenant.as_ref()
    }

    /// Description of the last credential or identity failure.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Generation this snapshot belongs to.
    #[must_use]
    pub const fn generation(&self) -> SessionGeneration {
        self.generation
    }

    /// Whether the session is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    /// Role inside the tenant, when known.
    #[must_use]
    pub fn tenant_role(&self) -> Option<TenantRole> {
        self.tenant.as_ref().and_then(|tenant| tenant.tenant_role)
    }

    /// Whether the user holds exactly `role`.
    #[must_use]
    pub fn has_role(&self, role: TenantRole) -> bool {
        self.tenant_role() == Some(role)
    }

    /// True only for tenant administrators.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(TenantRole::Admin)
    }

    /// Tenant identifier, when known.
    #[must_use]
    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant
            .as_ref()
            .and_then(|tenant| tenant.tenant_id.as_deref())
    }

    /// Business name, falling back to the user's display name.
    #[must_use]
    pub fn business_name(&self) -> Option<&str> {
        self.tenant
            .as_ref()
            .and_then(|tenant| tenant.business_name.as_deref())
            .or_else(|| {
                self.identity
                    .as_ref()
                    .map(|identity| identity.display_name.as_str())
            })
    }
}
