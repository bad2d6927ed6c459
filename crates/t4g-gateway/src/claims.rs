//! Validated decode of identity-provider claims.
//!
//! # Design
//! - Claims arrive as an untyped JSON object; this module is the only place
//!   that reads them.
//! - Absent tenant claims are normal (not every user belongs to a tenant).
//!   Present-but-malformed claims are an explicit [`ClaimsError`].
//! - Custom claims may be namespaced (`https://t4g.space/tenant_id`); the
//!   bare name wins when both forms are present.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Raw claims as delivered by the provider.
pub type ClaimSet = Map<String, Value>;

/// Tenant role carried in the `tenant_role` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantRole {
    /// Full administrative access to the tenant.
    Admin,
    /// Manages resources but not the account.
    Manager,
    /// Read-only access.
    Viewer,
}

impl TenantRole {
    /// Wire value of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Viewer => "viewer",
        }
    }

    /// Label shown to users.
    #[must_use]
    pub const fn display_label(self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Manager => "Manager",
            Self::Viewer => "Standard User",
        }
    }
}

impl Display for TenantRole {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for TenantRole {
    type Err = ClaimsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "viewer" => Ok(Self::Viewer),
            other => Err(ClaimsError::UnknownRole {
                value: other.to_string(),
            }),
        }
    }
}

/// Signed-in user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Provider subject identifier.
    pub id: String,
    /// Name shown in the UI.
    pub display_name: String,
    /// Email address, when shared by the provider.
    pub email: Option<String>,
    /// Avatar URL.
    pub avatar_url: Option<String>,
    /// Last profile update at the provider.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Tenant facts attached to an identity. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TenantClaims {
    /// Tenant the user belongs to.
    pub tenant_id: Option<String>,
    /// Role inside the tenant.
    pub tenant_role: Option<TenantRole>,
    /// Registered business name.
    pub business_name: Option<String>,
}

/// Result of decoding a claim set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedIdentity {
    /// User identity.
    pub identity: Identity,
    /// Tenant facts, when any tenant claim is present.
    pub tenant: Option<TenantClaims>,
}

/// Claim decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsError {
    /// The `sub` claim is missing or empty.
    #[error("claims are missing the subject")]
    MissingSubject,
    /// A claim had the wrong JSON type.
    #[error("claim has an unexpected type")]
    WrongType {
        /// Claim name.
        claim: &'static str,
        /// Expected JSON type.
        expected: &'static str,
    },
    /// `tenant_role` held an unrecognised value.
    #[error("unknown tenant role")]
    UnknownRole {
        /// Rejected value.
        value: String,
    },
    /// `updated_at` was not an RFC 3339 timestamp.
    #[error("invalid timestamp claim")]
    InvalidTimestamp {
        /// Rejected value.
        value: String,
    },
    /// A compact token could not be split or decoded.
    #[error("malformed token")]
    MalformedToken {
        /// Machine-readable reason.
        reason: &'static str,
    },
}

impl ClaimsError {
    /// Human-readable description including context fields.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::MissingSubject => self.to_string(),
            Self::WrongType { claim, expected } => format!("{self}: `{claim}` must be a {expected}"),
            Self::UnknownRole { value } | Self::InvalidTimestamp { value } => {
                format!("{self}: '{value}'")
            }
            Self::MalformedToken { reason } => format!("{self}: {reason}"),
        }
    }
}

/// Decode raw provider claims into typed identity facts.
///
/// # Errors
/// Returns [`ClaimsError`] when the subject is missing, a claim has the wrong
/// type, the tenant role is unknown, or the update timestamp is malformed.
pub fn decode_claims(claims: &ClaimSet) -> Result<DecodedIdentity, ClaimsError> {
    let id = string_claim(claims, "sub")?.ok_or(ClaimsError::MissingSubject)?;
    let email = string_claim(claims, "email")?;
    let display_name = string_claim(claims, "name")?
        .or(string_claim(claims, "nickname")?)
        .or_else(|| email.clone())
        .unwrap_or_else(|| id.clone());
    let updated_at = string_claim(claims, "updated_at")?
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|value| value.with_timezone(&Utc))
                .map_err(|_| ClaimsError::InvalidTimestamp { value: raw })
        })
        .transpose()?;

    let identity = Identity {
        id,
        display_name,
        email,
        avatar_url: string_claim(claims, "picture")?,
        updated_at,
    };

    let tenant_role = tenant_claim(claims, "tenant_role")?
        .map(|raw| raw.parse::<TenantRole>())
        .transpose()?;
    let tenant = TenantClaims {
        tenant_id: tenant_claim(claims, "tenant_id")?,
        tenant_role,
        business_name: tenant_claim(claims, "business_name")?,
    };
    let tenant = (tenant != TenantClaims::default()).then_some(tenant);

    Ok(DecodedIdentity { identity, tenant })
}

/// Extract the claim set from a compact JWT without verifying its signature.
///
/// # Errors
/// Returns [`ClaimsError::MalformedToken`] when the token is not three
/// dot-separated segments, the payload is not base64url, or it is not a JSON
/// object.
pub fn decode_jwt_payload(token: &str) -> Result<ClaimSet, ClaimsError> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(ClaimsError::MalformedToken {
            reason: "expected_three_segments",
        });
    };
    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| ClaimsError::MalformedToken {
            reason: "payload_not_base64url",
        })?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(claims)) => Ok(claims),
        Ok(_) => Err(ClaimsError::MalformedToken {
            reason: "payload_not_object",
        }),
        Err(_) => Err(ClaimsError::MalformedToken {
            reason: "payload_not_json",
        }),
    }
}

fn string_claim(claims: &ClaimSet, name: &'static str) -> Result<Option<String>, ClaimsError> {
    match claims.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) if value.trim().is_empty() => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ClaimsError::WrongType {
            claim: name,
            expected: "string",
        }),
    }
}

fn tenant_claim(claims: &ClaimSet, name: &'static str) -> Result<Option<String>, ClaimsError> {
    if let Some(value) = string_claim(claims, name)? {
        return Ok(Some(value));
    }
    let suffix = format!("/{name}");
    let namespaced = claims
        .iter()
        .find(|(key, _)| key.ends_with(&suffix))
        .map(|(_, value)| value);
    match namespaced {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) if value.trim().is_empty() => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ClaimsError::WrongType {
            claim: name,
            expected: "string",
        }),
    }
}
