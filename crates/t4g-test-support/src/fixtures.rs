//! Claim sets shaped like the identity provider's ID tokens.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Value, json};
use t4g_gateway::ClaimSet;

/// Subject used by every fixture.
pub const SUBJECT: &str = "auth0|tenant-user-1";

/// Tenant identifier used by the tenant fixtures.
pub const TENANT_ID: &str = "tenant-acme";

/// Business name used by the tenant fixtures.
pub const BUSINESS_NAME: &str = "Acme Florist";

/// Tenant administrator.
#[must_use]
pub fn admin_claims() -> ClaimSet {
    tenant_claims("admin")
}

/// Tenant member with the given role claim (`admin`, `manager`, `viewer`).
#[must_use]
pub fn tenant_claims(role: &str) -> ClaimSet {
    object(json!({
        "sub": SUBJECT,
        "name": "Jane Doe",
        "email": "jane@acme.example",
        "picture": "https://cdn.example/jane.png",
        "updated_at": "2024-05-01T12:00:00.000Z",
        "tenant_id": TENANT_ID,
        "tenant_role": role,
        "business_name": BUSINESS_NAME,
    }))
}

/// Read-only tenant member.
#[must_use]
pub fn viewer_claims() -> ClaimSet {
    tenant_claims("viewer")
}

/// Signed-in user carrying no tenant claims at all.
#[must_use]
pub fn claims_without_tenant(name: &str) -> ClaimSet {
    object(json!({
        "sub": SUBJECT,
        "name": name,
    }))
}

/// Unsigned compact JWT carrying `claims` as its payload.
#[must_use]
pub fn jwt_for(claims: &ClaimSet) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(Value::Object(claims.clone()).to_string());
    format!("{header}.{payload}.")
}

fn object(value: Value) -> ClaimSet {
    match value {
        Value::Object(map) => map,
        _ => ClaimSet::new(),
    }
}
