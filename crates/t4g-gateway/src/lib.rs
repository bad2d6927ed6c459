#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Tenant session and authorized data-access gateway.
//!
//! Layout:
//! - `credentials.rs`: capability trait for the external identity provider
//! - `claims.rs`: validated decode of provider claims into typed identity facts
//! - `provider.rs`: authorize/logout URL helpers for the redirect flow
//! - `session/`: session snapshot model and the single-writer `SessionStore`
//! - `mediator/`: credential-attaching API client and its tagged call outcome
//! - `gate.rs`: pure render decision for protected views
//! - `view.rs`, `placeholder.rs`: per-resource view state and fallback data

pub mod claims;
pub mod credentials;
pub mod error;
pub mod gate;
pub mod mediator;
pub mod placeholder;
pub mod provider;
pub mod session;
pub mod view;

pub use claims::{
    ClaimSet, ClaimsError, DecodedIdentity, Identity, TenantClaims, TenantRole, decode_claims,
    decode_jwt_payload,
};
pub use credentials::{AccessToken, CallbackParams, CredentialError, CredentialSource};
pub use error::{GatewayError, GatewayResult};
pub use gate::{AccessDecision, PageRequirement, decide, denial_message};
pub use mediator::{CallOutcome, Mediator};
pub use placeholder::{placeholder_challenges, placeholder_gifts};
pub use session::{SessionGeneration, SessionSnapshot, SessionStatus, SessionStore};
pub use view::{ResourceState, ResourceView};
