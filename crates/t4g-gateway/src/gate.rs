//! Render decision for protected views.
//!
//! `decide` is pure and total: every status/requirement pair maps to exactly
//! one decision, and nothing falls through to "allow".

use serde::Serialize;

use crate::session::{SessionSnapshot, SessionStatus};

/// What a view needs before it may render its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageRequirement {
    /// Anyone may view.
    Public,
    /// A signed-in user.
    RequireAuth,
    /// A tenant administrator.
    RequireAdmin,
}

/// Outcome of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    /// Session state is not known yet.
    ShowLoading,
    /// Prompt the user to sign in.
    ShowSignIn,
    /// Signed in without the required role.
    ShowForbidden,
    /// Render the protected content.
    ShowContent,
}

/// Decide what a view guarded by `requirement` should render.
#[must_use]
pub fn decide(snapshot: &SessionSnapshot, requirement: PageRequirement) -> AccessDecision {
    match (requirement, snapshot.status()) {
        (PageRequirement::Public, _) => AccessDecision::ShowContent,
        (_, SessionStatus::Unknown | SessionStatus::Loading) => AccessDecision::ShowLoading,
        (_, SessionStatus::Unauthenticated) => AccessDecision::ShowSignIn,
        (PageRequirement::RequireAuth, SessionStatus::Authenticated) => {
            AccessDecision::ShowContent
        }
        (PageRequirement::RequireAdmin, SessionStatus::Authenticated) => {
            if snapshot.is_admin() {
                AccessDecision::ShowContent
            } else {
                AccessDecision::ShowForbidden
            }
        }
    }
}

/// Text shown alongside [`AccessDecision::ShowForbidden`].
#[must_use]
pub fn denial_message(snapshot: &SessionSnapshot, requirement: PageRequirement) -> String {
    let business = snapshot.business_name().unwrap_or("this business");
    match requirement {
        PageRequirement::RequireAdmin => {
            format!("This area requires administrator privileges for {business}.")
        }
        PageRequirement::Public | PageRequirement::RequireAuth => {
            format!("You do not have access to this area of {business}.")
        }
    }
}
