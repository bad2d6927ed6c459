//! Per-resource view state driven by mediator outcomes.
//!
//! # Design
//! - Authorization outcomes always win over placeholder data: a denied view
//!   never shows an empty or sample list.
//! - Data served from placeholders is flagged `Stale` with the reason so the
//!   UI can say so.

use serde::Serialize;

use crate::mediator::CallOutcome;

/// Render state of one resource view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResourceState<T> {
    /// Nothing requested yet.
    Idle,
    /// A call is in flight.
    Loading,
    /// Live data.
    Ready {
        /// Data returned by the API.
        data: T,
    },
    /// Placeholder data shown after a failed call.
    Stale {
        /// Placeholder data.
        data: T,
        /// Why live data is unavailable.
        reason: String,
    },
    /// Call failed and no placeholder exists.
    Failed {
        /// Failure description.
        message: String,
    },
    /// Signed in without permission for this resource.
    Denied {
        /// Text shown to the user.
        message: String,
    },
    /// The session is gone; the user must sign in again.
    SignInRequired,
}

/// View controller for one resource.
#[derive(Debug, Clone)]
pub struct ResourceView<T> {
    label: &'static str,
    state: ResourceState<T>,
}

impl<T> ResourceView<T> {
    /// New idle view for the named resource.
    #[must_use]
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            state: ResourceState::Idle,
        }
    }

    /// Mark a call as started.
    pub fn begin(&mut self) {
        self.state = ResourceState::Loading;
    }

    /// Fold a call outcome into the view.
    pub fn apply(&mut self, outcome: CallOutcome<T>, placeholder: Option<T>) -> &ResourceState<T> {
        let label = self.label;
        self.state = match outcome {
            CallOutcome::Success { data } => ResourceState::Ready { data },
            CallOutcome::Unauthenticated => ResourceState::SignInRequired,
            CallOutcome::Forbidden => ResourceState::Denied {
                message: format!("You do not have permission to view {label}."),
            },
            failure => {
                let reason = failure
                    .failure_message()
                    .unwrap_or_else(|| "request failed".to_string());
                tracing::debug!(resource = label, %reason, "resource call failed");
                match placeholder {
                    Some(data) => ResourceState::Stale { data, reason },
                    None => ResourceState::Failed { message: reason },
                }
            }
        };
        &self.state
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &ResourceState<T> {
        &self.state
    }

    /// Resource label given at construction.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Consume the view, keeping its state.
    #[must_use]
    pub fn into_state(self) -> ResourceState<T> {
        self.state
    }

    /// Data to render, live or placeholder.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match &self.state {
            ResourceState::Ready { data } | ResourceState::Stale { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Whether the view is showing placeholder data.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self.state, ResourceState::Stale { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::placeholder_gifts;

    #[test]
    fn forbidden_never_shows_placeholder() {
        let mut view = ResourceView::new("gifts");
        view.begin();
        view.apply(CallOutcome::Forbidden, Some(placeholder_gifts()));
        assert!(matches!(view.state(), ResourceState::Denied { .. }));
        assert!(view.data().is_none());

        view.apply(CallOutcome::Unauthenticated, Some(placeholder_gifts()));
        assert_eq!(view.state(), &ResourceState::SignInRequired);
    }

    #[test]
    fn transport_failure_falls_back_to_placeholder() {
        let mut view = ResourceView::new("gifts");
        view.apply(
            CallOutcome::NetworkFailure {
                detail: "connection refused".into(),
            },
            Some(placeholder_gifts()),
        );
        assert!(view.is_stale());
        assert_eq!(view.data().map(Vec::len), Some(3));

        view.apply(
            CallOutcome::ServerFailure {
                status: 502,
                detail: "bad gateway".into(),
            },
            None,
        );
        assert_eq!(
            view.state(),
            &ResourceState::Failed {
                message: "server error 502: bad gateway".into()
            }
        );
    }

    #[test]
    fn success_replaces_stale_data() {
        let mut view = ResourceView::new("gifts");
        view.apply(
            CallOutcome::NetworkFailure { detail: "reset".into() },
            Some(placeholder_gifts()),
        );
        view.apply(CallOutcome::success(Vec::new()), Some(placeholder_gifts()));
        assert!(!view.is_stale());
        assert_eq!(view.data().map(Vec::len), Some(0));
    }
}
