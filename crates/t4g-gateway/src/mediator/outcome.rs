//! Tagged outcome of a mediated API call.

use serde::Serialize;

/// Result of one authorized resource call.
///
/// Failures are reported faithfully; choosing fallback data is the caller's job.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CallOutcome<T> {
    /// 2xx with a decoded body.
    Success {
        /// Decoded response body.
        data: T,
    },
    /// No session, no credential, 401, or the session ended mid-call.
    Unauthenticated,
    /// 403: signed in but lacking the role.
    Forbidden,
    /// The request never produced a response.
    NetworkFailure {
        /// Transport failure detail.
        detail: String,
    },
    /// Any other non-2xx status, or an undecodable 2xx body.
    ServerFailure {
        /// HTTP status code.
        status: u16,
        /// Message derived from the response body.
        detail: String,
    },
}

impl<T> CallOutcome<T> {
    /// Wrap a successful payload.
    pub const fn success(data: T) -> Self {
        Self::Success { data }
    }

    /// Whether the call succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether repeating the same call could plausibly succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkFailure { .. })
    }

    /// Transform the success payload.
    pub fn map<U, F>(self, transform: F) -> CallOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success { data } => CallOutcome::Success {
                data: transform(data),
            },
            Self::Unauthenticated => CallOutcome::Unauthenticated,
            Self::Forbidden => CallOutcome::Forbidden,
            Self::NetworkFailure { detail } => CallOutcome::NetworkFailure { detail },
            Self::ServerFailure { status, detail } => CallOutcome::ServerFailure { status, detail },
        }
    }

    /// Chain a fallible step onto the success payload.
    pub fn and_then<U, F>(self, next: F) -> CallOutcome<U>
    where
        F: FnOnce(T) -> CallOutcome<U>,
    {
        match self {
            Self::Success { data } => next(data),
            Self::Unauthenticated => CallOutcome::Unauthenticated,
            Self::Forbidden => CallOutcome::Forbidden,
            Self::NetworkFailure { detail } => CallOutcome::NetworkFailure { detail },
            Self::ServerFailure { status, detail } => CallOutcome::ServerFailure { status, detail },
        }
    }

    /// Success payload, when present.
    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success { data } => Some(data),
            _ => None,
        }
    }

    /// Human-readable description of a failure; `None` on success.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::Unauthenticated => Some("sign-in required".to_string()),
            Self::Forbidden => Some("access denied".to_string()),
            Self::NetworkFailure { detail } => Some(format!("network failure: {detail}")),
            Self::ServerFailure { status, detail } => {
                Some(format!("server error {status}: {detail}"))
            }
        }
    }
}
