//! Command handlers grouped by concern.

pub(crate) mod challenges;
pub(crate) mod gifts;
pub(crate) mod session;
pub(crate) mod tenant;

use anyhow::anyhow;
use t4g_gateway::{ResourceState, ResourceView};

use crate::client::{CliError, CliResult, SIGN_IN_HINT};

/// Resolve a settled list view into data to render, warning when it is sample data.
pub(crate) fn settle_view<T>(view: ResourceView<T>) -> CliResult<T> {
    let label = view.label();
    match view.into_state() {
        ResourceState::Ready { data } => Ok(data),
        ResourceState::Stale { data, reason } => {
            eprintln!("warning: showing sample {label}; live data unavailable ({reason})");
            Ok(data)
        }
        ResourceState::Failed { message } => Err(CliError::failure(anyhow!("list {label}: {message}"))),
        ResourceState::Denied { message } => Err(CliError::validation(message)),
        ResourceState::SignInRequired => Err(CliError::validation(format!(
            "list {label}: sign-in required; {SIGN_IN_HINT}"
        ))),
        ResourceState::Idle | ResourceState::Loading => Err(CliError::failure(anyhow!(
            "list {label}: no response was recorded"
        ))),
    }
}
