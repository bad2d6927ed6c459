use t4g_api_models::TenantProfilePatch;

use crate::cli::OutputFormat;
use crate::client::{AppContext, CliError, CliResult, expect_success};
use crate::output::{render_analytics, render_profile};

pub(crate) async fn handle_profile_show(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let profile = expect_success(ctx.mediator.tenant_profile().await, "fetch profile")?;
    render_profile(&profile, format)
}

pub(crate) async fn handle_profile_update(
    ctx: &AppContext,
    patch: TenantProfilePatch,
    format: OutputFormat,
) -> CliResult<()> {
    if patch == TenantProfilePatch::default() {
        return Err(CliError::validation(
            "nothing to update; pass --business-name or --contact-email",
        ));
    }
    let profile = expect_success(
        ctx.mediator.update_tenant_profile(&patch).await,
        "update profile",
    )?;
    render_profile(&profile, format)
}

pub(crate) async fn handle_analytics(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let mut analytics =
        expect_success(ctx.mediator.dashboard_analytics().await, "fetch analytics")?;
    if !analytics.is_reverse_chronological() {
        tracing::debug!("activity feed arrived out of order; re-sorting");
        analytics.sort_recent_activity();
    }
    render_analytics(&analytics, format)
}
