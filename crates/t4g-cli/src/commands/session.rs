use anyhow::anyhow;
use t4g_config::{ConfigError, GatewayConfig};
use t4g_gateway::provider::{authorize_url, logout_url, random_state};
use t4g_gateway::{AccessDecision, CallbackParams, PageRequirement, decide, denial_message};
use url::Url;

use crate::cli::OutputFormat;
use crate::client::{AppContext, CliError, CliResult, SIGN_IN_HINT};
use crate::output::render_session;

pub(crate) fn handle_status(
    ctx: &AppContext,
    require: Option<PageRequirement>,
    format: OutputFormat,
) -> CliResult<()> {
    let snapshot = ctx.session.snapshot();
    render_session(&snapshot, format)?;
    let Some(requirement) = require else {
        return Ok(());
    };
    match decide(&snapshot, requirement) {
        AccessDecision::ShowContent => Ok(()),
        AccessDecision::ShowSignIn => Err(CliError::validation(format!(
            "sign-in required; {SIGN_IN_HINT}"
        ))),
        AccessDecision::ShowForbidden => {
            Err(CliError::validation(denial_message(&snapshot, requirement)))
        }
        AccessDecision::ShowLoading => Err(CliError::failure(anyhow!(
            "session state is not known yet"
        ))),
    }
}

pub(crate) async fn handle_login(ctx: &AppContext) -> CliResult<()> {
    let config = load_provider_config()?;
    ctx.session
        .sign_in()
        .await
        .map_err(|err| CliError::failure(anyhow!(err.describe())))?;
    let state = random_state();
    let url = authorize_url(&config.identity, &state)
        .map_err(|err| CliError::validation(err.describe()))?;
    println!("Open this URL in a browser to sign in:");
    println!("{url}");
    println!("state: {state}");
    Ok(())
}

pub(crate) async fn handle_callback(
    ctx: &AppContext,
    url: &Url,
    format: OutputFormat,
) -> CliResult<()> {
    let params = CallbackParams::from_url(url);
    let snapshot = ctx.session.complete_sign_in(params).await;
    render_session(&snapshot, format)?;
    if snapshot.is_authenticated() {
        Ok(())
    } else {
        Err(CliError::validation(
            snapshot
                .last_error()
                .unwrap_or("login did not complete")
                .to_string(),
        ))
    }
}

pub(crate) async fn handle_logout(ctx: &AppContext, return_to: Option<Url>) -> CliResult<()> {
    ctx.session.sign_out().await;
    println!("Signed out.");

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::debug!(error = %describe_config_error(&err), "skipping provider logout URL");
            return Ok(());
        }
    };
    let return_to = return_to.unwrap_or_else(|| site_root(&config.identity.redirect_uri));
    let url = logout_url(&config.identity, &return_to)
        .map_err(|err| CliError::validation(err.describe()))?;
    println!("To end the provider session, open:");
    println!("{url}");
    Ok(())
}

fn load_provider_config() -> CliResult<GatewayConfig> {
    GatewayConfig::from_env().map_err(|err| {
        CliError::validation(format!(
            "identity provider is not configured: {}",
            describe_config_error(&err)
        ))
    })
}

fn describe_config_error(err: &ConfigError) -> String {
    match err {
        ConfigError::MissingEnv { name } => format!("{name} is not set"),
        ConfigError::InvalidValue { name, reason, .. } => format!("{name} is invalid ({reason})"),
    }
}

fn site_root(redirect_uri: &Url) -> Url {
    let mut root = redirect_uri.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context_for;
    use httpmock::MockServer;
    use t4g_gateway::SessionStatus;
    use t4g_test_support::fixtures::{admin_claims, jwt_for, viewer_claims};

    #[tokio::test]
    async fn status_requirement_uses_the_gate() {
        let server = MockServer::start_async().await;

        let admin = context_for(&server, Some(&admin_claims())).await;
        handle_status(&admin, Some(PageRequirement::RequireAdmin), OutputFormat::Table)
            .expect("admin passes");

        let viewer = context_for(&server, Some(&viewer_claims())).await;
        let err = handle_status(&viewer, Some(PageRequirement::RequireAdmin), OutputFormat::Json)
            .expect_err("viewer is denied");
        assert!(matches!(err, CliError::Validation(ref message) if message.contains("administrator privileges")));
        handle_status(&viewer, Some(PageRequirement::RequireAuth), OutputFormat::Table)
            .expect("viewer is signed in");

        let anonymous = context_for(&server, None).await;
        let err = handle_status(&anonymous, Some(PageRequirement::RequireAuth), OutputFormat::Table)
            .expect_err("sign-in required");
        assert_eq!(err.exit_code(), 2);
        handle_status(&anonymous, None, OutputFormat::Table).expect("plain status succeeds");
    }

    #[tokio::test]
    async fn callback_with_id_token_signs_in() {
        let server = MockServer::start_async().await;
        let ctx = context_for(&server, None).await;
        let url = Url::parse(&format!(
            "http://localhost:5173/callback#id_token={}&state=abc",
            jwt_for(&admin_claims())
        ))
        .expect("callback url");

        handle_callback(&ctx, &url, OutputFormat::Table)
            .await
            .expect("callback completes");
        assert_eq!(ctx.session.snapshot().status(), SessionStatus::Authenticated);
        assert!(ctx.session.is_admin());
    }

    #[tokio::test]
    async fn rejected_callback_reports_provider_error() {
        let server = MockServer::start_async().await;
        let ctx = context_for(&server, None).await;
        let url = Url::parse("http://localhost:5173/callback?error=access_denied")
            .expect("callback url");

        let err = handle_callback(&ctx, &url, OutputFormat::Table)
            .await
            .expect_err("rejected");
        assert!(err.to_string().contains("access_denied"));
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let server = MockServer::start_async().await;
        let ctx = context_for(&server, Some(&admin_claims())).await;

        handle_logout(&ctx, None).await.expect("logout succeeds");
        assert!(!ctx.session.snapshot().is_authenticated());
    }

    #[test]
    fn site_root_drops_callback_path() {
        let url = Url::parse("https://app.t4g.space/callback?x=1").expect("url");
        assert_eq!(site_root(&url).as_str(), "https://app.t4g.space/");
    }
}
