use t4g_api_models::{Challenge, ChallengeDraft, ResourceId};
use t4g_gateway::{ResourceView, placeholder_challenges};

use crate::cli::OutputFormat;
use crate::client::{AppContext, CliResult, expect_success};
use crate::commands::settle_view;
use crate::output::{render_challenge, render_challenges, render_delete};

pub(crate) async fn handle_list(
    ctx: &AppContext,
    placeholder: bool,
    format: OutputFormat,
) -> CliResult<()> {
    let mut view: ResourceView<Vec<Challenge>> = ResourceView::new("challenges");
    view.begin();
    view.apply(
        ctx.mediator.list_challenges().await,
        placeholder.then(placeholder_challenges),
    );
    let challenges = settle_view(view)?;
    render_challenges(&challenges, format)
}

pub(crate) async fn handle_create(
    ctx: &AppContext,
    draft: ChallengeDraft,
    format: OutputFormat,
) -> CliResult<()> {
    let challenge = expect_success(
        ctx.mediator.create_challenge(&draft).await,
        "create challenge",
    )?;
    render_challenge(&challenge, format)
}

pub(crate) async fn handle_update(
    ctx: &AppContext,
    id: &ResourceId,
    draft: ChallengeDraft,
    format: OutputFormat,
) -> CliResult<()> {
    let challenge = expect_success(
        ctx.mediator.update_challenge(id, &draft).await,
        "update challenge",
    )?;
    render_challenge(&challenge, format)
}

pub(crate) async fn handle_delete(
    ctx: &AppContext,
    id: &ResourceId,
    format: OutputFormat,
) -> CliResult<()> {
    let ack = expect_success(ctx.mediator.delete_challenge(id).await, "delete challenge")?;
    render_delete(&format!("challenge {id}"), ack, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CliError;
    use crate::commands::test_support::context_for;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::net::TcpListener;
    use t4g_api_models::ChallengeStatus;
    use t4g_test_support::fixtures::admin_claims;

    #[tokio::test]
    async fn unreachable_api_uses_placeholder_only_when_asked() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
            listener.local_addr().expect("local addr").port()
        };
        let server = MockServer::start_async().await;
        let mut ctx = context_for(&server, Some(&admin_claims())).await;
        ctx.mediator = t4g_gateway::Mediator::new(
            ctx.session.clone(),
            reqwest::Client::new(),
            format!("http://127.0.0.1:{port}/api").parse().expect("url"),
        );

        handle_list(&ctx, true, OutputFormat::Table)
            .await
            .expect("placeholder rendered");
        let err = handle_list(&ctx, false, OutputFormat::Table)
            .await
            .expect_err("no placeholder");
        assert!(matches!(err, CliError::Failure(_)));
    }

    #[tokio::test]
    async fn update_sends_status_change() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/tenants/challenges/3")
                .json_body(json!({"status": "completed", "reward": "$750"}));
            then.status(200).json_body(json!({
                "id": 3,
                "title": "New User Acquisition",
                "status": "completed",
                "participants": 67,
                "reward": "$750",
                "progress": 100
            }));
        });
        let ctx = context_for(&server, Some(&admin_claims())).await;
        let draft = ChallengeDraft {
            status: Some(ChallengeStatus::Completed),
            reward: Some("$750".into()),
            ..ChallengeDraft::default()
        };

        handle_update(&ctx, &ResourceId::from(3_u64), draft, OutputFormat::Json)
            .await
            .expect("challenge updated");
        mock.assert();
    }

    #[tokio::test]
    async fn delete_reports_server_outage_as_failure() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/api/tenants/challenges/3");
            then.status(503).body("maintenance window");
        });
        let ctx = context_for(&server, Some(&admin_claims())).await;

        let err = handle_delete(&ctx, &ResourceId::from(3_u64), OutputFormat::Table)
            .await
            .expect_err("outage");
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("maintenance window"));
    }
}
