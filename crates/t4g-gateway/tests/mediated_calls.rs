//! Mediator behaviour against a mock resource API.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use reqwest::Client;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use t4g_api_models::{ChallengeDraft, ChallengeStatus, DeleteAck, GiftDraft, ResourceId};
use t4g_gateway::{
    CallOutcome, CredentialError, Mediator, ResourceState, ResourceView, SessionStore,
    placeholder_challenges, placeholder_gifts,
};
use t4g_test_support::ScriptedCredentialSource;
use t4g_test_support::fixtures::{admin_claims, viewer_claims};
use url::Url;

const TOKEN: &str = "tok-123";

fn api_url(server: &MockServer) -> Url {
    Url::parse(&server.url("/api")).expect("mock url")
}

async fn signed_in_mediator(
    source: ScriptedCredentialSource,
    base_url: Url,
) -> (Mediator, Arc<ScriptedCredentialSource>) {
    let source = Arc::new(source);
    let store = SessionStore::new(source.clone());
    store.initialize().await;
    (Mediator::new(store, Client::new(), base_url), source)
}

fn gift_json(id: u64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": "",
        "value": 10.0,
        "category": "Misc",
        "isActive": true
    })
}

#[tokio::test]
async fn unauthenticated_session_never_reaches_network() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.any_request();
        then.status(200).json_body(json!([]));
    });
    let source = Arc::new(ScriptedCredentialSource::signed_out());
    let store = SessionStore::new(source.clone());
    store.initialize().await;
    let mediator = Mediator::new(store, Client::new(), api_url(&server));

    assert_eq!(mediator.list_gifts().await, CallOutcome::Unauthenticated);
    assert_eq!(
        mediator.delete_gift(&ResourceId::from(1_u64)).await,
        CallOutcome::Unauthenticated
    );

    mock.assert_hits(0);
    assert_eq!(source.token_requests(), 0);
}

#[tokio::test]
async fn calls_before_initialize_are_unauthenticated() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.any_request();
        then.status(200);
    });
    let store = SessionStore::new(Arc::new(ScriptedCredentialSource::signed_in(admin_claims())));
    let mediator = Mediator::new(store, Client::new(), api_url(&server));

    assert_eq!(mediator.tenant_profile().await, CallOutcome::Unauthenticated);
    mock.assert_hits(0);
}

#[tokio::test]
async fn token_failure_is_session_level() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.any_request();
        then.status(200).json_body(json!([]));
    });
    let (mediator, source) = signed_in_mediator(
        ScriptedCredentialSource::signed_in(admin_claims())
            .with_token_failure(CredentialError::SilentAuthFailure),
        api_url(&server),
    )
    .await;

    assert_eq!(mediator.list_challenges().await, CallOutcome::Unauthenticated);
    assert_eq!(source.token_requests(), 1);
    mock.assert_hits(0);
}

#[tokio::test]
async fn requests_carry_credentials_and_json_headers() {
    let server = MockServer::start_async().await;
    let list = server.mock(|when, then| {
        when.method(GET)
            .path("/api/tenants/gifts")
            .header("authorization", format!("Bearer {TOKEN}"))
            .header("accept", "application/json")
            .header_exists("x-request-id");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!([gift_json(1, "Mug"), gift_json(2, "Tote")]));
    });
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/api/tenants/gifts")
            .header("authorization", format!("Bearer {TOKEN}"))
            .header("content-type", "application/json")
            .json_body(json!({"name": "Scarf", "value": 12.5}));
        then.status(201).json_body(gift_json(3, "Scarf"));
    });
    let (mediator, _) = signed_in_mediator(
        ScriptedCredentialSource::signed_in(admin_claims()).with_token(TOKEN),
        api_url(&server),
    )
    .await;

    let gifts = mediator.list_gifts().await.into_success().expect("gift list");
    assert_eq!(gifts.len(), 2);
    assert_eq!(gifts[0].id.as_str(), "1");

    let draft = GiftDraft {
        name: Some("Scarf".into()),
        value: Some(12.5),
        ..GiftDraft::default()
    };
    let created = mediator.create_gift(&draft).await.into_success().expect("created gift");
    assert_eq!(created.name, "Scarf");

    list.assert();
    create.assert();
}

#[tokio::test]
async fn update_and_delete_address_the_resource_id() {
    let server = MockServer::start_async().await;
    let update = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/tenants/challenges/ch-7")
            .json_body(json!({"status": "completed"}));
        then.status(200).json_body(json!({
            "id": "ch-7",
            "title": "Spring Push",
            "status": "completed",
            "progress": 100
        }));
    });
    let delete_empty = server.mock(|when, then| {
        when.method(DELETE).path("/api/tenants/challenges/ch-7");
        then.status(204);
    });
    let delete_acked = server.mock(|when, then| {
        when.method(DELETE).path("/api/tenants/gifts/9");
        then.status(200).json_body(json!({"success": true}));
    });
    let (mediator, _) = signed_in_mediator(
        ScriptedCredentialSource::signed_in(admin_claims()),
        api_url(&server),
    )
    .await;
    let id = ResourceId::parse("ch-7").expect("valid id");

    let updated = mediator
        .update_challenge(
            &id,
            &ChallengeDraft {
                status: Some(ChallengeStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .into_success()
        .expect("updated challenge");
    assert_eq!(updated.status, ChallengeStatus::Completed);

    assert_eq!(
        mediator.delete_challenge(&id).await,
        CallOutcome::success(DeleteAck { success: true })
    );
    assert!(mediator.delete_gift(&ResourceId::from(9_u64)).await.is_success());

    update.assert();
    delete_empty.assert();
    delete_acked.assert();
}

#[tokio::test]
async fn forbidden_shows_denied_instead_of_data() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/api/tenants/gifts");
        then.status(403).json_body(json!({"gifts": []}));
    });
    let (mediator, _) = signed_in_mediator(
        ScriptedCredentialSource::signed_in(viewer_claims()),
        api_url(&server),
    )
    .await;
    let mut view = ResourceView::new("gifts");

    view.begin();
    let outcome = mediator.list_gifts().await;
    assert_eq!(outcome, CallOutcome::Forbidden);
    view.apply(outcome, Some(placeholder_gifts()));

    assert!(matches!(view.state(), ResourceState::Denied { .. }));
    assert!(view.data().is_none());
}

#[tokio::test]
async fn unauthorized_status_maps_to_unauthenticated() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/api/tenants/profile");
        then.status(401).json_body(json!({"title": "expired", "status": 401}));
    });
    let (mediator, _) = signed_in_mediator(
        ScriptedCredentialSource::signed_in(admin_claims()),
        api_url(&server),
    )
    .await;

    assert_eq!(mediator.tenant_profile().await, CallOutcome::Unauthenticated);
}

/// Serve one response whose body is cut short of its declared length.
async fn truncated_response_server(status_line: &'static str) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        let mut chunk = [0_u8; 1024];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            let read = stream.read(&mut chunk).await.expect("read request");
            if read == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..read]);
        }
        let head = format!(
            "{status_line}\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n{{\"tit"
        );
        stream.write_all(head.as_bytes()).await.expect("write response");
        stream.shutdown().await.expect("close");
    });
    Url::parse(&format!("http://127.0.0.1:{port}/api")).expect("url")
}

#[tokio::test]
async fn auth_statuses_ignore_unreadable_bodies() {
    for (status_line, expected) in [
        ("HTTP/1.1 401 Unauthorized", CallOutcome::Unauthenticated),
        ("HTTP/1.1 403 Forbidden", CallOutcome::Forbidden),
    ] {
        let base = truncated_response_server(status_line).await;
        let (mediator, _) =
            signed_in_mediator(ScriptedCredentialSource::signed_in(admin_claims()), base).await;

        assert_eq!(mediator.list_gifts().await, expected, "{status_line}");
    }
}

#[tokio::test]
async fn server_failures_carry_problem_detail() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/api/tenants/dashboard/analytics");
        then.status(500)
            .header("content-type", "application/problem+json")
            .json_body(json!({
                "type": "about:blank",
                "title": "Internal Server Error",
                "status": 500,
                "detail": "analytics warehouse unavailable"
            }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/tenants/profile");
        then.status(200).body("<html>not json</html>");
    });
    let (mediator, _) = signed_in_mediator(
        ScriptedCredentialSource::signed_in(admin_claims()),
        api_url(&server),
    )
    .await;

    assert_eq!(
        mediator.dashboard_analytics().await,
        CallOutcome::ServerFailure {
            status: 500,
            detail: "analytics warehouse unavailable".into()
        }
    );
    let malformed = mediator.tenant_profile().await;
    assert!(
        matches!(&malformed, CallOutcome::ServerFailure { status: 200, detail } if detail.starts_with("malformed response body")),
        "{malformed:?}"
    );
    assert!(!malformed.is_retryable());
}

#[tokio::test]
async fn unreachable_api_falls_back_to_stale_placeholder() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        listener.local_addr().expect("local addr").port()
    };
    let base = Url::parse(&format!("http://127.0.0.1:{port}/api")).expect("url");
    let (mediator, _) =
        signed_in_mediator(ScriptedCredentialSource::signed_in(admin_claims()), base).await;
    let mut view = ResourceView::new("challenges");

    let outcome = mediator.list_challenges().await;
    assert!(matches!(outcome, CallOutcome::NetworkFailure { .. }), "{outcome:?}");
    assert!(outcome.is_retryable());
    view.apply(outcome, Some(placeholder_challenges()));

    assert!(view.is_stale());
    assert_eq!(view.data().map(Vec::len), Some(3));
}

#[tokio::test]
async fn response_after_sign_out_is_discarded() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/tenants/gifts");
        then.status(200)
            .json_body(json!([gift_json(1, "Mug")]))
            .delay(Duration::from_millis(300));
    });
    let (mediator, _) = signed_in_mediator(
        ScriptedCredentialSource::signed_in(admin_claims()),
        api_url(&server),
    )
    .await;

    let (outcome, ended) = tokio::join!(mediator.list_gifts(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        mediator.session().sign_out().await
    });

    assert_eq!(outcome, CallOutcome::Unauthenticated);
    assert!(!ended.is_authenticated());
    mock.assert();
}
