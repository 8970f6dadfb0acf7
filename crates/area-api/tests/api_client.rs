//! ApiClient against an in-process mock of the AREA server.

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::oneshot;

use area_api::{
    AreaApi, ApiClient, CallbackListener, Credentials, LogStream, LogStreamEvent, Session,
};
use area_core::{
    AddAreaRequest, ApiFailure, AreaType, AuthMode, DraftField, DraftRemoval, Error,
    PasswordCredentials,
};

const TOKEN: &str = "good-token";

struct MockServer {
    base: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

fn unauthorized() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"code": 401, "error": "Unauthorized"})),
    )
        .into_response()
}

fn ok(data: Value) -> axum::response::Response {
    Json(json!({"code": 200, "data": data})).into_response()
}

async fn spawn_mock(applets_empty: bool) -> MockServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let api = Router::new()
        .route(
            "/about.json",
            get(|headers: HeaderMap| async move {
                // A token, when sent, must be valid
                if headers.contains_key("authorization") && bearer(&headers) != Some(TOKEN) {
                    return unauthorized();
                }
                Json(json!({
                    "client": {"host": "127.0.0.1"},
                    "server": {
                        "current_time": "2026-10-15T10:00:00+02:00",
                        "services": [{
                            "name": "discord",
                            "description": "Chat",
                            "actions": [],
                            "reactions": [{"name": "send_message", "store": {
                                "req:channel": {"type": "select_uri", "values": ["/guilds/${req:guild}/channels"], "required": true, "priority": 2}
                            }}]
                        }],
                        "authenticators": null
                    }
                }))
                .into_response()
            }),
        )
        .route(
            "/auth/{mode}",
            axum::routing::post(|Path(mode): Path<String>, Json(body): Json<Value>| async move {
                if mode == "login" && body["email"] == "alice@example.com" {
                    ok(json!({"token": TOKEN}))
                } else {
                    unauthorized()
                }
            }),
        )
        .route(
            "/applet",
            get(move |headers: HeaderMap| async move {
                if bearer(&headers) != Some(TOKEN) {
                    return unauthorized();
                }
                if applets_empty {
                    return StatusCode::NO_CONTENT.into_response();
                }
                ok(json!({"applets": [{
                    "id": "a1", "name": "Ping", "description": "d", "public": false,
                    "action": "timer;every_minute", "active": true, "status": "running"
                }]}))
            }),
        )
        .route(
            "/store",
            get(|headers: HeaderMap| async move {
                if headers.contains_key("authorization") {
                    return (StatusCode::BAD_REQUEST, "store is public").into_response();
                }
                ok(json!({"applets": null}))
            }),
        )
        .route(
            "/applet/new",
            put(|Json(body): Json<Value>| async move {
                if body["area_item"] == "bad" {
                    return (
                        StatusCode::NOT_ACCEPTABLE,
                        Json(json!({"code": 406, "data": {"req:channel": false, "req:message": true}})),
                    )
                        .into_response();
                }
                if body.get("area_settings").is_some() {
                    return ok(json!({"message": "Area added with settings"}));
                }
                ok(json!({"message": "Area added"}))
            })
            .get(|Query(query): Query<HashMap<String, String>>| async move {
                match query.get("field").map(String::as_str) {
                    Some("reactions") => ok(json!({"reactions": []})),
                    None => ok(json!({
                        "action": {"type": "action", "service": "timer", "name": "every_minute", "store": null},
                        "reactions": null
                    })),
                    Some(other) => ok(json!({"unexpected": other})),
                }
            })
            .delete(|Query(query): Query<HashMap<String, String>>| async move {
                let number = query.get("number").cloned().unwrap_or_default();
                let kind = query.get("type").cloned().unwrap_or_default();
                ok(json!({"message": format!("removed {kind} {number}")}))
            }),
        )
        .route(
            "/applet/{id}/start",
            put(|Path(id): Path<String>| async move { ok(json!({"message": format!("{id} started")})) }),
        )
        .route(
            "/applet/{id}",
            axum::routing::delete(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"code": 500, "error": "Internal server error"})),
                )
            }),
        )
        .route(
            "/services/webhook/api/{name}",
            axum::routing::post(
                |Path(name): Path<String>, headers: HeaderMap, body: String| async move {
                    if bearer(&headers) != Some(TOKEN) {
                        return unauthorized();
                    }
                    let content_type = headers
                        .get("content-type")
                        .and_then(|value| value.to_str().ok());
                    if content_type != Some("text/plain") {
                        return (StatusCode::BAD_REQUEST, "expected text").into_response();
                    }
                    ok(json!({"message": format!("{name} received {body}")}))
                },
            ),
        )
        .route(
            "/services/{service}/api/guilds/{guild}/channels",
            get(|Path((service, guild)): Path<(String, String)>| async move {
                ok(json!({
                    "data": [
                        {"name": format!("{service}-{guild}-general"), "id": "1"},
                        {"name": "random", "id": "2"}
                    ],
                    "fields": ["name", "id"]
                }))
            }),
        );

    let app = Router::new().nest("/api", api);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    MockServer {
        base: format!("http://127.0.0.1:{port}/api"),
        shutdown_tx: Some(shutdown_tx),
    }
}

fn client(server: &MockServer, token: Option<&str>) -> ApiClient {
    let session = Session::in_memory();
    if let Some(token) = token {
        session.set_token(token).unwrap();
    }
    ApiClient::new(&server.base, session).unwrap()
}

#[tokio::test]
async fn test_about_is_not_enveloped() {
    let server = spawn_mock(false).await;
    let about = client(&server, None).about().await.unwrap();

    assert_eq!(about.client.host, "127.0.0.1");
    assert_eq!(about.server.services.len(), 1);
    assert!(about.server.authenticators.is_empty());
    assert!(about.server.current_time.is_some());
}

#[tokio::test]
async fn test_about_sends_the_session_token() {
    let server = spawn_mock(false).await;
    let about = client(&server, Some(TOKEN)).about().await.unwrap();
    assert_eq!(about.server.services.len(), 1);

    let err = client(&server, Some("stale")).about().await.unwrap_err();
    assert_eq!(err.api_failure(), Some(&ApiFailure::Unauthorized));
}

#[tokio::test]
async fn test_login_returns_token() {
    let server = spawn_mock(false).await;
    let api = client(&server, None);
    let credentials = Credentials::Password(PasswordCredentials::new("alice@example.com", "pw"));

    let token = api
        .authenticate(credentials.mode(false), credentials)
        .await
        .unwrap();
    assert_eq!(token, TOKEN);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = spawn_mock(false).await;
    let applets = client(&server, Some(TOKEN)).applets().await.unwrap();
    assert_eq!(applets.len(), 1);
    assert!(applets[0].status.is_running());
    assert_eq!(applets[0].action_service(), "timer");
}

#[tokio::test]
async fn test_unauthorized_is_explicit_and_leaves_session_alone() {
    let server = spawn_mock(false).await;
    let api = client(&server, Some("stale"));

    let err = api.applets().await.unwrap_err();
    assert_eq!(err.api_failure(), Some(&ApiFailure::Unauthorized));
    // Clearing the token is the application's decision
    assert!(api.session().is_authenticated());

    let err = client(&server, None)
        .authenticate(
            AuthMode::Login,
            Credentials::Password(PasswordCredentials::new("mallory@example.com", "pw")),
        )
        .await
        .unwrap_err();
    assert_eq!(err.api_failure(), Some(&ApiFailure::Unauthorized));
}

#[tokio::test]
async fn test_no_content_applets_is_empty_list() {
    let server = spawn_mock(true).await;
    let applets = client(&server, Some(TOKEN)).applets().await.unwrap();
    assert!(applets.is_empty());
}

#[tokio::test]
async fn test_store_is_anonymous() {
    let server = spawn_mock(false).await;
    let store = client(&server, Some(TOKEN)).store().await.unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_draft_round() {
    let server = spawn_mock(false).await;
    let api = client(&server, Some(TOKEN));

    let draft = api.draft(DraftField::All).await.unwrap();
    assert_eq!(draft.action.as_ref().map(|a| a.name.as_str()), Some("every_minute"));
    assert!(draft.reactions.is_empty());
    assert!(!draft.is_complete());

    let reactions = api.draft(DraftField::Reactions).await.unwrap();
    assert!(reactions.action.is_none());

    let message = api
        .add_draft_area(AddAreaRequest {
            service: "timer".to_string(),
            area_type: AreaType::Action,
            area_item: "every_minute".to_string(),
            area_settings: None,
        })
        .await
        .unwrap();
    assert_eq!(message, "Area added");

    let message = api.remove_draft_area(DraftRemoval::Reaction(1)).await.unwrap();
    assert_eq!(message, "removed reaction 1");
}

#[tokio::test]
async fn test_not_acceptable_lists_invalid_fields() {
    let server = spawn_mock(false).await;
    let err = client(&server, Some(TOKEN))
        .add_draft_area(AddAreaRequest {
            service: "discord".to_string(),
            area_type: AreaType::Reaction,
            area_item: "bad".to_string(),
            area_settings: None,
        })
        .await
        .unwrap_err();

    let failure = err.api_failure().unwrap();
    assert_eq!(failure.invalid_fields(), vec!["req:channel"]);
}

#[tokio::test]
async fn test_generic_failure_carries_payload() {
    let server = spawn_mock(false).await;
    let err = client(&server, Some(TOKEN)).delete_applet("a1").await.unwrap_err();

    match err {
        Error::Api(ApiFailure::Rejected { status, payload }) => {
            assert_eq!(status, 500);
            assert_eq!(payload["error"], "Internal server error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_start_uses_put() {
    let server = spawn_mock(false).await;
    let message = client(&server, Some(TOKEN)).start_applet("a1").await.unwrap();
    assert_eq!(message, "a1 started");
}

#[tokio::test]
async fn test_service_options_through_proxy() {
    let server = spawn_mock(false).await;
    let options = client(&server, Some(TOKEN))
        .service_options("discord", "/guilds/42/channels")
        .await
        .unwrap();

    assert_eq!(options.len(), 2);
    assert_eq!(options[0].label, "discord-42-general");
    assert_eq!(options[0].value, "1");
}

#[tokio::test]
async fn test_webhook_posts_plain_text_message() {
    let server = spawn_mock(false).await;
    let message = client(&server, Some(TOKEN))
        .trigger_webhook("Deploy", "ship it")
        .await
        .unwrap();
    assert_eq!(message, "Deploy received ship it");
}

#[tokio::test]
async fn test_transport_failure_when_server_is_gone() {
    let server = spawn_mock(false).await;
    let api = client(&server, Some(TOKEN));
    drop(server);
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = api.applets().await.unwrap_err();
    assert!(matches!(err, Error::Api(ApiFailure::Transport(_))));
}

// ── OAuth callback ───────────────────────────────────────────────

#[tokio::test]
async fn test_callback_requires_matching_state() {
    let listener = CallbackListener::bind("http://127.0.0.1:0").await.unwrap();
    let redirect = listener.redirect_uri().to_string();
    let state = listener.state().to_string();
    let waiter = tokio::spawn(listener.wait(Duration::from_secs(5)));

    let http = reqwest::Client::new();
    let response = http
        .get(format!("{redirect}/?state=forged&code=evil"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = http
        .get(format!("{redirect}/?state={state}&code=the-code"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let received = waiter.await.unwrap().unwrap();
    assert_eq!(received.code, "the-code");
    assert_eq!(received.redirect_uri, redirect);

    let exchange = received.into_exchange("github");
    assert_eq!(exchange.authenticator, "github");
}

#[tokio::test]
async fn test_callback_denied_by_provider() {
    let listener = CallbackListener::bind("http://127.0.0.1:0").await.unwrap();
    let url = format!(
        "{}/?state={}&error=access_denied",
        listener.redirect_uri(),
        listener.state()
    );
    let waiter = tokio::spawn(listener.wait(Duration::from_secs(5)));

    reqwest::get(url).await.unwrap();
    let err = waiter.await.unwrap().unwrap_err();
    assert!(matches!(err, Error::OAuth { .. }));
}

// ── Log stream ───────────────────────────────────────────────────

#[tokio::test]
async fn test_log_stream_forwards_frames_then_closes() {
    use futures_util::SinkExt;
    use tokio_tungstenite::tungstenite::Message;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        ws.send(Message::text("started\nticking")).await.unwrap();
        ws.send(Message::text("tick")).await.unwrap();
        ws.close(None).await.unwrap();
    });

    let mut stream = LogStream::connect(&format!("ws://127.0.0.1:{port}/logs/a1"))
        .await
        .unwrap();

    assert_eq!(
        stream.recv().await,
        Some(LogStreamEvent::Message("started\nticking".to_string()))
    );
    assert_eq!(
        stream.recv().await,
        Some(LogStreamEvent::Message("tick".to_string()))
    );
    assert_eq!(stream.recv().await, Some(LogStreamEvent::Closed));
}
