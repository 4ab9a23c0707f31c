//! Auth client against a fake auth server.
//!
//! Covers:
//!  1. Successful login stores the returned token
//!  2. Rejections carry the server body verbatim and leave the store alone
//!  3. Register shares the login code path
//!  4. Logout is local and idempotent
//!  5. Malformed bodies and transport failures surface as unexpected errors
//!  6. Overlapping logins: last response to land wins

use std::time::Duration;

use bookshelf_core::session::{FileBackend, SessionStore};
use bookshelf_core::{AuthClient, AuthConfig, AuthContext, AuthError, AuthStatus, Credentials};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> AuthClient {
    AuthClient::new(&AuthConfig::with_base_url(server.uri()), SessionStore::in_memory()).unwrap()
}

async fn mount_user(server: &MockServer, endpoint: &str, username: &str, token: &str) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .and(body_json(json!({"username": username, "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"username": username, "token": token}
        })))
        .mount(server)
        .await;
}

// ─── Test 1: login success ──────────────────────────────────────────────────

#[tokio::test]
async fn login_resolves_user_and_stores_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"username": "kentcdodds", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"username": "kentcdodds", "token": "abc123"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let user = client
        .login(&Credentials::new("kentcdodds", "secret"))
        .await
        .unwrap();

    assert_eq!(user.username, "kentcdodds");
    assert_eq!(user.token, "abc123");
    assert!(user.extra.is_empty());
    assert_eq!(client.get_token().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn login_keeps_extra_user_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "user": {"username": "reader", "token": "t-1", "id": "42", "roles": ["admin"]}
        })))
        .mount(&server)
        .await;

    let user = client_for(&server)
        .login(&Credentials::new("reader", "pw"))
        .await
        .unwrap();
    assert_eq!(user.extra.get("id"), Some(&json!("42")));
    assert_eq!(user.extra.get("roles"), Some(&json!(["admin"])));
}

// ─── Test 2: application rejection ──────────────────────────────────────────

#[tokio::test]
async fn rejection_carries_body_and_keeps_previous_token() {
    let server = MockServer::start().await;
    mount_user(&server, "/login", "kentcdodds", "abc123").await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "x", "password": "wrong"})))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "invalid credentials"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .login(&Credentials::new("kentcdodds", "secret"))
        .await
        .unwrap();

    let err = client
        .login(&Credentials::new("x", "wrong"))
        .await
        .unwrap_err();

    assert!(err.is_rejection());
    assert_eq!(err.payload(), Some(&json!({"message": "invalid credentials"})));
    assert_eq!(err.message(), Some("invalid credentials"));
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(client.get_token().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn rejection_payload_is_not_normalized() {
    let server = MockServer::start().await;
    let body = json!({"errors": [{"field": "password", "code": 7}], "message": null});
    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(422).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .register(&Credentials::new("", ""))
        .await
        .unwrap_err();
    match err {
        AuthError::Rejected { status, payload } => {
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(payload, body);
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

// ─── Test 3: register mirrors login ─────────────────────────────────────────

#[tokio::test]
async fn register_and_login_behave_the_same() {
    let server = MockServer::start().await;
    mount_user(&server, "/register", "newbie", "reg-token").await;
    mount_user(&server, "/login", "newbie", "login-token").await;
    for endpoint in ["/register", "/login"] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .and(body_json(json!({"username": "taken", "password": "secret"})))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "nope"})))
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let creds = Credentials::new("newbie", "secret");

    let registered = client.register(&creds).await.unwrap();
    assert_eq!(client.get_token().as_deref(), Some(registered.token.as_str()));
    let logged_in = client.login(&creds).await.unwrap();
    assert_eq!(client.get_token().as_deref(), Some(logged_in.token.as_str()));

    let taken = Credentials::new("taken", "secret");
    let reg_err = client.register(&taken).await.unwrap_err();
    let login_err = client.login(&taken).await.unwrap_err();
    assert_eq!(reg_err.payload(), login_err.payload());
    assert_eq!(reg_err.status(), login_err.status());
}

// ─── Test 4: logout ─────────────────────────────────────────────────────────

#[tokio::test]
async fn logout_clears_token_without_network() {
    let server = MockServer::start().await;
    mount_user(&server, "/login", "kentcdodds", "abc123").await;

    let client = client_for(&server);
    client
        .login(&Credentials::new("kentcdodds", "secret"))
        .await
        .unwrap();
    client.logout().await.unwrap();
    client.logout().await.unwrap();

    assert_eq!(client.get_token(), None);
    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
}

#[tokio::test]
async fn logout_on_empty_store_is_ok() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    client.logout().await.unwrap();
    assert_eq!(client.get_token(), None);
}

// ─── Test 5: unexpected failures ────────────────────────────────────────────

#[tokio::test]
async fn non_json_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .login(&Credentials::new("a", "b"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Decode(_)));
    assert!(!err.is_rejection());
    assert_eq!(client.get_token(), None);
}

#[tokio::test]
async fn non_json_error_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .login(&Credentials::new("a", "b"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Decode(_)));
}

#[tokio::test]
async fn success_without_user_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .login(&Credentials::new("a", "b"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = AuthClient::new(
        &AuthConfig::with_base_url(format!("http://{addr}")),
        SessionStore::in_memory(),
    )
    .unwrap();
    let err = client
        .login(&Credentials::new("a", "b"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Transport(_)));
    assert!(!err.is_rejection());
}

// ─── Test 6: overlapping logins ─────────────────────────────────────────────

#[tokio::test]
async fn slower_login_overwrites_faster_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "a", "password": "secret"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"user": {"username": "a", "token": "token-a"}}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_user(&server, "/login", "b", "token-b").await;

    let client = client_for(&server);
    let creds_a = Credentials::new("a", "secret");
    let creds_b = Credentials::new("b", "secret");
    let (a, b) = tokio::join!(client.login(&creds_a), client.login(&creds_b));
    a.unwrap();
    b.unwrap();

    // "a" was issued first but landed last.
    assert_eq!(client.get_token().as_deref(), Some("token-a"));
}

// ─── Auth context ───────────────────────────────────────────────────────────

#[tokio::test]
async fn context_tracks_user_alongside_token() {
    let server = MockServer::start().await;
    mount_user(&server, "/login", "kentcdodds", "abc123").await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "x", "password": "wrong"})))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "no"})))
        .mount(&server)
        .await;

    let ctx = AuthContext::new(client_for(&server));
    assert_eq!(ctx.bootstrap(), AuthStatus::Anonymous);

    let user = ctx
        .login(&Credentials::new("kentcdodds", "secret"))
        .await
        .unwrap();
    assert_eq!(ctx.current_user(), Some(user));
    assert_eq!(
        ctx.bootstrap(),
        AuthStatus::Authenticated {
            token: "abc123".into()
        }
    );

    assert!(ctx.login(&Credentials::new("x", "wrong")).await.is_err());
    assert_eq!(
        ctx.current_user().map(|u| u.username),
        Some("kentcdodds".to_string())
    );

    ctx.logout().await.unwrap();
    assert_eq!(ctx.current_user(), None);
    assert!(!ctx.bootstrap().is_authenticated());
}

#[tokio::test]
async fn file_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.json");
    let server = MockServer::start().await;
    mount_user(&server, "/login", "kentcdodds", "abc123").await;

    let config = AuthConfig::with_base_url(server.uri());
    let first = AuthClient::new(
        &config,
        SessionStore::new(Arc::new(FileBackend::new(&session_path))),
    )
    .unwrap();
    first
        .login(&Credentials::new("kentcdodds", "secret"))
        .await
        .unwrap();

    let restarted = AuthContext::new(
        AuthClient::new(
            &config,
            SessionStore::new(Arc::new(FileBackend::new(&session_path))),
        )
        .unwrap(),
    );
    assert!(restarted.bootstrap().is_authenticated());
    assert_eq!(restarted.current_user(), None);

    let on_disk: Value = serde_json::from_slice(&std::fs::read(&session_path).unwrap()).unwrap();
    assert_eq!(on_disk, json!({"__auth_provider_token__": "abc123"}));
}
