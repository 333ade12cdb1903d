use httpmock::prelude::*;
use std::time::Duration;
use token_login::{Credentials, CredentialExchange, ErrorKind, HttpCredentialExchanger, TokenResponse};

fn exchanger(base_url: &str, timeout: Duration) -> HttpCredentialExchanger {
    HttpCredentialExchanger::new(base_url, timeout).expect("valid base url")
}

#[tokio::test]
async fn test_valid_credentials_yield_access_token() {
    let server = MockServer::start();
    let token_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/token/")
            .header("content-type", "application/json")
            .json_body(serde_json::json!({"username": "alice", "password": "secret"}));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"access": "abc123"}));
    });

    let result = exchanger(&server.url("/api"), Duration::from_secs(5))
        .exchange(&Credentials::new("alice", "secret"))
        .await;

    token_mock.assert();
    assert_eq!(
        result.unwrap(),
        TokenResponse {
            access: "abc123".to_string(),
            refresh: None,
        }
    );
}

#[tokio::test]
async fn test_unknown_account_is_authentication_error() {
    let server = MockServer::start();
    let token_mock = server.mock(|when, then| {
        when.method(POST).path("/api/token/");
        then.status(401)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"detail": "No active account found"}));
    });

    let err = exchanger(&server.url("/api"), Duration::from_secs(5))
        .exchange(&Credentials::new("alice", "wrong"))
        .await
        .unwrap_err();

    token_mock.assert();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(err.status, Some(401));
    assert_eq!(err.message, "No active account found");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_field_errors_from_bad_request() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/token/");
        then.status(400)
            .json_body(serde_json::json!({"username": ["This field may not be blank."]}));
    });

    let err = exchanger(&server.url("/api/"), Duration::from_secs(5))
        .exchange(&Credentials::new("alice", "secret"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(err.status, Some(400));
    assert_eq!(err.message, "username: This field may not be blank.");
}

#[tokio::test]
async fn test_empty_username_never_reaches_server() {
    let server = MockServer::start();
    let token_mock = server.mock(|when, then| {
        when.method(POST).path("/api/token/");
        then.status(200).json_body(serde_json::json!({"access": "abc123"}));
    });

    let err = exchanger(&server.url("/api"), Duration::from_secs(5))
        .exchange(&Credentials::new("", "secret"))
        .await
        .unwrap_err();

    token_mock.assert_hits(0);
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.status, None);
}

#[tokio::test]
async fn test_slow_endpoint_times_out_as_transport_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/token/");
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(serde_json::json!({"access": "too-late"}));
    });

    let err = exchanger(&server.url("/api"), Duration::from_millis(200))
        .exchange(&Credentials::new("alice", "secret"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Transport);
    assert_eq!(err.status, None);
    assert!(err.message.contains("timed out"), "message was: {}", err.message);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let err = exchanger("http://127.0.0.1:1/api", Duration::from_secs(2))
        .exchange(&Credentials::new("alice", "secret"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Transport);
    assert_eq!(err.status, None);
    assert!(err.user_message().starts_with("Unable to reach server"));
}

#[tokio::test]
async fn test_each_call_produces_exactly_one_outcome() {
    let server = MockServer::start();
    let ok_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/token/")
            .json_body(serde_json::json!({"username": "alice", "password": "secret"}));
        then.status(200).json_body(serde_json::json!({"access": "a", "refresh": "r"}));
    });
    let err_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/token/")
            .json_body(serde_json::json!({"username": "bob", "password": "secret"}));
        then.status(500).body("");
    });

    let exchanger = exchanger(&server.url("/api"), Duration::from_secs(5));

    let ok = exchanger.exchange(&Credentials::new("alice", "secret")).await;
    let err = exchanger.exchange(&Credentials::new("bob", "secret")).await;

    ok_mock.assert_hits(1);
    err_mock.assert_hits(1);
    assert_eq!(ok.unwrap().refresh.as_deref(), Some("r"));
    let err = err.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Server);
    assert_eq!(err.message, "Internal Server Error");
}
