// SPDX-License-Identifier: AGPL-3.0-or-later

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gigachat::auth::TokenManager;
use gigachat::error::AuthError;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

fn token_body(lifetime_ms: u64) -> serde_json::Value {
    json!({
        "access_token": "tok-1",
        "expires_at": now_ms() + lifetime_ms,
    })
}

fn manager(server: &MockServer) -> TokenManager {
    TokenManager::new(Client::new(), "id", "secret")
        .with_auth_url(format!("{}/oauth", server.uri()))
}

#[tokio::test]
async fn test_acquire_sends_expected_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth"))
        .and(header("Authorization", "Basic aWQ6c2VjcmV0"))
        .and(header("Accept", "application/json"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(header_exists("RqUID"))
        .and(body_string_contains("scope=GIGACHAT_API_PERS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(600_000)))
        .expect(1)
        .mount(&server)
        .await;

    let mut auth = manager(&server);
    auth.acquire().await.unwrap();

    assert!(auth.is_valid());
    assert_eq!(auth.bearer(), Some("tok-1"));
}

#[tokio::test]
async fn test_acquire_generates_fresh_rquid_per_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(600_000)))
        .mount(&server)
        .await;

    let mut auth = manager(&server);
    auth.acquire().await.unwrap();
    auth.acquire().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let rquid: Vec<&str> = requests
        .iter()
        .map(|r| r.headers.get("RqUID").unwrap().to_str().unwrap())
        .collect();
    assert_ne!(rquid[0], rquid[1]);
}

#[tokio::test]
async fn test_acquire_maps_rejection_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let mut auth = manager(&server);
    let err = auth.acquire().await.unwrap_err();

    match err {
        AuthError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "bad credentials");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
    assert!(!auth.is_valid());
    assert!(auth.bearer().is_none());
}

#[tokio::test]
async fn test_acquire_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let mut auth = manager(&server);
    let err = auth.acquire().await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidResponse(_)));
    assert!(auth.bearer().is_none());
}

#[tokio::test]
async fn test_failed_renewal_keeps_previous_token() {
    let good = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(600_000)))
        .mount(&good)
        .await;

    let bad = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&bad)
        .await;

    let mut auth = manager(&good);
    auth.acquire().await.unwrap();
    assert!(auth.is_valid());

    // A failed exchange must not wipe the still-valid token.
    auth = auth.with_auth_url(format!("{}/oauth", bad.uri()));
    assert!(auth.acquire().await.is_err());

    assert!(auth.is_valid());
    assert_eq!(auth.bearer(), Some("tok-1"));
}

#[tokio::test]
async fn test_ensure_valid_reuses_live_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(600_000)))
        .expect(1)
        .mount(&server)
        .await;

    let mut auth = manager(&server);
    auth.ensure_valid().await.unwrap();
    // Second call sees a valid token and must not hit the endpoint again;
    // the expect(1) above is verified when the server drops.
    auth.ensure_valid().await.unwrap();

    assert!(auth.is_valid());
}
