//! Tests for the auth delegate: bearer parsing and the synchronous
//! verification hop to the auth service, including its failure modes.

use std::sync::Arc;
use std::time::Duration;
use switchyard::auth_delegate::{AuthDelegate, HttpTokenVerifier, Principal};
use switchyard::error::AppError;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn delegate_for(server_url: &str, timeout_secs: u64) -> AuthDelegate {
    let verifier = HttpTokenVerifier::new(server_url, timeout_secs).unwrap();
    AuthDelegate::new(Arc::new(verifier))
}

fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn valid_credential_yields_principal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify"))
        .and(body_partial_json(serde_json::json!({ "token": "abc.def.ghi" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "valid": true,
            "user": { "id": 7, "email": "alice@example.com" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let delegate = delegate_for(&server.uri(), 5);
    let principal = delegate.authenticate("Bearer abc.def.ghi").await.unwrap();

    assert_eq!(
        principal,
        Principal {
            id: 7,
            email: "alice@example.com".to_string()
        }
    );
}

#[tokio::test]
async fn rejected_token_is_invalid_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "valid": false })),
        )
        .mount(&server)
        .await;

    let delegate = delegate_for(&server.uri(), 5);
    let result = delegate.authenticate("Bearer abc.def.ghi").await;

    assert!(matches!(result, Err(AppError::InvalidCredential)));
}

#[tokio::test]
async fn valid_flag_without_principal_is_invalid_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "valid": true })),
        )
        .mount(&server)
        .await;

    let delegate = delegate_for(&server.uri(), 5);
    let result = delegate.authenticate("Bearer abc.def.ghi").await;

    // No principal implies invalid regardless of the flag
    assert!(matches!(result, Err(AppError::InvalidCredential)));
}

#[tokio::test]
async fn malformed_credential_is_rejected_without_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let delegate = delegate_for(&server.uri(), 5);

    for credential in ["abc.def.ghi", "Basic dXNlcjpwYXNz", "bearer abc", ""] {
        let result = delegate.authenticate(credential).await;
        assert!(
            matches!(result, Err(AppError::MalformedCredential)),
            "credential {:?} should be malformed",
            credential
        );
    }
}

#[tokio::test]
async fn unreachable_auth_service_is_distinct_from_invalid() {
    let delegate = delegate_for(&unreachable_url(), 2);
    let result = delegate.authenticate("Bearer abc.def.ghi").await;

    assert!(matches!(result, Err(AppError::AuthServiceUnavailable)));
}

#[tokio::test]
async fn verify_timeout_is_auth_service_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "valid": true }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let delegate = delegate_for(&server.uri(), 1);
    let result = delegate.authenticate("Bearer abc.def.ghi").await;

    assert!(matches!(result, Err(AppError::AuthServiceUnavailable)));
}

#[tokio::test]
async fn non_200_verify_response_is_auth_service_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let delegate = delegate_for(&server.uri(), 5);
    let result = delegate.authenticate("Bearer abc.def.ghi").await;

    assert!(matches!(result, Err(AppError::AuthServiceUnavailable)));
}
