// ============================================================================
// Auth Delegate
// ============================================================================
//
// Synchronous trust delegation across the service boundary: given a bearer
// credential, call the auth service's /verify endpoint and map the result
// to an authenticated principal or a typed rejection.
//
// The verifier is a capability interface so a test double can simulate
// latency and failure without a real network. Stateless per call; no
// caching of verification results - every protected request re-verifies,
// trading latency for immediate revocation visibility.
//
// ============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::error::AppError;

/// The authenticated identity resolved from a valid credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub email: String,
}

/// Wire shape of the auth service's verify response
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationResponse {
    pub valid: bool,
    #[serde(default)]
    pub user: Option<Principal>,
}

#[derive(Error, Debug)]
pub enum VerifierError {
    /// The verification endpoint could not be reached, timed out, or
    /// answered with a non-200 status
    #[error("verification endpoint unavailable: {0}")]
    Unavailable(String),
}

/// Capability interface for token verification, injected into the
/// delegate so the network hop can be replaced in tests
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerificationResponse, VerifierError>;
}

/// Verifier that calls the auth service's POST /verify over HTTP
pub struct HttpTokenVerifier {
    client: reqwest::Client,
    verify_url: String,
}

impl HttpTokenVerifier {
    pub fn new(auth_service_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            verify_url: format!("{}/verify", auth_service_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerificationResponse, VerifierError> {
        // A single attempt, no retry
        let response = self
            .client
            .post(&self.verify_url)
            .json(&json!({ "token": token }))
            .send()
            .await
            .map_err(|e| VerifierError::Unavailable(e.to_string()))?;

        // Any non-200 from the auth service counts as unavailable, not as
        // a statement about the credential
        if !response.status().is_success() {
            return Err(VerifierError::Unavailable(format!(
                "verify endpoint returned status {}",
                response.status()
            )));
        }

        response
            .json::<VerificationResponse>()
            .await
            .map_err(|e| VerifierError::Unavailable(e.to_string()))
    }
}

/// Maps a bearer credential to an authenticated principal by delegating
/// to the auth service
#[derive(Clone)]
pub struct AuthDelegate {
    verifier: Arc<dyn TokenVerifier>,
}

impl AuthDelegate {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }

    /// Authenticate the value of an Authorization header.
    ///
    /// A credential that does not match the "Bearer <token>" shape is
    /// rejected without any network call. An unreachable auth service is
    /// surfaced as `AuthServiceUnavailable` (503), distinct from
    /// `InvalidCredential` (401).
    pub async fn authenticate(&self, authorization: &str) -> Result<Principal, AppError> {
        let token = authorization
            .strip_prefix("Bearer ")
            .ok_or(AppError::MalformedCredential)?;

        let result = self.verifier.verify(token).await.map_err(|e| {
            tracing::warn!(error = %e, "Token verification request failed");
            AppError::AuthServiceUnavailable
        })?;

        // A missing principal implies invalid regardless of the flag
        match (result.valid, result.user) {
            (true, Some(principal)) => Ok(principal),
            _ => Err(AppError::InvalidCredential),
        }
    }
}
