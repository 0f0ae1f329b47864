// ============================================================================
// Service Client
// ============================================================================
//
// HTTP client for forwarding requests to downstream microservices.
// A single attempt per request: transport failures surface immediately as
// ServiceUnavailable for the current caller. The response is relayed
// byte-for-byte; the client never reinterprets the downstream body.
//
// ============================================================================

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{Request, Response};
use std::time::Duration;

use crate::error::AppError;
use crate::gateway::registry::ServiceRoute;

/// HTTP client for forwarding requests to microservices
pub struct ServiceClient {
    client: reqwest::Client,
}

impl ServiceClient {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        // Connection pooling and keep-alive for repeated calls to the same
        // small set of downstream hosts
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .tcp_keepalive(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Forward a request to a downstream service.
    ///
    /// `relative_path` is the inbound path with the routing prefix already
    /// stripped, passed through verbatim (no normalization). The `Host`
    /// header belongs to the original hop and is dropped; every other
    /// header is forwarded unchanged.
    pub async fn forward(
        &self,
        route: &ServiceRoute,
        relative_path: &str,
        query: Option<&str>,
        request: Request<Body>,
    ) -> Result<Response<Body>, AppError> {
        let target_url = match query {
            Some(query) => format!("{}{}?{}", route.target, relative_path, query),
            None => format!("{}{}", route.target, relative_path),
        };

        let method = request.method().clone();
        let headers = request.headers().clone();

        let (_parts, body) = request.into_parts();
        let body_bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read request body: {}", e)))?;

        let mut outbound = self.client.request(method, &target_url);

        for (key, value) in headers.iter() {
            if key != "host" {
                outbound = outbound.header(key, value);
            }
        }

        if !body_bytes.is_empty() {
            outbound = outbound.body(body_bytes.to_vec());
        }

        // Single attempt, no retry. The client-level timeout bounds the call.
        let response = outbound.send().await.map_err(|e| {
            tracing::warn!(
                service = %route.name,
                target_url = %target_url,
                error = %e,
                "Downstream request failed"
            );
            AppError::ServiceUnavailable {
                service: route.name.clone(),
                cause: e.to_string(),
            }
        })?;

        // Relay status, headers and raw body unchanged
        let status = response.status();
        let mut relayed = Response::builder().status(status);

        for (key, value) in response.headers().iter() {
            relayed = relayed.header(key, value);
        }

        let response_bytes = response.bytes().await.map_err(|e| AppError::ServiceUnavailable {
            service: route.name.clone(),
            cause: e.to_string(),
        })?;

        relayed
            .body(Body::from(response_bytes))
            .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))
    }
}
