// ============================================================================
// Gateway Router
// ============================================================================
//
// Routes requests to downstream microservices based on the first path
// segment, e.g.:
// - /auth/*      -> auth-service
// - /users/*     -> user-service
// - /analytics/* -> analytics-service
//
// The segment is an exact lookup key into the service registry; there is
// no longest-prefix matching. The gateway does not authenticate payloads
// itself - authentication headers pass through to the downstream service.
//
// ============================================================================

use axum::{
    body::Body,
    extract::{Request, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::error::AppError;
use crate::gateway::registry::ServiceRegistry;
use crate::gateway::service_client::ServiceClient;

/// Gateway router state
pub struct GatewayState {
    pub registry: ServiceRegistry,
    pub service_client: ServiceClient,
}

/// Build the gateway router. Only GET, POST, PUT and DELETE are proxied;
/// other verbs are answered with 405 rather than forwarded.
pub fn router(state: Arc<GatewayState>) -> Router {
    let forward = get(route_request)
        .post(route_request)
        .put(route_request)
        .delete(route_request);

    Router::new()
        .route("/", get(read_root))
        .route("/:service", forward.clone())
        .route("/:service/*path", forward)
        .with_state(state)
}

/// GET /
/// Lists the registered downstream services
async fn read_root(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    let services: serde_json::Map<String, serde_json::Value> = state
        .registry
        .routes()
        .map(|route| (route.name.clone(), json!(route.target)))
        .collect();

    Json(json!({
        "message": "API Gateway",
        "services": services,
    }))
}

/// Forward a request to the service named by its first path segment
async fn route_request(
    State(state): State<Arc<GatewayState>>,
    request: Request<Body>,
) -> Result<Response<Body>, AppError> {
    let path = request.uri().path();
    let query = request.uri().query().map(str::to_owned);

    // First segment is the service key; the remainder (with its leading
    // slash) is the service-relative path, passed through as received
    let trimmed = path.trim_start_matches('/');
    let (service_name, relative_path) = match trimmed.split_once('/') {
        Some((service, rest)) => (service.to_string(), format!("/{}", rest)),
        None => (trimmed.to_string(), String::new()),
    };

    let route = state
        .registry
        .resolve(&service_name)
        .ok_or_else(|| AppError::RouteNotFound {
            service: service_name.clone(),
        })?
        .clone();

    tracing::debug!(
        service = %route.name,
        target = %route.target,
        path = %relative_path,
        "Forwarding request"
    );

    state
        .service_client
        .forward(&route, &relative_path, query.as_deref(), request)
        .await
}
