// ============================================================================
// API Gateway Service
// ============================================================================
//
// Single entry point for all client requests. Forwards requests to the
// registered downstream services based on the first path segment and
// relays their responses unchanged.
//
// ============================================================================

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use switchyard::config::Config;
use switchyard::gateway::registry::ServiceRegistry;
use switchyard::gateway::router::GatewayState;
use switchyard::gateway::service_client::ServiceClient;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.rust_log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("=== API Gateway Starting ===");
    info!("Port: {}", config.port);
    info!("Auth service: {}", config.auth_service_url);
    info!("User service: {}", config.user_service_url);
    info!("Analytics service: {}", config.analytics_service_url);

    let registry = ServiceRegistry::new(config.service_routes())
        .map_err(|e| anyhow::anyhow!("Invalid route table: {}", e))?;
    let service_client = ServiceClient::new(config.gateway_timeout_secs)?;

    let state = Arc::new(GatewayState {
        registry,
        service_client,
    });

    let app = switchyard::gateway::router::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port)
        .parse()
        .context("Failed to parse bind address")?;

    info!("API Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
