// ============================================================================
// User Service
// ============================================================================
//
// Profile CRUD behind bearer authentication. Tokens are verified by
// delegating to the auth service's /verify endpoint on every request.
//
// ============================================================================

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use switchyard::auth_delegate::{AuthDelegate, HttpTokenVerifier};
use switchyard::config::Config;
use switchyard::store::InMemoryProfileStore;
use switchyard::user_service::{self, UserServiceContext};
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

    info!("=== User Service Starting ===");
    info!("Port: {}", config.port);
    info!("Auth service: {}", config.auth_service_url);

    let verifier = HttpTokenVerifier::new(&config.auth_service_url, config.verify_timeout_secs)?;
    let context = Arc::new(UserServiceContext {
        auth: AuthDelegate::new(Arc::new(verifier)),
        profiles: Arc::new(InMemoryProfileStore::new()),
    });

    let app = user_service::router(context).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port)
        .parse()
        .context("Failed to parse bind address")?;

    info!("User Service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
