// ============================================================================
// Auth Service
// ============================================================================
//
// Registration, login and token issuance, plus the /verify endpoint the
// user service delegates authentication to.
//
// ============================================================================

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use switchyard::auth_service::{self, AuthServiceContext};
use switchyard::config::Config;
use switchyard::store::InMemoryUserStore;
use switchyard::token::TokenService;
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

    info!("=== Auth Service Starting ===");
    info!("Port: {}", config.port);

    let config = Arc::new(config);
    let context = Arc::new(AuthServiceContext {
        tokens: TokenService::new(&config.jwt_secret),
        users: Arc::new(InMemoryUserStore::new()),
        config: config.clone(),
    });

    let app = auth_service::router(context).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port)
        .parse()
        .context("Failed to parse bind address")?;

    info!("Auth Service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
