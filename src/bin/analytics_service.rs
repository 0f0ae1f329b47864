// ============================================================================
// Analytics Service
// ============================================================================
//
// In-memory event tracking with filter and aggregate reads. Seeds a few
// demo events at startup so the summary endpoints have data to show.
//
// ============================================================================

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use switchyard::analytics_service::{self, AnalyticsServiceContext};
use switchyard::config::Config;
use switchyard::store::{seed_demo_events, EventStore, InMemoryEventStore};
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

    info!("=== Analytics Service Starting ===");
    info!("Port: {}", config.port);

    let events: Arc<dyn EventStore> = Arc::new(InMemoryEventStore::new());
    seed_demo_events(&events).await;

    let context = Arc::new(AnalyticsServiceContext { events });

    let app = analytics_service::router(context).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port)
        .parse()
        .context("Failed to parse bind address")?;

    info!("Analytics Service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
