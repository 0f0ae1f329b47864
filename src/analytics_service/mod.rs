// ============================================================================
// Analytics Service
// ============================================================================
//
// Append-only event tracking with filter and aggregate reads. The event
// log lives behind an injected EventStore owned by the composing process;
// demo seeding is an explicit collaborator call, not a startup hook.
//
// ============================================================================

pub mod handlers;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::store::EventStore;

/// Analytics service context
pub struct AnalyticsServiceContext {
    pub events: Arc<dyn EventStore>,
}

/// Build the analytics service router
pub fn router(context: Arc<AnalyticsServiceContext>) -> Router {
    Router::new()
        .route("/", get(handlers::read_root))
        .route("/track", post(handlers::track_event))
        .route("/events", get(handlers::get_events))
        .route("/events", delete(handlers::clear_events))
        .route("/summary", get(handlers::get_summary))
        .with_state(context)
}
