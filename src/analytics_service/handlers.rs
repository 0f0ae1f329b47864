use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::analytics_service::AnalyticsServiceContext;
use crate::store::{AnalyticsEvent, EventSummary};

const DEFAULT_EVENT_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct TrackEventRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
    pub event_type: String,
    #[serde(default)]
    pub event_data: serde_json::Value,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct TrackEventResponse {
    pub event_id: Uuid,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// GET /
pub async fn read_root() -> impl IntoResponse {
    Json(json!({ "message": "Analytics Service Running" }))
}

/// POST /track
/// Track a user event (page_view, button_click, login, logout, ...)
pub async fn track_event(
    State(context): State<Arc<AnalyticsServiceContext>>,
    Json(request): Json<TrackEventRequest>,
) -> Json<TrackEventResponse> {
    let event = AnalyticsEvent {
        id: Uuid::new_v4(),
        user_id: request.user_id,
        event_type: request.event_type,
        event_data: request.event_data,
        timestamp: request.timestamp.unwrap_or_else(Utc::now),
    };
    let event_id = event.id;

    tracing::info!(
        event_type = %event.event_type,
        user_id = ?event.user_id,
        "Tracked event"
    );

    context.events.append(event).await;

    Json(TrackEventResponse {
        event_id,
        status: "success".to_string(),
        message: "Event tracked successfully".to_string(),
    })
}

/// GET /events?event_type=&limit=
/// Most recent events first, optionally filtered by type
pub async fn get_events(
    State(context): State<Arc<AnalyticsServiceContext>>,
    Query(query): Query<EventsQuery>,
) -> Json<Vec<AnalyticsEvent>> {
    let limit = query.limit.unwrap_or(DEFAULT_EVENT_LIMIT);
    let events = context.events.list(query.event_type.as_deref(), limit).await;
    Json(events)
}

/// GET /summary
/// Per-event-type counts
pub async fn get_summary(
    State(context): State<Arc<AnalyticsServiceContext>>,
) -> Json<Vec<EventSummary>> {
    Json(context.events.summary().await)
}

/// DELETE /events
pub async fn clear_events(
    State(context): State<Arc<AnalyticsServiceContext>>,
) -> Json<serde_json::Value> {
    context.events.clear().await;
    Json(json!({ "message": "All events cleared" }))
}
