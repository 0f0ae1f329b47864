use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::store::{Profile, StoreError};
use crate::user_service::extractors::AuthenticatedPrincipal;
use crate::user_service::UserServiceContext;

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
}

/// GET /
pub async fn read_root() -> impl IntoResponse {
    Json(json!({ "message": "User Service Running" }))
}

/// POST /profiles
pub async fn create_profile(
    State(context): State<Arc<UserServiceContext>>,
    user: AuthenticatedPrincipal,
    Json(request): Json<ProfileRequest>,
) -> AppResult<impl IntoResponse> {
    let principal = user.0;
    tracing::info!(user_id = principal.id, "Creating profile");

    let profile = context
        .profiles
        .create(principal.id, &request.name, request.bio.as_deref())
        .await
        .map_err(|StoreError::Duplicate(msg)| AppError::Conflict(msg))?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /profiles/me
pub async fn get_own_profile(
    State(context): State<Arc<UserServiceContext>>,
    user: AuthenticatedPrincipal,
) -> AppResult<Json<Profile>> {
    let principal = user.0;
    let profile = context
        .profiles
        .find_by_user(principal.id)
        .await
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

/// PUT /profiles/me
pub async fn update_own_profile(
    State(context): State<Arc<UserServiceContext>>,
    user: AuthenticatedPrincipal,
    Json(request): Json<ProfileRequest>,
) -> AppResult<Json<Profile>> {
    let principal = user.0;
    tracing::info!(user_id = principal.id, "Updating profile");

    let profile = context
        .profiles
        .update(principal.id, &request.name, request.bio.as_deref())
        .await
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

/// GET /profiles/:id
/// Public profile read, no authentication required
pub async fn get_profile_by_id(
    State(context): State<Arc<UserServiceContext>>,
    Path(profile_id): Path<i64>,
) -> AppResult<Json<Profile>> {
    let profile = context
        .profiles
        .find_by_id(profile_id)
        .await
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}
