use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::auth_service::AuthServiceContext;
use crate::error::{AppError, AppResult};
use crate::store::{StoreError, UserRecord};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,
}

/// GET /
pub async fn read_root() -> impl IntoResponse {
    Json(json!({ "message": "Auth Service Running" }))
}

/// POST /register
pub async fn register(
    State(context): State<Arc<AuthServiceContext>>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let user = context
        .users
        .create(&request.email, &request.password)
        .await
        .map_err(|StoreError::Duplicate(msg)| AppError::Conflict(msg))?;

    tracing::info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /token
/// OAuth2-style password login; the form field is named "username" but
/// carries the email
pub async fn login_for_access_token(
    State(context): State<Arc<AuthServiceContext>>,
    Form(form): Form<LoginForm>,
) -> AppResult<Json<TokenResponse>> {
    let user = context
        .users
        .authenticate(&form.username, &form.password)
        .await
        .ok_or(AppError::LoginFailed)?;

    let access_token = context
        .tokens
        .issue(&user.email, context.config.access_token_expire_minutes)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// POST /verify
/// Collaborator surface for the auth delegate. Always answers 200: an
/// invalid token is a normal result carried in the body, never an error.
/// The result is only valid when the subject still resolves to a user.
pub async fn verify_token(
    State(context): State<Arc<AuthServiceContext>>,
    Json(request): Json<VerifyRequest>,
) -> Json<VerifyResponse> {
    let verification = context.tokens.verify(&request.token);

    let email = match verification.subject {
        Some(email) if verification.valid => email,
        _ => {
            return Json(VerifyResponse {
                valid: false,
                user: None,
            })
        }
    };

    match context.users.find_by_email(&email).await {
        Some(user) => {
            tracing::info!(user_id = user.id, "Token verified");
            Json(VerifyResponse {
                valid: true,
                user: Some(user),
            })
        }
        None => {
            tracing::warn!("Token subject no longer resolves to a user");
            Json(VerifyResponse {
                valid: false,
                user: None,
            })
        }
    }
}
