use axum::{http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Application error type covering the gateway, auth and service layers.
///
/// Every failure maps to exactly one outward status code and a
/// human-readable `{"detail": ...}` body. There are no retries anywhere:
/// a single failed attempt is a final failure to the current caller.
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Gateway Errors =====
    #[error("Service '{service}' not found")]
    RouteNotFound { service: String },

    #[error("Service '{service}' unavailable: {cause}")]
    ServiceUnavailable { service: String, cause: String },

    // ===== Authentication Errors =====
    /// Authorization header missing or not of the form "Bearer <token>"
    #[error("Invalid authentication credentials")]
    MalformedCredential,

    /// Credential was well-formed but the auth service rejected it
    #[error("Invalid authentication credentials")]
    InvalidCredential,

    /// The auth service could not be reached; distinct from credential
    /// invalidity so callers can surface 503 rather than 401
    #[error("Authentication service unavailable")]
    AuthServiceUnavailable,

    #[error("Incorrect email or password")]
    LoginFailed,

    // ===== Resource Errors =====
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    // ===== Configuration & Internal Errors =====
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::RouteNotFound { .. } | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable { .. } | AppError::AuthServiceUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::MalformedCredential
            | AppError::InvalidCredential
            | AppError::LoginFailed => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log this error with a level matching its severity
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(error = %self, "Authentication failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Client error");
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.log();

        let status = self.status_code();
        let body = json!({ "detail": self.to_string() });

        // 401 responses carry the challenge header so clients know to
        // present a bearer token
        if status == StatusCode::UNAUTHORIZED {
            return (
                status,
                [("WWW-Authenticate", "Bearer")],
                axum::Json(body),
            )
                .into_response();
        }

        (status, axum::Json(body)).into_response()
    }
}
