// ============================================================================
// Axum Extractors
// ============================================================================
//
// AuthenticatedPrincipal: extracts the bearer credential from the
// Authorization header and authenticates it via the auth delegate. The
// principal becomes the identity for the remainder of request handling.
//
// ============================================================================

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::auth_delegate::Principal;
use crate::error::AppError;
use crate::user_service::UserServiceContext;

/// Extractor for the authenticated principal resolved from the bearer token
///
/// Usage:
/// ```ignore
/// async fn handler(user: AuthenticatedPrincipal, ...) -> Result<...> {
///     let user_id = user.0.id;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(pub Principal);

#[async_trait]
impl FromRequestParts<Arc<UserServiceContext>> for AuthenticatedPrincipal {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<UserServiceContext>,
    ) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::MalformedCredential.into_response())?;

        let principal = state
            .auth
            .authenticate(authorization)
            .await
            .map_err(|e| e.into_response())?;

        Ok(AuthenticatedPrincipal(principal))
    }
}
