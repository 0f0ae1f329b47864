// ============================================================================
// User Service
// ============================================================================
//
// Profile CRUD. Authentication is delegated to the auth service through
// the AuthDelegate: every protected request re-verifies its bearer token
// across the service boundary.
//
// ============================================================================

pub mod extractors;
pub mod handlers;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::auth_delegate::AuthDelegate;
use crate::store::ProfileStore;

/// User service context
pub struct UserServiceContext {
    pub auth: AuthDelegate,
    pub profiles: Arc<dyn ProfileStore>,
}

/// Build the user service router
pub fn router(context: Arc<UserServiceContext>) -> Router {
    Router::new()
        .route("/", get(handlers::read_root))
        .route("/profiles", post(handlers::create_profile))
        .route("/profiles/me", get(handlers::get_own_profile))
        .route("/profiles/me", put(handlers::update_own_profile))
        .route("/profiles/:id", get(handlers::get_profile_by_id))
        .with_state(context)
}
