// ============================================================================
// Auth Service
// ============================================================================
//
// Registration, login and token handling. The /verify endpoint is the
// collaborator surface consumed by the user service's auth delegate.
//
// ============================================================================

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::config::Config;
use crate::store::UserStore;
use crate::token::TokenService;

/// Auth service context
pub struct AuthServiceContext {
    pub tokens: TokenService,
    pub users: Arc<dyn UserStore>,
    pub config: Arc<Config>,
}

/// Build the auth service router
pub fn router(context: Arc<AuthServiceContext>) -> Router {
    Router::new()
        .route("/", get(handlers::read_root))
        .route("/register", post(handlers::register))
        .route("/token", post(handlers::login_for_access_token))
        .route("/verify", post(handlers::verify_token))
        .with_state(context)
}
