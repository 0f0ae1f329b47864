use anyhow::Result;

use crate::gateway::registry::ServiceRoute;

// ============================================================================
// Configuration Constants
// ============================================================================

const DEFAULT_PORT: u16 = 8080;

// Default in-cluster service addresses
const DEFAULT_AUTH_SERVICE_URL: &str = "http://auth-service:3001";
const DEFAULT_USER_SERVICE_URL: &str = "http://user-service:3002";
const DEFAULT_ANALYTICS_SERVICE_URL: &str = "http://analytics-service:3004";

// Default access token lifetime (minutes)
const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 60;

// Default timeouts for downstream calls (seconds). Downstream calls must
// always have a finite bound; an unbounded hang is a defect.
const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 30;
const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Configuration Structure
// ============================================================================

/// Process configuration, assembled once at startup from the environment
/// and passed by reference into the services. Request-handling code never
/// reads the environment directly.
#[derive(Clone, Debug)]
pub struct Config {
    /// Port this service listens on
    pub port: u16,
    /// JWT signing secret (shared across auth-issuing and verifying services)
    pub jwt_secret: String,
    /// Access token lifetime in minutes
    pub access_token_expire_minutes: i64,
    /// Base URL of the auth service
    pub auth_service_url: String,
    /// Base URL of the user service
    pub user_service_url: String,
    /// Base URL of the analytics service
    pub analytics_service_url: String,
    /// Timeout for requests forwarded by the gateway (seconds)
    pub gateway_timeout_secs: u64,
    /// Timeout for token verification calls (seconds)
    pub verify_timeout_secs: u64,
    /// Log filter (RUST_LOG)
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your_jwt_secret".to_string()),
            access_token_expire_minutes: std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES),
            auth_service_url: std::env::var("AUTH_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_AUTH_SERVICE_URL.to_string()),
            user_service_url: std::env::var("USER_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_USER_SERVICE_URL.to_string()),
            analytics_service_url: std::env::var("ANALYTICS_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_ANALYTICS_SERVICE_URL.to_string()),
            gateway_timeout_secs: std::env::var("GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_GATEWAY_TIMEOUT_SECS),
            verify_timeout_secs: std::env::var("VERIFY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_VERIFY_TIMEOUT_SECS),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Static route table for the gateway registry. Built once at startup;
    /// the registry is read-only afterwards.
    pub fn service_routes(&self) -> Vec<ServiceRoute> {
        vec![
            ServiceRoute::new("auth", "/auth", &self.auth_service_url),
            ServiceRoute::new("users", "/users", &self.user_service_url),
            ServiceRoute::new("analytics", "/analytics", &self.analytics_service_url),
        ]
    }
}
