//! Switchyard - a small constellation of HTTP microservices.
//!
//! One library, four binaries (see `src/bin/`):
//! - `gateway` - API gateway forwarding requests to downstream services
//! - `auth_service` - registration, login, token issuance and verification
//! - `user_service` - user profiles, authenticated via the auth service
//! - `analytics_service` - in-memory event tracking

pub mod analytics_service;
pub mod auth_delegate;
pub mod auth_service;
pub mod config;
pub mod error;
pub mod gateway;
pub mod store;
pub mod token;
pub mod user_service;
