// ============================================================================
// API Gateway
// ============================================================================
//
// Single entry point for all client requests. It handles:
// - Routing requests to microservices based on the first path segment
// - Transparent forwarding (method, headers and body pass through unchanged)
// - Typed unavailability errors when a downstream cannot be reached
//
// The gateway is stateless and draws no conclusions from request payloads;
// authentication headers are forwarded uninspected.
//
// ============================================================================

pub mod registry;
pub mod router;
pub mod service_client;

pub use registry::{ServiceRegistry, ServiceRoute};
pub use router::GatewayState;
pub use service_client::ServiceClient;
