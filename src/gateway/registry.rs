use std::collections::HashMap;

use crate::error::AppError;

/// A registered downstream service: logical name, the path prefix the
/// gateway consumes, and the base URL requests are forwarded to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceRoute {
    pub name: String,
    pub base_path: String,
    pub target: String,
}

impl ServiceRoute {
    pub fn new(name: &str, base_path: &str, target: &str) -> Self {
        Self {
            name: name.to_string(),
            base_path: base_path.to_string(),
            // Forwarded URLs are target + relative path; a trailing slash
            // here would produce double slashes downstream
            target: target.trim_end_matches('/').to_string(),
        }
    }
}

/// Static mapping from logical service name to its route.
///
/// Built once from configuration at process start and read-only thereafter.
/// Lookup is by exact first-path-segment match, not longest prefix, so no
/// prefix ambiguity can arise. An unknown name is a normal outcome, not a
/// fault.
pub struct ServiceRegistry {
    routes: HashMap<String, ServiceRoute>,
}

impl ServiceRegistry {
    /// Build the registry from the configured route table.
    /// Duplicate service names are a configuration error.
    pub fn new(routes: Vec<ServiceRoute>) -> Result<Self, AppError> {
        let mut map = HashMap::with_capacity(routes.len());
        for route in routes {
            let name = route.name.clone();
            if map.insert(name.clone(), route).is_some() {
                return Err(AppError::Config(format!(
                    "duplicate service name '{}' in route table",
                    name
                )));
            }
        }
        Ok(Self { routes: map })
    }

    /// Resolve a logical service name to its route
    pub fn resolve(&self, service_name: &str) -> Option<&ServiceRoute> {
        self.routes.get(service_name)
    }

    /// All registered routes, for the gateway's service listing
    pub fn routes(&self) -> impl Iterator<Item = &ServiceRoute> {
        self.routes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_routes() -> Vec<ServiceRoute> {
        vec![
            ServiceRoute::new("auth", "/auth", "http://auth-service:3001"),
            ServiceRoute::new("users", "/users", "http://user-service:3002"),
            ServiceRoute::new("analytics", "/analytics", "http://analytics-service:3004"),
        ]
    }

    #[test]
    fn resolves_registered_names_exactly() {
        let registry = ServiceRegistry::new(sample_routes()).unwrap();

        let route = registry.resolve("analytics").unwrap();
        assert_eq!(route.name, "analytics");
        assert_eq!(route.base_path, "/analytics");
        assert_eq!(route.target, "http://analytics-service:3004");

        assert_eq!(registry.resolve("auth").unwrap().target, "http://auth-service:3001");
    }

    #[test]
    fn unknown_name_is_not_found() {
        let registry = ServiceRegistry::new(sample_routes()).unwrap();
        assert!(registry.resolve("billing").is_none());
        // Exact match only: a registered name is not a prefix key
        assert!(registry.resolve("user").is_none());
        assert!(registry.resolve("users/extra").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut routes = sample_routes();
        routes.push(ServiceRoute::new("auth", "/auth", "http://elsewhere:9999"));
        assert!(matches!(
            ServiceRegistry::new(routes),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_target() {
        let route = ServiceRoute::new("auth", "/auth", "http://auth-service:3001/");
        assert_eq!(route.target, "http://auth-service:3001");
    }
}
