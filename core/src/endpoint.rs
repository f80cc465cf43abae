//! Endpoint resolution: resource name → URL path.

use std::collections::HashMap;

/// Maps a resource to the path used for each adapter kind.
///
/// Paths start with `/` and are joined onto the client's base URL.
pub trait EndpointResolver: Send + Sync {
    fn list_endpoint(&self, resource: &str) -> String;
    fn create_endpoint(&self, resource: &str) -> String;
}

/// `/<resource>` for every operation.
#[derive(Debug, Clone, Default)]
pub struct IdentityEndpointResolver;

impl EndpointResolver for IdentityEndpointResolver {
    fn list_endpoint(&self, resource: &str) -> String {
        format!("/{resource}")
    }

    fn create_endpoint(&self, resource: &str) -> String {
        format!("/{resource}")
    }
}

/// Per-resource path overrides on top of the identity mapping.
#[derive(Debug, Clone, Default)]
pub struct ConfigurableEndpointResolver {
    list: HashMap<String, String>,
    create: HashMap<String, String>,
}

impl ConfigurableEndpointResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes both list and create for `resource` to `path`.
    pub fn route(self, resource: &str, path: &str) -> Self {
        self.route_list(resource, path).route_create(resource, path)
    }

    pub fn route_list(mut self, resource: &str, path: &str) -> Self {
        self.list.insert(resource.to_string(), normalize_path(path));
        self
    }

    pub fn route_create(mut self, resource: &str, path: &str) -> Self {
        self.create.insert(resource.to_string(), normalize_path(path));
        self
    }
}

impl EndpointResolver for ConfigurableEndpointResolver {
    fn list_endpoint(&self, resource: &str) -> String {
        self.list
            .get(resource)
            .map_or_else(|| IdentityEndpointResolver.list_endpoint(resource), Clone::clone)
    }

    fn create_endpoint(&self, resource: &str) -> String {
        self.create
            .get(resource)
            .map_or_else(|| IdentityEndpointResolver.create_endpoint(resource), Clone::clone)
    }
}

fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_matches('/'))
}
