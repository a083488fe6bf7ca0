//! Entity registry for managing resource descriptors and their routes

use super::host::AppHost;
use axum::Router;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Trait that describes how to build routes for a resource
///
/// Each resource (customers, appointments, invoices) implements this trait
/// to provide its routes.
pub trait EntityDescriptor: Send + Sync {
    /// The resource type name (singular, e.g., "invoice")
    fn entity_type(&self) -> &str;

    /// The plural form, used as the path prefix (e.g., "invoices")
    fn plural(&self) -> &str;

    /// Build the routes for this resource, bound to the host
    fn build_routes(&self, host: Arc<AppHost>) -> Router;
}

/// Registry for all resources exposed by the server
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor; the entity type name is the key
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Merge every registered resource's routes into one router
    pub fn build_routes(&self, host: Arc<AppHost>) -> Router {
        let mut router = Router::new();

        for descriptor in self.descriptors.values() {
            tracing::debug!(resource = descriptor.plural(), "registering routes");
            router = router.merge(descriptor.build_routes(host.clone()));
        }

        router
    }

    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }
}
