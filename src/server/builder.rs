//! ServerBuilder for fluent API to build the HTTP server

use super::entity_registry::{EntityDescriptor, EntityRegistry};
use super::exposure::RestExposure;
use super::handlers::{AppointmentDescriptor, CustomerDescriptor, InvoiceDescriptor, ScheduleDescriptor};
use super::host::AppHost;
use crate::config::AppConfig;
use crate::storage::Storage;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the bizbook HTTP server
///
/// Customer, appointment, invoice and schedule routes are registered by
/// default; [`register`](Self::register) adds more.
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(AppConfig::from_env()?)
///     .serve()
///     .await?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    storage: Option<Storage>,
    entity_registry: EntityRegistry,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        let mut entity_registry = EntityRegistry::new();
        entity_registry.register(Box::new(CustomerDescriptor));
        entity_registry.register(Box::new(AppointmentDescriptor));
        entity_registry.register(Box::new(InvoiceDescriptor));
        entity_registry.register(Box::new(ScheduleDescriptor));

        Self {
            config: AppConfig::default(),
            storage: None,
            entity_registry,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Use the given collections instead of fresh in-memory ones
    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Register an extra set of resource routes
    pub fn register(mut self, descriptor: impl EntityDescriptor + 'static) -> Self {
        self.entity_registry.register(Box::new(descriptor));
        self
    }

    /// Add routes that are not tied to a resource
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the transport-agnostic host
    ///
    /// Every storage call is bounded by `storage.timeout_secs`.
    pub fn build_host(self) -> Result<AppHost> {
        self.config.validate()?;

        let storage = self
            .storage
            .unwrap_or_else(Storage::in_memory)
            .with_deadline(self.config.storage.timeout());

        Ok(AppHost::from_builder_components(
            self.config,
            storage,
            self.entity_registry,
        ))
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        RestExposure::build_router(host, custom_routes)
    }

    /// Serve on `server.bind_addr` until SIGTERM or Ctrl+C
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind_addr()?;
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    struct StubDescriptor;

    impl EntityDescriptor for StubDescriptor {
        fn entity_type(&self) -> &str {
            "stub"
        }

        fn plural(&self) -> &str {
            "stubs"
        }

        fn build_routes(&self, _host: Arc<AppHost>) -> Router {
            Router::new().route("/stubs", get(|| async { "[]" }))
        }
    }

    #[test]
    fn test_new_registers_default_resources() {
        let builder = ServerBuilder::new();
        assert_eq!(
            builder.entity_registry.entity_types(),
            vec!["appointment", "customer", "invoice", "schedule"]
        );
        assert!(builder.storage.is_none());
        assert!(builder.custom_routes.is_empty());
    }

    #[test]
    fn test_register_adds_descriptor() {
        let host = ServerBuilder::new()
            .register(StubDescriptor)
            .build_host()
            .unwrap();
        assert!(host.entity_types().contains(&"stub"));
    }

    #[test]
    fn test_with_custom_routes_appends_router() {
        let builder = ServerBuilder::new()
            .with_custom_routes(Router::new())
            .with_custom_routes(Router::new());
        assert_eq!(builder.custom_routes.len(), 2);
    }

    #[test]
    fn test_build_host_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.storage.timeout_secs = 0;

        let result = ServerBuilder::new().with_config(config).build_host();
        assert!(result.is_err());
    }

    #[test]
    fn test_build_host_keeps_config() {
        let mut config = AppConfig::default();
        config.auth.min_password_length = 8;

        let host = ServerBuilder::new()
            .with_config(config)
            .with_storage(Storage::in_memory())
            .build_host()
            .unwrap();
        assert_eq!(host.config.auth.min_password_length, 8);
    }

    #[test]
    fn test_build_produces_router() {
        let custom = Router::new().route("/custom", get(|| async { "ok" }));
        let result = ServerBuilder::new().with_custom_routes(custom).build();
        assert!(result.is_ok());
    }
}
