//! Server host holding all application state
//!
//! The host is transport-agnostic: it owns the configuration, the session
//! store and the services. Exposures turn it into a router.

use crate::config::AppConfig;
use crate::core::auth::SessionStore;
use crate::server::entity_registry::EntityRegistry;
use crate::services::{AccountService, AppointmentService, CustomerService, InvoiceService};
use crate::storage::Storage;
use axum::extract::FromRef;
use std::sync::Arc;

pub struct AppHost {
    pub config: Arc<AppConfig>,

    /// Open sessions, resolved from bearer tokens on every request
    pub sessions: SessionStore,

    pub accounts: AccountService,
    pub customers: CustomerService,
    pub appointments: AppointmentService,
    pub invoices: InvoiceService,

    /// Descriptors for the per-resource routes
    pub entity_registry: EntityRegistry,
}

impl AppHost {
    /// Wire the services onto the given storage
    ///
    /// Storage is used as given; apply deadlines before calling this.
    pub fn from_builder_components(
        config: AppConfig,
        storage: Storage,
        entity_registry: EntityRegistry,
    ) -> Self {
        let sessions = match config.auth.session_ttl() {
            Some(ttl) => SessionStore::with_ttl(ttl),
            None => SessionStore::new(),
        };

        Self {
            accounts: AccountService::new(
                storage.users.clone(),
                sessions.clone(),
                config.auth.clone(),
            ),
            customers: CustomerService::new(storage.customers.clone()),
            appointments: AppointmentService::new(storage.appointments.clone()),
            invoices: InvoiceService::new(
                storage.invoices.clone(),
                storage.appointments.clone(),
                config.billing.clone(),
            ),
            config: Arc::new(config),
            sessions,
            entity_registry,
        }
    }

    /// Get resource types registered in the host
    pub fn entity_types(&self) -> Vec<&str> {
        self.entity_registry.entity_types()
    }
}

impl FromRef<Arc<AppHost>> for SessionStore {
    fn from_ref(host: &Arc<AppHost>) -> Self {
        host.sessions.clone()
    }
}
