//! HTTP server: host state, resource routes and the REST exposure

pub mod builder;
pub mod entity_registry;
pub mod exposure;
pub mod handlers;
pub mod host;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use exposure::RestExposure;
pub use host::AppHost;
