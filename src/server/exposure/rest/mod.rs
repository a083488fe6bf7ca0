//! REST exposure
//!
//! Consumes an `AppHost` and produces the Axum `Router` with health checks,
//! account routes, per-resource routes and any custom routes.

use super::super::handlers;
use super::super::host::AppHost;
use anyhow::Result;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Requests are traced and CORS is permissive; the browser client is
    /// served from a different origin.
    pub fn build_router(host: Arc<AppHost>, custom_routes: Vec<Router>) -> Result<Router> {
        let health_routes = Self::health_routes();
        let auth_routes = handlers::auth::routes(host.clone());
        let entity_routes = host.entity_registry.build_routes(host.clone());

        let mut app = health_routes.merge(auth_routes).merge(entity_routes);

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()))
    }

    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "bizbook"
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::server::entity_registry::EntityRegistry;
    use crate::storage::Storage;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        let host = Arc::new(AppHost::from_builder_components(
            AppConfig::default(),
            Storage::in_memory(),
            EntityRegistry::new(),
        ));
        RestExposure::build_router(host, vec![]).unwrap()
    }

    #[tokio::test]
    async fn test_health_routes() {
        for path in ["/health", "/healthz"] {
            let response = router()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_session_requires_bearer() {
        let response = router()
            .oneshot(Request::get("/auth/session").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_custom_routes_merged() {
        let host = Arc::new(AppHost::from_builder_components(
            AppConfig::default(),
            Storage::in_memory(),
            EntityRegistry::new(),
        ));
        let custom = Router::new().route("/version", get(|| async { "0.1.0" }));
        let app = RestExposure::build_router(host, vec![custom]).unwrap();

        let response = app
            .oneshot(Request::get("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
