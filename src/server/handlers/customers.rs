//! Customer roster handlers

use super::parse_id;
use crate::core::auth::SessionContext;
use crate::core::error::BizResult;
use crate::core::validation::Validated;
use crate::entities::{Customer, NewCustomer};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::AppHost;
use crate::services::search;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub struct CustomerDescriptor;

impl EntityDescriptor for CustomerDescriptor {
    fn entity_type(&self) -> &str {
        "customer"
    }

    fn plural(&self) -> &str {
        "customers"
    }

    fn build_routes(&self, host: Arc<AppHost>) -> Router {
        Router::new()
            .route("/customers", get(list_customers).post(add_customer))
            .route("/customers/{id}", get(get_customer))
            .with_state(host)
    }
}

pub async fn list_customers(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Query(params): Query<SearchParams>,
) -> BizResult<Json<Vec<Customer>>> {
    let customers = host.customers.list(&ctx).await?;
    Ok(Json(search(customers, params.q.as_deref().unwrap_or(""))))
}

pub async fn add_customer(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Validated(input): Validated<NewCustomer>,
) -> BizResult<(StatusCode, Json<Customer>)> {
    let customer = host.customers.add(&ctx, input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn get_customer(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Path(id): Path<String>,
) -> BizResult<Json<Customer>> {
    let id = parse_id(&id)?;
    Ok(Json(host.customers.get(&ctx, &id).await?))
}
