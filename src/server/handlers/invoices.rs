//! Invoice handlers

use super::{json_body, parse_id};
use crate::billing::draft::PREVIEW;
use crate::billing::{InvoiceAmounts, InvoiceDraft};
use crate::core::auth::SessionContext;
use crate::core::error::BizResult;
use crate::core::validation::{Validated, validate_payload};
use crate::entities::Invoice;
use crate::schedule::today_utc;
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::AppHost;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftParams {
    pub appointment_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextNumber {
    pub invoice_number: String,
}

pub struct InvoiceDescriptor;

impl EntityDescriptor for InvoiceDescriptor {
    fn entity_type(&self) -> &str {
        "invoice"
    }

    fn plural(&self) -> &str {
        "invoices"
    }

    fn build_routes(&self, host: Arc<AppHost>) -> Router {
        Router::new()
            .route("/invoices", get(list_invoices).post(create_invoice))
            .route("/invoices/next-number", get(next_number))
            .route("/invoices/preview", post(preview))
            .route("/invoices/draft", get(draft))
            .route("/invoices/{id}", get(get_invoice))
            .with_state(host)
    }
}

pub async fn list_invoices(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
) -> BizResult<Json<Vec<Invoice>>> {
    Ok(Json(host.invoices.list(&ctx).await?))
}

pub async fn create_invoice(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Validated(draft): Validated<InvoiceDraft>,
) -> BizResult<(StatusCode, Json<Invoice>)> {
    let invoice = host.invoices.create(&ctx, draft, today_utc()).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn get_invoice(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Path(id): Path<String>,
) -> BizResult<Json<Invoice>> {
    let id = parse_id(&id)?;
    Ok(Json(host.invoices.get(&ctx, &id).await?))
}

pub async fn next_number(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
) -> BizResult<Json<NextNumber>> {
    let invoice_number = host.invoices.next_number(&ctx, today_utc()).await?;
    Ok(Json(NextNumber { invoice_number }))
}

/// Amounts are returned unrounded; only persisted invoices are rounded
pub async fn preview(
    State(host): State<Arc<AppHost>>,
    _ctx: SessionContext,
    payload: Result<Json<Value>, JsonRejection>,
) -> BizResult<Json<InvoiceAmounts>> {
    let draft: InvoiceDraft = validate_payload(json_body(payload)?, PREVIEW)?;
    Ok(Json(host.invoices.preview(draft)?))
}

pub async fn draft(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Query(params): Query<DraftParams>,
) -> BizResult<Json<InvoiceDraft>> {
    let appointment_id = params
        .appointment_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_id)
        .transpose()?;

    let draft = host
        .invoices
        .draft_for_appointment(&ctx, appointment_id, today_utc())
        .await?;
    Ok(Json(draft))
}
