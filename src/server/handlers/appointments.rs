//! Appointment handlers

use super::{parse_date_param, parse_id};
use crate::core::auth::SessionContext;
use crate::core::error::BizResult;
use crate::core::validation::Validated;
use crate::entities::{Appointment, AppointmentInput, StatusUpdate};
use crate::schedule::{FilterMode, today_utc};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::AppHost;
use crate::services::ListQuery;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// `?filter=all|today|upcoming|date&date=YYYY-MM-DD`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub filter: Option<String>,
    pub date: Option<String>,
}

impl ListParams {
    pub(crate) fn to_query(&self) -> BizResult<ListQuery> {
        let mode = self
            .filter
            .as_deref()
            .map(|raw| raw.parse::<FilterMode>().unwrap_or_default())
            .unwrap_or_default();
        Ok(ListQuery {
            mode,
            reference: today_utc(),
            date: parse_date_param("date", self.date.as_deref())?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ReminderLink {
    pub url: String,
}

pub struct AppointmentDescriptor;

impl EntityDescriptor for AppointmentDescriptor {
    fn entity_type(&self) -> &str {
        "appointment"
    }

    fn plural(&self) -> &str {
        "appointments"
    }

    fn build_routes(&self, host: Arc<AppHost>) -> Router {
        Router::new()
            .route("/appointments", get(list_appointments).post(book_appointment))
            .route(
                "/appointments/{id}",
                get(get_appointment)
                    .put(update_appointment)
                    .delete(delete_appointment),
            )
            .route("/appointments/{id}/status", put(set_status))
            .route("/appointments/{id}/reminder", get(reminder_link))
            .with_state(host)
    }
}

pub async fn list_appointments(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Query(params): Query<ListParams>,
) -> BizResult<Json<Vec<Appointment>>> {
    let query = params.to_query()?;
    Ok(Json(host.appointments.list(&ctx, query).await?))
}

pub async fn book_appointment(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Validated(input): Validated<AppointmentInput>,
) -> BizResult<(StatusCode, Json<Appointment>)> {
    let appointment = host.appointments.book(&ctx, input).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn get_appointment(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Path(id): Path<String>,
) -> BizResult<Json<Appointment>> {
    let id = parse_id(&id)?;
    Ok(Json(host.appointments.get(&ctx, &id).await?))
}

pub async fn update_appointment(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Path(id): Path<String>,
    Validated(input): Validated<AppointmentInput>,
) -> BizResult<Json<Appointment>> {
    let id = parse_id(&id)?;
    Ok(Json(host.appointments.update(&ctx, &id, input).await?))
}

pub async fn set_status(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Path(id): Path<String>,
    Validated(update): Validated<StatusUpdate>,
) -> BizResult<Json<Appointment>> {
    let id = parse_id(&id)?;
    Ok(Json(
        host.appointments.set_status(&ctx, &id, update.status).await?,
    ))
}

pub async fn delete_appointment(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Path(id): Path<String>,
) -> BizResult<StatusCode> {
    let id = parse_id(&id)?;
    host.appointments.delete(&ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reminder_link(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Path(id): Path<String>,
) -> BizResult<Json<ReminderLink>> {
    let id = parse_id(&id)?;
    let url = host.appointments.reminder_link(&ctx, &id).await?;
    Ok(Json(ReminderLink { url }))
}
