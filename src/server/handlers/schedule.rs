//! Calendar and dashboard views over an account's appointments

use super::appointments::ListParams;
use super::parse_date_param;
use crate::core::auth::SessionContext;
use crate::core::error::{BizError, BizResult};
use crate::entities::Appointment;
use crate::schedule::{
    DateGroup, DayCount, appointments_on, calendar_strip, counts_by_date, group_by_date, today_utc,
};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::AppHost;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// `?center=YYYY-MM-DD&offset=N`; center defaults to today
#[derive(Debug, Default, Deserialize)]
pub struct WeekParams {
    pub center: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DayParams {
    pub date: Option<String>,
}

pub struct ScheduleDescriptor;

impl EntityDescriptor for ScheduleDescriptor {
    fn entity_type(&self) -> &str {
        "schedule"
    }

    fn plural(&self) -> &str {
        "schedule"
    }

    fn build_routes(&self, host: Arc<AppHost>) -> Router {
        Router::new()
            .route("/schedule/week", get(week))
            .route("/schedule/day", get(day))
            .route("/schedule/groups", get(groups))
            .route("/schedule/counts", get(counts))
            .with_state(host)
    }
}

fn parse_offset(raw: Option<&str>) -> BizResult<i64> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(0),
        Some(raw) => raw.parse().map_err(|_| {
            BizError::invalid_field("offset", format!("'offset' must be a whole number of weeks (current value: {})", raw))
        }),
    }
}

pub async fn week(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Query(params): Query<WeekParams>,
) -> BizResult<Json<Vec<DayCount>>> {
    let center = parse_date_param("center", params.center.as_deref())?.unwrap_or_else(today_utc);
    let offset = parse_offset(params.offset.as_deref())?;

    let all = host.appointments.all_sorted(&ctx).await?;
    Ok(Json(calendar_strip(&all, center, offset)))
}

pub async fn day(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Query(params): Query<DayParams>,
) -> BizResult<Json<Vec<Appointment>>> {
    let date = parse_date_param("date", params.date.as_deref())?.unwrap_or_else(today_utc);

    let all = host.appointments.all_sorted(&ctx).await?;
    Ok(Json(appointments_on(&all, date)))
}

pub async fn groups(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Query(params): Query<ListParams>,
) -> BizResult<Json<Vec<DateGroup>>> {
    let query = params.to_query()?;
    let list = host.appointments.list(&ctx, query).await?;
    Ok(Json(group_by_date(&list)))
}

pub async fn counts(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
) -> BizResult<Json<BTreeMap<String, usize>>> {
    let all = host.appointments.all_sorted(&ctx).await?;
    Ok(Json(counts_by_date(&all)))
}
