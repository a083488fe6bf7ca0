//! Signup, login, logout and session handlers

use crate::core::auth::SessionContext;
use crate::core::error::BizResult;
use crate::core::validation::{EntityValidationConfig, ValidatableEntity, Validated, filters, validators};
use crate::server::host::AppHost;
use crate::services::{LoginRequest, SignedIn, SignupRequest};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleRequest {
    pub locale: String,
}

impl ValidatableEntity for LocaleRequest {
    fn validation_config(_operation: &str) -> EntityValidationConfig {
        EntityValidationConfig::new("locale")
            .filter("locale", filters::trim())
            .filter("locale", filters::lowercase())
            .validate("locale", validators::required())
    }
}

pub fn routes(host: Arc<AppHost>) -> Router {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(current_session))
        .route("/auth/locale", put(set_locale))
        .with_state(host)
}

pub async fn signup(
    State(host): State<Arc<AppHost>>,
    Validated(request): Validated<SignupRequest>,
) -> BizResult<(StatusCode, Json<SignedIn>)> {
    let signed_in = host.accounts.signup(request).await?;
    Ok((StatusCode::CREATED, Json(signed_in)))
}

pub async fn login(
    State(host): State<Arc<AppHost>>,
    Validated(request): Validated<LoginRequest>,
) -> BizResult<Json<SignedIn>> {
    Ok(Json(host.accounts.login(request).await?))
}

pub async fn logout(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
) -> BizResult<StatusCode> {
    host.accounts.logout(&ctx)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn current_session(ctx: SessionContext) -> Json<SessionContext> {
    Json(ctx)
}

pub async fn set_locale(
    State(host): State<Arc<AppHost>>,
    ctx: SessionContext,
    Validated(request): Validated<LocaleRequest>,
) -> BizResult<Json<SessionContext>> {
    Ok(Json(host.accounts.set_locale(&ctx, &request.locale)?))
}
