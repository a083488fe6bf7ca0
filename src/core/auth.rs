//! Session context for authenticated requests
//!
//! A session is opened on signup or login and closed on logout. Every
//! account-scoped operation receives the [`SessionContext`] explicitly; there
//! is no ambient "current user".

use crate::core::error::{BizError, BizResult, RequestError};
use crate::entities::User;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Interface language carried by a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Hi,
}

impl Locale {
    /// Any unsupported locale falls back to English
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for Locale {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "hi" => Ok(Locale::Hi),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Hi => write!(f, "hi"),
        }
    }
}

/// Everything a request handler knows about the signed-in account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub token: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub business_name: String,
    pub locale: Locale,
    pub started_at: DateTime<Utc>,
}

impl SessionContext {
    /// Seller name used to prefill invoices
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.business_name
        } else {
            &self.name
        }
    }
}

/// Open sessions keyed by bearer token
///
/// With a lifetime set, a session stops resolving once it is older than the
/// lifetime, and expired sessions are dropped whenever a new one opens.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionContext>>>,
    ttl: Option<TimeDelta>,
}

impl SessionStore {
    /// Sessions last until logout
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: TimeDelta) -> Self {
        Self {
            sessions: Arc::default(),
            ttl: Some(ttl),
        }
    }

    pub fn ttl(&self) -> Option<TimeDelta> {
        self.ttl
    }

    fn is_live(&self, ctx: &SessionContext, now: DateTime<Utc>) -> bool {
        match self.ttl {
            Some(ttl) => now - ctx.started_at < ttl,
            None => true,
        }
    }

    /// Drop sessions that have outlived the lifetime; returns how many went
    pub fn prune_expired_at(&self, now: DateTime<Utc>) -> BizResult<usize> {
        if self.ttl.is_none() {
            return Ok(0);
        }
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| BizError::Internal(format!("Failed to acquire write lock: {}", e)))?;
        let before = sessions.len();
        sessions.retain(|_, ctx| self.is_live(ctx, now));
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, "expired sessions dropped");
        }
        Ok(pruned)
    }

    pub fn len(&self) -> BizResult<usize> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| BizError::Internal(format!("Failed to acquire read lock: {}", e)))?;
        Ok(sessions.len())
    }

    pub fn is_empty(&self) -> BizResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Start a session for an account
    pub fn open(&self, user: &User) -> BizResult<SessionContext> {
        let context = SessionContext {
            token: Uuid::new_v4(),
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            business_name: user.business_name.clone(),
            locale: Locale::default(),
            started_at: Utc::now(),
        };
        self.prune_expired_at(context.started_at)?;

        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| BizError::Internal(format!("Failed to acquire write lock: {}", e)))?;
        sessions.insert(context.token, context.clone());

        tracing::debug!(user_id = %user.id, "session opened");
        Ok(context)
    }

    pub fn resolve(&self, token: &Uuid) -> BizResult<Option<SessionContext>> {
        self.resolve_at(token, Utc::now())
    }

    /// Look up a session as of `now`; expired sessions resolve to `None`
    pub fn resolve_at(&self, token: &Uuid, now: DateTime<Utc>) -> BizResult<Option<SessionContext>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| BizError::Internal(format!("Failed to acquire read lock: {}", e)))?;
        Ok(sessions
            .get(token)
            .filter(|ctx| self.is_live(ctx, now))
            .cloned())
    }

    /// End a session; returns whether it existed
    pub fn close(&self, token: &Uuid) -> BizResult<bool> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| BizError::Internal(format!("Failed to acquire write lock: {}", e)))?;
        let existed = sessions.remove(token);
        if let Some(ctx) = &existed {
            tracing::debug!(user_id = %ctx.user_id, "session closed");
        }
        Ok(existed.is_some())
    }

    pub fn set_locale(&self, token: &Uuid, locale: Locale) -> BizResult<SessionContext> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| BizError::Internal(format!("Failed to acquire write lock: {}", e)))?;
        let now = Utc::now();
        let ctx = sessions
            .get_mut(token)
            .filter(|ctx| self.is_live(ctx, now))
            .ok_or_else(|| RequestError::Unauthorized {
                message: "session has ended".to_string(),
            })?;
        ctx.locale = locale;
        Ok(ctx.clone())
    }
}

/// Read the bearer token from an `Authorization` header value
pub fn parse_bearer(header: &str) -> BizResult<Uuid> {
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| RequestError::Unauthorized {
            message: "expected a Bearer token".to_string(),
        })?;
    Uuid::parse_str(token.trim()).map_err(|_| {
        BizError::Request(RequestError::Unauthorized {
            message: "malformed session token".to_string(),
        })
    })
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
    SessionStore: FromRef<S>,
{
    type Rejection = BizError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| RequestError::MissingHeader {
                header: AUTHORIZATION.to_string(),
            })?;
        let token = parse_bearer(header)?;

        SessionStore::from_ref(state)
            .resolve(&token)?
            .ok_or_else(|| {
                BizError::Request(RequestError::Unauthorized {
                    message: "session has ended".to_string(),
                })
            })
    }
}
