//! Signup, login and logout

use crate::config::AuthConfig;
use crate::core::auth::{Locale, SessionContext, SessionStore};
use crate::core::error::{BizError, BizResult, EntityError, RequestError};
use crate::core::field::FieldFormat;
use crate::core::password::{PasswordHash, hash_password, verify_password};
use crate::core::validation::{
    EntityValidationConfig, ValidatableEntity, filters, validate_input, validators,
};
use crate::core::{DataService, Entity, FieldValue};
use crate::entities::{AccountProfile, User};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub business_name: String,
}

impl ValidatableEntity for SignupRequest {
    fn validation_config(_operation: &str) -> EntityValidationConfig {
        EntityValidationConfig::new("signup")
            .filter("email", filters::trim())
            .filter("email", filters::lowercase())
            .filter("name", filters::trim())
            .filter("businessName", filters::trim())
            .validate("email", validators::required())
            .validate("email", validators::format(FieldFormat::Email, "an email address"))
            .validate("password", validators::required())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl ValidatableEntity for LoginRequest {
    fn validation_config(_operation: &str) -> EntityValidationConfig {
        EntityValidationConfig::new("login")
            .filter("email", filters::trim())
            .filter("email", filters::lowercase())
            .validate("email", validators::required())
            .validate("password", validators::required())
    }
}

/// Result of a successful signup or login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedIn {
    pub token: Uuid,
    pub session: SessionContext,
    pub account: AccountProfile,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn DataService<User>>,
    sessions: SessionStore,
    config: AuthConfig,
}

impl AccountService {
    pub fn new(users: Arc<dyn DataService<User>>, sessions: SessionStore, config: AuthConfig) -> Self {
        Self {
            users,
            sessions,
            config,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    async fn find_by_email(&self, email: &str) -> BizResult<Option<User>> {
        let found = self
            .users
            .query_by_field("email", &FieldValue::from(email))
            .await?
            .into_iter()
            .next();
        tracing::debug!(found = found.is_some(), "user lookup by email");
        Ok(found)
    }

    // PBKDF2 runs on the blocking pool

    async fn hash(&self, password: String) -> BizResult<PasswordHash> {
        let iterations = self.config.pbkdf2_iterations;
        tokio::task::spawn_blocking(move || hash_password(&password, iterations))
            .await
            .map_err(|e| BizError::Internal(format!("password hashing task failed: {}", e)))
    }

    async fn verify(&self, password: String, user: &User) -> BizResult<bool> {
        let iterations = self.config.pbkdf2_iterations;
        let hash = user.password_hash.clone();
        let salt = user.salt.clone();
        tokio::task::spawn_blocking(move || verify_password(&password, &hash, &salt, iterations))
            .await
            .map_err(|e| BizError::Internal(format!("password check task failed: {}", e)))
    }

    /// Create an account and open its first session
    pub async fn signup(&self, request: SignupRequest) -> BizResult<SignedIn> {
        let request = validate_input(request, "create")?;

        if self.find_by_email(&request.email).await?.is_some() {
            tracing::info!("signup rejected: email already registered");
            return Err(EntityError::AlreadyExists {
                entity_type: "user".to_string(),
                message: "This email is already registered.".to_string(),
            }
            .into());
        }

        let min = self.config.min_password_length;
        if request.password.chars().count() < min {
            return Err(BizError::invalid_field(
                "password",
                format!("Password should be at least {} characters.", min),
            ));
        }

        let stored = self.hash(request.password).await?;
        let user = User {
            id: Uuid::nil(),
            email: request.email,
            password_hash: stored.hash,
            salt: stored.salt,
            name: request.name,
            business_name: request.business_name,
            created_at: None,
        };

        let id = self.users.insert(user).await?;
        let user = self.users.get(&id).await?.ok_or_else(|| {
            BizError::Internal(format!("user {} missing right after insert", id))
        })?;
        tracing::info!(user_id = %id, "account created");

        self.open_session(&user)
    }

    /// Check credentials and open a session
    ///
    /// Unknown emails and wrong passwords fail the same way.
    pub async fn login(&self, request: LoginRequest) -> BizResult<SignedIn> {
        let request = validate_input(request, "create")?;

        let Some(user) = self.find_by_email(&request.email).await? else {
            return Err(RequestError::InvalidCredentials.into());
        };

        if !self.verify(request.password, &user).await? {
            tracing::info!(user_id = %user.id, "login rejected");
            return Err(RequestError::InvalidCredentials.into());
        }

        tracing::info!(user_id = %user.id, "login");
        self.open_session(&user)
    }

    pub fn logout(&self, ctx: &SessionContext) -> BizResult<()> {
        self.sessions.close(&ctx.token)?;
        tracing::info!(user_id = %ctx.user_id, "logout");
        Ok(())
    }

    /// Switch the session's interface language; unsupported values become `en`
    pub fn set_locale(&self, ctx: &SessionContext, locale: &str) -> BizResult<SessionContext> {
        self.sessions
            .set_locale(&ctx.token, Locale::parse_lenient(locale))
    }

    pub async fn profile(&self, ctx: &SessionContext) -> BizResult<AccountProfile> {
        let user = self
            .users
            .get(&ctx.user_id)
            .await?
            .ok_or_else(|| BizError::not_found(User::resource_name_singular(), ctx.user_id))?;
        Ok(AccountProfile::from(&user))
    }

    fn open_session(&self, user: &User) -> BizResult<SignedIn> {
        let session = self.sessions.open(user)?;
        Ok(SignedIn {
            token: session.token,
            session,
            account: AccountProfile::from(user),
        })
    }
}
