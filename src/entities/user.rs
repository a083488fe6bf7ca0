//! Account records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A business account; the owner of every other record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: Uuid,
    /// Lower-cased and trimmed
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl_entity!(
    User,
    "user",
    "users",
    owner: id,
    {
        "email" => email,
        "name" => name,
        "businessName" => business_name,
    }
);

/// The public view of an account, without password material
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub business_name: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&User> for AccountProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            business_name: user.business_name.clone(),
            created_at: user.created_at,
        }
    }
}
