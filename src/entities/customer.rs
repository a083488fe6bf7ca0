//! Customer roster records

use crate::core::validation::{EntityValidationConfig, ValidatableEntity, filters, validators};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A customer on an account's roster; immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl_entity!(
    Customer,
    "customer",
    "customers",
    owner: user_id,
    {
        "userId" => user_id,
        "name" => name,
        "phone" => phone,
    }
);

/// Payload for adding a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

impl ValidatableEntity for NewCustomer {
    fn validation_config(_operation: &str) -> EntityValidationConfig {
        EntityValidationConfig::new("customer")
            .filter("name", filters::trim())
            .filter("phone", filters::trim())
            .validate("name", validators::required())
            .validate("phone", validators::required())
    }
}

impl Customer {
    pub fn from_input(input: NewCustomer, user_id: Uuid) -> Self {
        Self {
            id: Uuid::nil(),
            user_id,
            name: input.name,
            phone: input.phone,
            created_at: None,
        }
    }
}
