//! Entity trait shared by every stored record

use crate::core::field::FieldValue;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Base trait for all stored records.
///
/// Every record has:
/// - id: Unique identifier, assigned by storage when nil
/// - user_id: The owning account
/// - created_at: Assigned by storage on insert
///
/// Implementations are normally generated with [`impl_entity!`](crate::impl_entity).
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The collection name (e.g., "appointments")
    fn resource_name() -> &'static str;

    /// The singular name used in error messages (e.g., "appointment")
    fn resource_name_singular() -> &'static str;

    fn id(&self) -> Uuid;

    fn set_id(&mut self, id: Uuid);

    /// The account this record belongs to
    fn user_id(&self) -> Uuid;

    fn created_at(&self) -> Option<DateTime<Utc>>;

    fn set_created_at(&mut self, at: DateTime<Utc>);

    /// Get the value of a queryable field by its JSON name
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Check whether the record belongs to the given account
    fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id() == user_id
    }
}
