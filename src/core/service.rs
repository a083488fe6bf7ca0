//! Storage collaborator trait

use crate::core::Entity;
use crate::core::error::BizResult;
use crate::core::field::FieldValue;
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// Storage for one collection of records.
///
/// Implementations are free to be remote; every call may fail with a
/// transport error. Deadlines are applied by wrapping a service in
/// [`DeadlineDataService`](crate::storage::DeadlineDataService).
#[async_trait]
pub trait DataService<T: Entity>: Send + Sync {
    /// Find all records whose field equals the given value
    async fn query_by_field(&self, field: &str, value: &FieldValue) -> BizResult<Vec<T>>;

    /// Get a record by ID
    async fn get(&self, id: &Uuid) -> BizResult<Option<T>>;

    /// Insert a record, returning its ID
    ///
    /// Storage assigns `created_at`, and a fresh ID when the record's ID is nil.
    async fn insert(&self, record: T) -> BizResult<Uuid>;

    /// Merge a partial JSON object into an existing record
    ///
    /// Keys for `id`, `userId` and `createdAt` are ignored. Fails with
    /// not-found when the record does not exist.
    async fn update(&self, id: &Uuid, patch: Value) -> BizResult<()>;

    /// Delete a record; deleting a missing record is not an error
    async fn delete(&self, id: &Uuid) -> BizResult<()>;
}
