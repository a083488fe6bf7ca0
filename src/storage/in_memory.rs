//! In-memory implementation of DataService for testing and development

use crate::core::error::{BizError, BizResult, StorageError};
use crate::core::{DataService, Entity, FieldValue};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

const BACKEND: &str = "in-memory";

/// Keys a patch may never overwrite
const PROTECTED_KEYS: &[&str] = &["id", "userId", "createdAt"];

struct Collection<T> {
    records: HashMap<Uuid, T>,
    last_created: Option<DateTime<Utc>>,
}

impl<T> Collection<T> {
    /// Creation timestamps are strictly increasing within a collection
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let at = match self.last_created {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created = Some(at);
        at
    }
}

/// In-memory data service implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// the lock is held only for a single map operation.
#[derive(Clone)]
pub struct InMemoryDataService<T> {
    collection: Arc<RwLock<Collection<T>>>,
}

impl<T> InMemoryDataService<T> {
    pub fn new() -> Self {
        Self {
            collection: Arc::new(RwLock::new(Collection {
                records: HashMap::new(),
                last_created: None,
            })),
        }
    }
}

impl<T> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(operation: &str, e: impl std::fmt::Display) -> BizError {
    StorageError::transport(BACKEND, operation, format!("Failed to acquire lock: {}", e)).into()
}

#[async_trait]
impl<T: Entity> DataService<T> for InMemoryDataService<T> {
    async fn query_by_field(&self, field: &str, value: &FieldValue) -> BizResult<Vec<T>> {
        let collection = self
            .collection
            .read()
            .map_err(|e| lock_error("query", e))?;

        let mut matches: Vec<T> = collection
            .records
            .values()
            .filter(|record| record.field_value(field).as_ref() == Some(value))
            .cloned()
            .collect();
        matches.sort_by_key(|record| record.created_at());

        Ok(matches)
    }

    async fn get(&self, id: &Uuid) -> BizResult<Option<T>> {
        let collection = self.collection.read().map_err(|e| lock_error("get", e))?;

        Ok(collection.records.get(id).cloned())
    }

    async fn insert(&self, mut record: T) -> BizResult<Uuid> {
        let mut collection = self
            .collection
            .write()
            .map_err(|e| lock_error("insert", e))?;

        if record.id().is_nil() {
            record.set_id(Uuid::new_v4());
        }
        let created_at = collection.next_created_at();
        record.set_created_at(created_at);

        let id = record.id();
        collection.records.insert(id, record);

        tracing::debug!(collection = T::resource_name(), %id, "record inserted");
        Ok(id)
    }

    async fn update(&self, id: &Uuid, patch: Value) -> BizResult<()> {
        let Value::Object(patch) = patch else {
            return Err(BizError::invalid_field(
                T::resource_name_singular(),
                "update patch must be a JSON object",
            ));
        };

        let mut collection = self
            .collection
            .write()
            .map_err(|e| lock_error("update", e))?;

        let existing = collection
            .records
            .get(id)
            .ok_or_else(|| BizError::not_found(T::resource_name_singular(), *id))?;

        let mut merged = serde_json::to_value(existing).map_err(|e| StorageError::Integrity {
            message: e.to_string(),
        })?;
        if let Value::Object(fields) = &mut merged {
            for (key, value) in patch {
                if !PROTECTED_KEYS.contains(&key.as_str()) {
                    fields.insert(key, value);
                }
            }
        }

        let updated: T = serde_json::from_value(merged).map_err(|e| StorageError::Integrity {
            message: format!("patch does not fit a {}: {}", T::resource_name_singular(), e),
        })?;
        collection.records.insert(*id, updated);

        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> BizResult<()> {
        let mut collection = self
            .collection
            .write()
            .map_err(|e| lock_error("delete", e))?;

        collection.records.remove(id);

        Ok(())
    }
}
