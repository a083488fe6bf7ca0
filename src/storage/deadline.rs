//! Deadline wrapper for storage calls
//!
//! An elapsed deadline becomes [`StorageError::Timeout`], which callers can
//! tell apart from a transport failure. The inner call is dropped, not rolled
//! back.

use crate::core::error::{BizResult, StorageError};
use crate::core::{DataService, Entity, FieldValue};
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct DeadlineDataService<T: Entity> {
    inner: Arc<dyn DataService<T>>,
    deadline: Duration,
    _record: PhantomData<fn() -> T>,
}

impl<T: Entity> DeadlineDataService<T> {
    pub fn new(inner: Arc<dyn DataService<T>>, deadline: Duration) -> Self {
        Self {
            inner,
            deadline,
            _record: PhantomData,
        }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    async fn guard<R>(
        &self,
        operation: &str,
        call: impl Future<Output = BizResult<R>> + Send,
    ) -> BizResult<R> {
        match tokio::time::timeout(self.deadline, call).await {
            Ok(result) => result,
            Err(_) => {
                let operation = format!("{}.{}", T::resource_name(), operation);
                tracing::warn!(
                    operation = %operation,
                    after_secs = self.deadline.as_secs(),
                    "storage call timed out"
                );
                Err(StorageError::Timeout {
                    operation,
                    after: self.deadline,
                }
                .into())
            }
        }
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for DeadlineDataService<T> {
    async fn query_by_field(&self, field: &str, value: &FieldValue) -> BizResult<Vec<T>> {
        self.guard("query", self.inner.query_by_field(field, value))
            .await
    }

    async fn get(&self, id: &Uuid) -> BizResult<Option<T>> {
        self.guard("get", self.inner.get(id)).await
    }

    async fn insert(&self, record: T) -> BizResult<Uuid> {
        self.guard("insert", self.inner.insert(record)).await
    }

    async fn update(&self, id: &Uuid, patch: Value) -> BizResult<()> {
        self.guard("update", self.inner.update(id, patch)).await
    }

    async fn delete(&self, id: &Uuid) -> BizResult<()> {
        self.guard("delete", self.inner.delete(id)).await
    }
}
