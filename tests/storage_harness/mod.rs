//! Shared test harness for storage collaborators
//!
//! Provides record builders, failing storage doubles, and the
//! `data_service_tests!` contract suite.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod data_service_tests;

use async_trait::async_trait;
use bizbook::core::error::{BizResult, StorageError};
use bizbook::core::{DataService, Entity, FieldValue};
use bizbook::entities::Customer;
use serde_json::Value;
use std::marker::PhantomData;
use uuid::Uuid;

pub fn customer(user_id: Uuid, name: &str, phone: &str) -> Customer {
    Customer {
        id: Uuid::nil(),
        user_id,
        name: name.to_string(),
        phone: phone.to_string(),
        created_at: None,
    }
}

/// A collaborator whose calls never complete
pub struct Stalled<T>(PhantomData<fn() -> T>);

impl<T> Stalled<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for Stalled<T> {
    async fn query_by_field(&self, _field: &str, _value: &FieldValue) -> BizResult<Vec<T>> {
        std::future::pending().await
    }

    async fn get(&self, _id: &Uuid) -> BizResult<Option<T>> {
        std::future::pending().await
    }

    async fn insert(&self, _record: T) -> BizResult<Uuid> {
        std::future::pending().await
    }

    async fn update(&self, _id: &Uuid, _patch: Value) -> BizResult<()> {
        std::future::pending().await
    }

    async fn delete(&self, _id: &Uuid) -> BizResult<()> {
        std::future::pending().await
    }
}

/// A collaborator whose calls fail immediately with a transport error
pub struct Unreachable<T>(PhantomData<fn() -> T>);

impl<T> Unreachable<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

fn refused(operation: &str) -> StorageError {
    StorageError::transport("unreachable", operation, "connection refused")
}

#[async_trait]
impl<T: Entity> DataService<T> for Unreachable<T> {
    async fn query_by_field(&self, _field: &str, _value: &FieldValue) -> BizResult<Vec<T>> {
        Err(refused("query").into())
    }

    async fn get(&self, _id: &Uuid) -> BizResult<Option<T>> {
        Err(refused("get").into())
    }

    async fn insert(&self, _record: T) -> BizResult<Uuid> {
        Err(refused("insert").into())
    }

    async fn update(&self, _id: &Uuid, _patch: Value) -> BizResult<()> {
        Err(refused("update").into())
    }

    async fn delete(&self, _id: &Uuid) -> BizResult<()> {
        Err(refused("delete").into())
    }
}
