//! Macro-generated contract suite for `DataService<Customer>` implementations.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use bizbook::storage::InMemoryDataService;
//!
//! data_service_tests!(InMemoryDataService::<Customer>::new());
//! ```
//!
//! # Generated Tests
//!
//! - insert/get, nil id assignment, creation order
//! - query by owner and by string field, unknown field
//! - update merge, protected keys, missing record, non-object patch
//! - delete, delete of a missing record
//! - concurrent inserts

/// Generate the contract suite.
///
/// `$factory` is re-evaluated for each test so every test gets a fresh store.
#[macro_export]
macro_rules! data_service_tests {
    ($factory:expr) => {
        mod data_service_contract_tests {
            use super::*;
            use bizbook::core::{DataService, FieldValue};
            use bizbook::entities::Customer;
            use serde_json::json;
            use std::sync::Arc;
            use uuid::Uuid;

            // ==================================================================
            // Insert & Get
            // ==================================================================

            #[tokio::test]
            async fn test_insert_and_get() {
                let service = $factory;
                let owner = Uuid::new_v4();

                let id = service
                    .insert(customer(owner, "Asha Rao", "+91 98765 43210"))
                    .await
                    .unwrap();
                assert!(!id.is_nil());

                let stored = service.get(&id).await.unwrap().expect("record should exist");
                assert_eq!(stored.id, id);
                assert_eq!(stored.user_id, owner);
                assert_eq!(stored.name, "Asha Rao");
                assert_eq!(stored.phone, "+91 98765 43210");
                assert!(stored.created_at.is_some());
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let service = $factory;
                assert!(service.get(&Uuid::new_v4()).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_insert_keeps_supplied_id() {
                let service = $factory;
                let mut record = customer(Uuid::new_v4(), "Ravi", "900");
                record.id = Uuid::new_v4();

                let id = service.insert(record.clone()).await.unwrap();
                assert_eq!(id, record.id);
            }

            // ==================================================================
            // Query
            // ==================================================================

            #[tokio::test]
            async fn test_query_by_owner_in_creation_order() {
                let service = $factory;
                let owner = Uuid::new_v4();
                let other = Uuid::new_v4();

                for name in ["first", "second", "third"] {
                    service.insert(customer(owner, name, "1")).await.unwrap();
                }
                service.insert(customer(other, "foreign", "2")).await.unwrap();

                let mine = service
                    .query_by_field("userId", &FieldValue::from(owner))
                    .await
                    .unwrap();
                let names: Vec<&str> = mine.iter().map(|c| c.name.as_str()).collect();
                assert_eq!(names, vec!["first", "second", "third"]);
                assert!(mine.windows(2).all(|w| w[0].created_at < w[1].created_at));
            }

            #[tokio::test]
            async fn test_query_string_field() {
                let service = $factory;
                let owner = Uuid::new_v4();
                service.insert(customer(owner, "Asha", "111")).await.unwrap();
                service.insert(customer(owner, "Ravi", "222")).await.unwrap();

                let found = service
                    .query_by_field("phone", &FieldValue::from("222"))
                    .await
                    .unwrap();
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].name, "Ravi");
            }

            #[tokio::test]
            async fn test_query_unknown_field_matches_nothing() {
                let service = $factory;
                service
                    .insert(customer(Uuid::new_v4(), "Asha", "111"))
                    .await
                    .unwrap();

                let found = service
                    .query_by_field("nickname", &FieldValue::from("Asha"))
                    .await
                    .unwrap();
                assert!(found.is_empty());
            }

            // ==================================================================
            // Update
            // ==================================================================

            #[tokio::test]
            async fn test_update_merges_fields() {
                let service = $factory;
                let id = service
                    .insert(customer(Uuid::new_v4(), "Asha", "111"))
                    .await
                    .unwrap();

                service.update(&id, json!({ "phone": "999" })).await.unwrap();

                let stored = service.get(&id).await.unwrap().unwrap();
                assert_eq!(stored.phone, "999");
                assert_eq!(stored.name, "Asha");
            }

            #[tokio::test]
            async fn test_update_ignores_protected_keys() {
                let service = $factory;
                let owner = Uuid::new_v4();
                let id = service.insert(customer(owner, "Asha", "111")).await.unwrap();
                let before = service.get(&id).await.unwrap().unwrap();

                service
                    .update(
                        &id,
                        json!({
                            "id": Uuid::new_v4(),
                            "userId": Uuid::new_v4(),
                            "createdAt": "2001-01-01T00:00:00Z",
                            "name": "Asha R"
                        }),
                    )
                    .await
                    .unwrap();

                let after = service.get(&id).await.unwrap().unwrap();
                assert_eq!(after.id, id);
                assert_eq!(after.user_id, owner);
                assert_eq!(after.created_at, before.created_at);
                assert_eq!(after.name, "Asha R");
            }

            #[tokio::test]
            async fn test_update_nonexistent_is_not_found() {
                let service = $factory;
                let err = service
                    .update(&Uuid::new_v4(), json!({ "name": "x" }))
                    .await
                    .unwrap_err();
                assert!(err.is_not_found());
            }

            #[tokio::test]
            async fn test_update_rejects_non_object_patch() {
                let service = $factory;
                let id = service
                    .insert(customer(Uuid::new_v4(), "Asha", "111"))
                    .await
                    .unwrap();

                let err = service.update(&id, json!(["name"])).await.unwrap_err();
                assert!(err.is_validation());
            }

            // ==================================================================
            // Delete
            // ==================================================================

            #[tokio::test]
            async fn test_delete_existing() {
                let service = $factory;
                let id = service
                    .insert(customer(Uuid::new_v4(), "Asha", "111"))
                    .await
                    .unwrap();

                service.delete(&id).await.unwrap();
                assert!(service.get(&id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_nonexistent_is_ok() {
                let service = $factory;
                assert!(service.delete(&Uuid::new_v4()).await.is_ok());
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_inserts() {
                let service: Arc<dyn DataService<Customer>> = Arc::new($factory);
                let owner = Uuid::new_v4();

                let mut handles = Vec::new();
                for i in 0..10 {
                    let service = service.clone();
                    handles.push(tokio::spawn(async move {
                        service
                            .insert(customer(owner, &format!("c{i}"), "1"))
                            .await
                            .unwrap()
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }

                let all = service
                    .query_by_field("userId", &FieldValue::from(owner))
                    .await
                    .unwrap();
                assert_eq!(all.len(), 10);
                assert!(all.windows(2).all(|w| w[0].created_at < w[1].created_at));
            }
        }
    };
}
