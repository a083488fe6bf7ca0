//! Customer roster

use crate::core::auth::SessionContext;
use crate::core::error::{BizError, BizResult};
use crate::core::validation::validate_input;
use crate::core::{DataService, Entity, FieldValue};
use crate::entities::{Customer, NewCustomer};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn DataService<Customer>>,
}

impl CustomerService {
    pub fn new(customers: Arc<dyn DataService<Customer>>) -> Self {
        Self { customers }
    }

    pub async fn add(&self, ctx: &SessionContext, input: NewCustomer) -> BizResult<Customer> {
        let input = validate_input(input, "create")?;

        let id = self
            .customers
            .insert(Customer::from_input(input, ctx.user_id))
            .await?;
        tracing::info!(user_id = %ctx.user_id, customer_id = %id, "customer added");

        self.get(ctx, &id).await
    }

    /// The account's customers, newest first
    pub async fn list(&self, ctx: &SessionContext) -> BizResult<Vec<Customer>> {
        let mut customers = self
            .customers
            .query_by_field("userId", &FieldValue::from(ctx.user_id))
            .await?;
        customers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(customers)
    }

    /// Missing and foreign customers are both not-found
    pub async fn get(&self, ctx: &SessionContext, id: &Uuid) -> BizResult<Customer> {
        self.customers
            .get(id)
            .await?
            .filter(|c| c.is_owned_by(ctx.user_id))
            .ok_or_else(|| BizError::not_found(Customer::resource_name_singular(), *id))
    }
}

/// Case-insensitive match on name, or substring match on phone
///
/// A blank query returns the list unchanged.
pub fn search(list: Vec<Customer>, query: &str) -> Vec<Customer> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return list;
    }

    list.into_iter()
        .filter(|c| c.name.to_lowercase().contains(&query) || c.phone.contains(&query))
        .collect()
}
