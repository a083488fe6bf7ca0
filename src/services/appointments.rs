//! Booking, editing and listing appointments

use crate::core::auth::SessionContext;
use crate::core::error::{BizError, BizResult};
use crate::core::validation::validate_input;
use crate::core::{DataService, Entity, FieldValue};
use crate::entities::{Appointment, AppointmentInput, AppointmentStatus};
use crate::schedule::{FilterMode, filter_by_mode, sort_chronological};
use chrono::NaiveDate;
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

/// What a list request asks for
#[derive(Debug, Clone, Copy)]
pub struct ListQuery {
    pub mode: FilterMode,
    /// Reference date for `today` and `upcoming`
    pub reference: NaiveDate,
    pub date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct AppointmentService {
    appointments: Arc<dyn DataService<Appointment>>,
}

impl AppointmentService {
    pub fn new(appointments: Arc<dyn DataService<Appointment>>) -> Self {
        Self { appointments }
    }

    pub async fn book(&self, ctx: &SessionContext, input: AppointmentInput) -> BizResult<Appointment> {
        let input = validate_input(input, "create")?;

        let id = self
            .appointments
            .insert(Appointment::from_input(input, ctx.user_id))
            .await?;
        tracing::info!(user_id = %ctx.user_id, appointment_id = %id, "appointment booked");

        self.get(ctx, &id).await
    }

    /// Missing and foreign appointments are both not-found
    pub async fn get(&self, ctx: &SessionContext, id: &Uuid) -> BizResult<Appointment> {
        self.appointments
            .get(id)
            .await?
            .filter(|a| a.is_owned_by(ctx.user_id))
            .ok_or_else(|| BizError::not_found(Appointment::resource_name_singular(), *id))
    }

    /// Every appointment of the account in `(date, time)` order
    pub async fn all_sorted(&self, ctx: &SessionContext) -> BizResult<Vec<Appointment>> {
        let mut list = self
            .appointments
            .query_by_field("userId", &FieldValue::from(ctx.user_id))
            .await?;
        sort_chronological(&mut list);
        Ok(list)
    }

    /// Sorted, then filtered by the query's mode
    pub async fn list(&self, ctx: &SessionContext, query: ListQuery) -> BizResult<Vec<Appointment>> {
        let list = self.all_sorted(ctx).await?;
        Ok(filter_by_mode(list, query.mode, query.reference, query.date))
    }

    /// Full edit; the status is kept when the input leaves it unset
    pub async fn update(
        &self,
        ctx: &SessionContext,
        id: &Uuid,
        input: AppointmentInput,
    ) -> BizResult<Appointment> {
        let input = validate_input(input, "update")?;
        self.get(ctx, id).await?;

        let mut patch = json!({
            "customerId": input.customer_id,
            "customerName": input.customer_name,
            "phone": input.phone,
            "date": input.date,
            "time": input.time,
            "notes": input.notes,
        });
        if let (Some(status), Value::Object(fields)) = (input.status, &mut patch) {
            fields.insert("status".to_string(), json!(status));
        }

        self.appointments.update(id, patch).await?;
        tracing::info!(user_id = %ctx.user_id, appointment_id = %id, "appointment updated");

        self.get(ctx, id).await
    }

    /// Any status may follow any other
    pub async fn set_status(
        &self,
        ctx: &SessionContext,
        id: &Uuid,
        status: AppointmentStatus,
    ) -> BizResult<Appointment> {
        let current = self.get(ctx, id).await?;

        self.appointments
            .update(id, json!({ "status": status }))
            .await?;
        tracing::info!(
            user_id = %ctx.user_id,
            appointment_id = %id,
            from = %current.status,
            to = %status,
            "appointment status changed"
        );

        self.get(ctx, id).await
    }

    pub async fn delete(&self, ctx: &SessionContext, id: &Uuid) -> BizResult<()> {
        self.get(ctx, id).await?;
        self.appointments.delete(id).await?;
        tracing::info!(user_id = %ctx.user_id, appointment_id = %id, "appointment deleted");
        Ok(())
    }

    pub async fn reminder_link(&self, ctx: &SessionContext, id: &Uuid) -> BizResult<String> {
        Ok(self.get(ctx, id).await?.reminder_link())
    }
}
