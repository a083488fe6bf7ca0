//! Invoice allocation and creation

use crate::billing::draft::PREVIEW;
use crate::billing::{InvoiceAmounts, InvoiceDraft, build_invoice, next_invoice_number};
use crate::config::BillingConfig;
use crate::core::auth::SessionContext;
use crate::core::error::{BizError, BizResult};
use crate::core::validation::validate_input;
use crate::core::{DataService, Entity, FieldValue};
use crate::entities::{Appointment, Invoice};
use crate::schedule::aggregate::date_key;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct InvoiceService {
    invoices: Arc<dyn DataService<Invoice>>,
    appointments: Arc<dyn DataService<Appointment>>,
    billing: BillingConfig,
}

impl InvoiceService {
    pub fn new(
        invoices: Arc<dyn DataService<Invoice>>,
        appointments: Arc<dyn DataService<Appointment>>,
        billing: BillingConfig,
    ) -> Self {
        Self {
            invoices,
            appointments,
            billing,
        }
    }

    async fn account_invoices(&self, ctx: &SessionContext) -> BizResult<Vec<Invoice>> {
        self.invoices
            .query_by_field("userId", &FieldValue::from(ctx.user_id))
            .await
    }

    async fn owned_appointment(&self, ctx: &SessionContext, id: &Uuid) -> BizResult<Appointment> {
        self.appointments
            .get(id)
            .await?
            .filter(|a| a.is_owned_by(ctx.user_id))
            .ok_or_else(|| BizError::not_found(Appointment::resource_name_singular(), *id))
    }

    /// The number the next invoice created on `today` would get
    pub async fn next_number(&self, ctx: &SessionContext, today: NaiveDate) -> BizResult<String> {
        let existing = self.account_invoices(ctx).await?;
        Ok(next_invoice_number(&existing, today))
    }

    /// Unrounded amounts for a draft being edited
    pub fn preview(&self, draft: InvoiceDraft) -> BizResult<InvoiceAmounts> {
        let draft = validate_input(draft, PREVIEW)?.with_defaults(&self.billing);
        Ok(draft.amounts())
    }

    /// Allocate a number, compute and round the amounts, and store the invoice
    ///
    /// The number scan and the insert are not atomic; concurrent creations
    /// for one account can collide within a period.
    pub async fn create(
        &self,
        ctx: &SessionContext,
        draft: InvoiceDraft,
        today: NaiveDate,
    ) -> BizResult<Invoice> {
        let draft = validate_input(draft, "create")?.with_defaults(&self.billing);

        if let Some(appointment_id) = &draft.appointment_id {
            self.owned_appointment(ctx, appointment_id).await?;
        }

        let existing = self.account_invoices(ctx).await?;
        let number = next_invoice_number(&existing, today);
        tracing::debug!(
            user_id = %ctx.user_id,
            scanned = existing.len(),
            number = %number,
            "invoice number allocated"
        );

        let id = self
            .invoices
            .insert(build_invoice(draft, ctx.user_id, number))
            .await?;
        let invoice = self.get(ctx, &id).await?;
        tracing::info!(
            user_id = %ctx.user_id,
            invoice_id = %id,
            number = %invoice.invoice_number,
            total = invoice.total_amount,
            "invoice created"
        );

        Ok(invoice)
    }

    /// The account's invoices, newest first
    pub async fn list(&self, ctx: &SessionContext) -> BizResult<Vec<Invoice>> {
        let mut invoices = self.account_invoices(ctx).await?;
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invoices)
    }

    pub async fn get(&self, ctx: &SessionContext, id: &Uuid) -> BizResult<Invoice> {
        self.invoices
            .get(id)
            .await?
            .filter(|i| i.is_owned_by(ctx.user_id))
            .ok_or_else(|| BizError::not_found(Invoice::resource_name_singular(), *id))
    }

    /// A fresh draft, prefilled from the session and optionally an appointment
    pub async fn draft_for_appointment(
        &self,
        ctx: &SessionContext,
        appointment_id: Option<Uuid>,
        today: NaiveDate,
    ) -> BizResult<InvoiceDraft> {
        let mut draft = InvoiceDraft {
            date: date_key(today),
            seller_name: ctx.display_name().to_string(),
            ..Default::default()
        }
        .with_defaults(&self.billing);

        if let Some(id) = appointment_id {
            let appointment = self.owned_appointment(ctx, &id).await?;
            draft.buyer_name = appointment.customer_name;
            draft.buyer_phone = Some(appointment.phone).filter(|p| !p.is_empty());
            draft.appointment_id = Some(id);
        }

        Ok(draft)
    }
}
