//! Invoicing manager.
//!
//! # Responsibility
//! - Orchestrate invoice creation against an existing appointment.
//!
//! # Invariants
//! - The existence pre-check via the appointment repository and the
//!   store-level foreign key must each independently reject an invoice
//!   for a missing appointment.
//! - No invoice row is attempted when the pre-check fails.

use crate::capability::{Clock, EmailSender};
use crate::model::invoice::{validate_amount, Invoice, NewInvoice};
use crate::repo::{AppointmentRepository, InvoiceListQuery, InvoiceRepository, RepoResult};
use chrono::NaiveDateTime;
use log::{info, warn};
use std::sync::Arc;

/// Typed result of a successful invoicing call.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceReceipt {
    pub id: i64,
    pub issued_at: NaiveDateTime,
    pub amount: f64,
    /// False when the post-commit receipt email failed; the invoice row
    /// stays committed.
    pub email_sent: bool,
}

/// Invoice orchestration over injected capabilities.
pub struct BillingManager<A, I> {
    clock: Arc<dyn Clock>,
    email: Arc<dyn EmailSender>,
    appointments: A,
    invoices: I,
}

impl<A: AppointmentRepository, I: InvoiceRepository> BillingManager<A, I> {
    pub fn new(
        clock: Arc<dyn Clock>,
        email: Arc<dyn EmailSender>,
        appointments: A,
        invoices: I,
    ) -> Self {
        Self {
            clock,
            email,
            appointments,
            invoices,
        }
    }

    /// Raises an unpaid invoice against an existing appointment.
    ///
    /// # Contract
    /// - `amount` must be finite and non-negative.
    /// - Fails with `RepoError::NotFound` before any write when the
    ///   appointment does not exist.
    pub fn create_invoice(&self, appointment_id: i64, amount: f64) -> RepoResult<InvoiceReceipt> {
        validate_amount(amount)?;

        // Defensive pre-check; the schema foreign key remains authoritative
        // at insert time.
        let appointment = self.appointments.get(appointment_id)?;

        let issued_at = self.clock.now();
        let id = self
            .invoices
            .create(&NewInvoice::unpaid(appointment_id, amount, issued_at))?;
        info!(
            "event=invoice_create module=service status=ok id={id} appointment_id={appointment_id} amount={amount}"
        );

        let email_sent = match self.email.send(
            &appointment.email,
            &format!("Invoice #{id} - AutoShop"),
            &format!("Amount due: ${amount:.2}\n"),
        ) {
            Ok(()) => true,
            Err(err) => {
                warn!("event=invoice_email module=service status=error id={id} error={err}");
                false
            }
        };

        Ok(InvoiceReceipt {
            id,
            issued_at,
            amount,
            email_sent,
        })
    }

    /// Raises an invoice priced from the appointment's booked service.
    pub fn invoice_for_appointment(&self, appointment_id: i64) -> RepoResult<InvoiceReceipt> {
        let appointment = self.appointments.get(appointment_id)?;
        self.create_invoice(appointment_id, appointment.service_type.base_price())
    }

    /// Gets one invoice by id.
    pub fn get_invoice(&self, id: i64) -> RepoResult<Invoice> {
        self.invoices.get(id)
    }

    /// Lists invoices using filter and pagination options.
    pub fn list_invoices(&self, query: &InvoiceListQuery) -> RepoResult<Vec<Invoice>> {
        self.invoices.list(query)
    }

    /// First invoice raised against the given appointment, if any.
    pub fn find_by_appointment(&self, appointment_id: i64) -> RepoResult<Option<Invoice>> {
        self.invoices.find_by_appointment(appointment_id)
    }

    /// Marks an invoice as paid.
    pub fn mark_invoice_paid(&self, id: i64) -> RepoResult<()> {
        self.invoices.mark_paid(id)?;
        info!("event=invoice_paid module=service status=ok id={id}");
        Ok(())
    }
}
