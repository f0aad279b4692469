//! Appointment booking manager.
//!
//! # Responsibility
//! - Orchestrate appointment creation: validate, timestamp, persist,
//!   then confirm via email and notification.
//!
//! # Invariants
//! - Step order is fixed: validation → clock read → transactional persist
//!   → post-commit delivery. A persistence failure rolls back and no
//!   delivery call is made.
//! - `created_at` comes exclusively from the injected clock.

use crate::capability::{Clock, EmailSender, Notifier};
use crate::model::appointment::{
    validate_email, Appointment, AppointmentStatus, NewAppointment, ServiceType,
};
use crate::model::{ValidationError, DATE_FORMAT};
use crate::repo::{AppointmentListQuery, AppointmentRepository, RepoResult};
use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};
use std::sync::Arc;

/// Policy for the requested appointment date.
///
/// The default accepts past dates; `RejectPast` requires the date to be on
/// or after the injected clock's current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePolicy {
    #[default]
    AllowPast,
    RejectPast,
}

/// Raw booking input as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentRequest {
    pub client_name: String,
    pub email: String,
    /// Storage spelling of the service, e.g. `oil_change`.
    pub service_type: String,
    /// Calendar date in `%Y-%m-%d` form.
    pub date: String,
}

/// Typed result of a successful booking.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentConfirmation {
    pub id: i64,
    pub status: AppointmentStatus,
    pub created_at: NaiveDateTime,
    /// False when the post-commit confirmation email failed; the booking
    /// itself stays committed.
    pub email_sent: bool,
}

/// Appointment orchestration over injected capabilities.
pub struct AutoServiceManager<R> {
    clock: Arc<dyn Clock>,
    email: Arc<dyn EmailSender>,
    notifier: Arc<dyn Notifier>,
    repo: R,
    date_policy: DatePolicy,
}

impl<R: AppointmentRepository> AutoServiceManager<R> {
    pub fn new(
        clock: Arc<dyn Clock>,
        email: Arc<dyn EmailSender>,
        notifier: Arc<dyn Notifier>,
        repo: R,
        date_policy: DatePolicy,
    ) -> Self {
        Self {
            clock,
            email,
            notifier,
            repo,
            date_policy,
        }
    }

    /// Books a confirmed appointment.
    ///
    /// # Contract
    /// - Fails fast with `RepoError::Validation` before any side effect.
    /// - Sends exactly one confirmation email and one notification after
    ///   the row commits.
    pub fn create_appointment(
        &self,
        request: &AppointmentRequest,
    ) -> RepoResult<AppointmentConfirmation> {
        let (service_type, date) = self.validate_request(request)?;

        let created_at = self.clock.now();
        let draft = NewAppointment {
            client_name: request.client_name.clone(),
            email: request.email.clone(),
            service_type,
            date,
            created_at,
            status: AppointmentStatus::Confirmed,
        };

        let id = self.repo.create(&draft)?;
        info!(
            "event=appointment_create module=service status=ok id={id} service={service_type} date={date}"
        );

        let email_sent = match self.email.send(
            &draft.email,
            &format!("Appointment #{id} confirmed - AutoShop"),
            &confirmation_body(&draft),
        ) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=appointment_confirm_email module=service status=error id={id} error={err}"
                );
                false
            }
        };

        if let Err(err) = self.notifier.notify(
            &draft.email,
            &format!("appointment {id} confirmed for {date}"),
        ) {
            warn!("event=appointment_notify module=service status=error id={id} error={err}");
        }

        Ok(AppointmentConfirmation {
            id,
            status: AppointmentStatus::Confirmed,
            created_at,
            email_sent,
        })
    }

    /// Gets one appointment by id.
    pub fn get_appointment(&self, id: i64) -> RepoResult<Appointment> {
        self.repo.get(id)
    }

    /// Lists appointments using filter and pagination options.
    pub fn list_appointments(&self, query: &AppointmentListQuery) -> RepoResult<Vec<Appointment>> {
        self.repo.list(query)
    }

    /// Cancels an appointment.
    ///
    /// Only forward transitions are allowed; cancelling an already
    /// cancelled appointment is rejected as a validation error.
    pub fn cancel_appointment(&self, id: i64) -> RepoResult<Appointment> {
        let appointment = self.repo.get(id)?;
        if !appointment
            .status
            .can_advance_to(AppointmentStatus::Cancelled)
        {
            return Err(ValidationError::InvalidStatusTransition {
                from: appointment.status,
                to: AppointmentStatus::Cancelled,
            }
            .into());
        }

        self.repo.update_status(id, AppointmentStatus::Cancelled)?;
        info!("event=appointment_cancel module=service status=ok id={id}");

        Ok(Appointment {
            status: AppointmentStatus::Cancelled,
            ..appointment
        })
    }

    fn validate_request(
        &self,
        request: &AppointmentRequest,
    ) -> RepoResult<(ServiceType, NaiveDate)> {
        if request.client_name.trim().is_empty() {
            return Err(ValidationError::EmptyClientName.into());
        }
        validate_email(&request.email)?;

        let service_type = ServiceType::parse(&request.service_type).ok_or_else(|| {
            ValidationError::UnknownServiceType(request.service_type.clone())
        })?;

        let date = NaiveDate::parse_from_str(&request.date, DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidDate(request.date.clone()))?;

        if self.date_policy == DatePolicy::RejectPast && date < self.clock.now().date() {
            return Err(ValidationError::PastDate(request.date.clone()).into());
        }

        Ok((service_type, date))
    }
}

fn confirmation_body(draft: &NewAppointment) -> String {
    format!(
        "Dear {name},\n\n\
         Your {service} appointment has been confirmed for {date}.\n\n\
         Details:\n\
         - Service: {service}\n\
         - Date: {date}\n\
         - Status: {status}\n\n\
         Thank you for choosing AutoShop.\n",
        name = draft.client_name,
        service = draft.service_type,
        date = draft.date.format(DATE_FORMAT),
        status = draft.status,
    )
}
