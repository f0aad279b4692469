//! Appointment domain model.
//!
//! # Responsibility
//! - Define the appointment record and its service-type/status vocabulary.
//! - Validate write-side input before it reaches persistence.
//!
//! # Invariants
//! - `status` transitions are monotone forward (`pending → confirmed →
//!   cancelled`); no transition ever moves left.
//! - `created_at` is always supplied by a `Clock` capability, never read
//!   from the ambient environment.

use crate::model::ValidationError;
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex must compile")
});

/// Fixed catalogue of bookable shop services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    OilChange,
    BrakeCheck,
    TireRotation,
    FullService,
}

impl ServiceType {
    /// Storage/wire spelling of the service type.
    pub fn as_db(self) -> &'static str {
        match self {
            Self::OilChange => "oil_change",
            Self::BrakeCheck => "brake_check",
            Self::TireRotation => "tire_rotation",
            Self::FullService => "full_service",
        }
    }

    /// Parses the storage/wire spelling back into the enum.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "oil_change" => Some(Self::OilChange),
            "brake_check" => Some(Self::BrakeCheck),
            "tire_rotation" => Some(Self::TireRotation),
            "full_service" => Some(Self::FullService),
            _ => None,
        }
    }

    /// Catalogue price used when an invoice amount is derived from the
    /// booked service instead of being passed in.
    pub fn base_price(self) -> f64 {
        match self {
            Self::OilChange => 50.0,
            Self::BrakeCheck => 75.0,
            Self::TireRotation => 40.0,
            Self::FullService => 150.0,
        }
    }
}

impl Display for ServiceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db())
    }
}

/// Appointment lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_db(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Whether moving to `next` respects the monotone forward order
    /// `pending → confirmed → cancelled`.
    pub fn can_advance_to(self, next: Self) -> bool {
        rank(next) > rank(self)
    }
}

impl Display for AppointmentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db())
    }
}

fn rank(status: AppointmentStatus) -> u8 {
    match status {
        AppointmentStatus::Pending => 0,
        AppointmentStatus::Confirmed => 1,
        AppointmentStatus::Cancelled => 2,
    }
}

/// Write model for an appointment about to be persisted.
///
/// The id is assigned by the store on insert; everything else is fixed at
/// creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub client_name: String,
    pub email: String,
    pub service_type: ServiceType,
    pub date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub status: AppointmentStatus,
}

impl NewAppointment {
    /// Checks required-field invariants enforced at the storage boundary.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.client_name.trim().is_empty() {
            return Err(ValidationError::EmptyClientName);
        }
        validate_email(&self.email)?;
        Ok(())
    }
}

/// Read model for a persisted appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub client_name: String,
    pub email: String,
    pub service_type: ServiceType,
    pub date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub status: AppointmentStatus,
}

/// Syntactic email check shared by managers and repositories.
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || !EMAIL_RE.is_match(value) {
        return Err(ValidationError::InvalidEmail(value.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_email, AppointmentStatus, ServiceType};
    use crate::model::ValidationError;

    #[test]
    fn service_type_db_spelling_roundtrips() {
        for kind in [
            ServiceType::OilChange,
            ServiceType::BrakeCheck,
            ServiceType::TireRotation,
            ServiceType::FullService,
        ] {
            assert_eq!(ServiceType::parse(kind.as_db()), Some(kind));
        }
        assert_eq!(ServiceType::parse("engine_swap"), None);
    }

    #[test]
    fn status_transitions_are_monotone_forward() {
        use AppointmentStatus::{Cancelled, Confirmed, Pending};

        assert!(Pending.can_advance_to(Confirmed));
        assert!(Confirmed.can_advance_to(Cancelled));
        assert!(Pending.can_advance_to(Cancelled));

        assert!(!Confirmed.can_advance_to(Pending));
        assert!(!Cancelled.can_advance_to(Confirmed));
        assert!(!Confirmed.can_advance_to(Confirmed));
    }

    #[test]
    fn email_validation_accepts_plain_addresses_and_rejects_garbage() {
        assert!(validate_email("juan@test.com").is_ok());
        assert!(validate_email("a.b+c@shop.example.org").is_ok());

        for bad in ["", "no-at-sign", "test@", "test@nodot", "two words@x.com"] {
            assert!(matches!(
                validate_email(bad),
                Err(ValidationError::InvalidEmail(_))
            ));
        }
    }

    #[test]
    fn service_type_serializes_snake_case() {
        let json = serde_json::to_string(&ServiceType::OilChange).unwrap();
        assert_eq!(json, "\"oil_change\"");
    }
}
