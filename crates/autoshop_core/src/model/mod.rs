//! Domain model for shop appointments and invoices.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own input validation shared by managers and storage boundaries.
//!
//! # Invariants
//! - Every persisted entity is identified by a store-assigned `i64` id.
//! - Timestamps are formatted as sortable ISO-8601 text (`%Y-%m-%dT%H:%M:%S`).
//! - Validation failures carry one distinct variant per rejected condition.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod appointment;
pub mod invoice;

use appointment::AppointmentStatus;

/// Textual format for persisted timestamps. Lexicographic order matches
/// chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Textual format for persisted calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rejection of malformed input before any side effect takes place.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyClientName,
    InvalidEmail(String),
    UnknownServiceType(String),
    InvalidDate(String),
    PastDate(String),
    InvalidAmount(f64),
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyClientName => write!(f, "client name must not be empty"),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
            Self::UnknownServiceType(value) => write!(f, "unknown service type `{value}`"),
            Self::InvalidDate(value) => write!(f, "invalid appointment date `{value}`"),
            Self::PastDate(value) => write!(f, "appointment date `{value}` is in the past"),
            Self::InvalidAmount(value) => {
                write!(f, "invoice amount {value} must be finite and non-negative")
            }
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "status cannot move from `{from}` to `{to}`")
            }
        }
    }
}

impl Error for ValidationError {}
