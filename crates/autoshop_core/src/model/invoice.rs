//! Invoice domain model.
//!
//! # Invariants
//! - `appointment_id` must resolve to a persisted appointment whenever an
//!   invoice row commits; the schema-level foreign key is authoritative.
//! - `amount` is finite and non-negative.
//! - `paid` defaults to false at creation.

use crate::model::ValidationError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Write model for an invoice about to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub appointment_id: i64,
    pub amount: f64,
    pub issued_at: NaiveDateTime,
    pub paid: bool,
}

impl NewInvoice {
    /// Builds an unpaid invoice draft.
    pub fn unpaid(appointment_id: i64, amount: f64, issued_at: NaiveDateTime) -> Self {
        Self {
            appointment_id,
            amount,
            issued_at,
            paid: false,
        }
    }

    /// Checks amount invariants enforced at the storage boundary.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_amount(self.amount)
    }
}

/// Read model for a persisted invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub appointment_id: i64,
    pub amount: f64,
    pub issued_at: NaiveDateTime,
    pub paid: bool,
}

/// Rejects NaN, infinite and negative invoice amounts.
pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValidationError::InvalidAmount(amount));
    }
    Ok(())
}
