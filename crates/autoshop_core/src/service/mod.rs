//! Business-logic managers.
//!
//! # Responsibility
//! - Compose clock/email/notification/repository capabilities into
//!   deterministic, side-effect-ordered workflows.
//! - Keep callers decoupled from storage and transport details.
//!
//! # Invariants
//! - Validation always completes before the first side effect.
//! - Post-commit delivery failures never reverse a committed write.

pub mod auto_service;
pub mod billing;

pub use auto_service::{
    AppointmentConfirmation, AppointmentRequest, AutoServiceManager, DatePolicy,
};
pub use billing::{BillingManager, InvoiceReceipt};
