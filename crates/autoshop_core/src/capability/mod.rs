//! Injected capability contracts and their implementations.
//!
//! # Responsibility
//! - Define the seams (clock, email, notification) managers depend on.
//! - Provide one real and one test-double implementation per contract.
//!
//! # Invariants
//! - Observing doubles never perform external I/O and never fail.
//! - `DeliveryError` is raised only by real email/notification variants.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod clock;
pub mod email;
pub mod notify;

pub use clock::{Clock, ManualClock, SystemClock};
pub use email::{EmailSender, RecordingEmailSender, SentEmail, SmtpConfig, SmtpEmailSender};
pub use notify::{LogNotifier, Notifier, NotificationRecord, RecordingNotifier};

/// Failure of an outbound email or notification dispatch.
///
/// Non-fatal by policy: a delivery error after a successful commit never
/// reverses the commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The recipient or sender address could not be parsed.
    InvalidAddress(String),
    /// The underlying transport refused or failed the dispatch.
    Transport(String),
}

impl Display for DeliveryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAddress(value) => write!(f, "invalid delivery address `{value}`"),
            Self::Transport(message) => write!(f, "delivery transport failed: {message}"),
        }
    }
}

impl Error for DeliveryError {}
