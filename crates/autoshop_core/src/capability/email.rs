//! Email capability.
//!
//! # Responsibility
//! - Define the outbound email seam used by both managers.
//! - Provide the SMTP-backed production sender and the recording double.
//!
//! # Invariants
//! - `RecordingEmailSender` performs no network I/O and always succeeds.
//! - Sends are not idempotent: every call is recorded/dispatched even when
//!   identical to a prior one.

use super::clock::Clock;
use super::DeliveryError;
use chrono::NaiveDateTime;
use lettre::message::Mailbox;
use lettre::{Message, SmtpTransport, Transport};
use log::info;
use std::sync::{Arc, Mutex};

/// Sends one message to one address.
pub trait EmailSender: Send + Sync {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError>;
}

/// SMTP relay settings for the production sender.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Relay host name, e.g. `smtp.example.com`.
    pub relay: String,
    /// Sender mailbox, e.g. `AutoShop <no-reply@shop.example.com>`.
    pub from: String,
}

/// Production sender delivering through a blocking SMTP transport.
pub struct SmtpEmailSender {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpEmailSender {
    pub fn new(config: &SmtpConfig) -> Result<Self, DeliveryError> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|_| DeliveryError::InvalidAddress(config.from.clone()))?;
        let transport = SmtpTransport::relay(&config.relay)
            .map_err(|err| DeliveryError::Transport(err.to_string()))?
            .build();
        Ok(Self { transport, from })
    }
}

impl EmailSender for SmtpEmailSender {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        let recipient = to
            .parse::<Mailbox>()
            .map_err(|_| DeliveryError::InvalidAddress(to.to_string()))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject)
            .body(body.to_string())
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        self.transport
            .send(&message)
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        info!("event=email_send module=capability status=ok to={to}");
        Ok(())
    }
}

/// One observed outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub sent_at: NaiveDateTime,
}

/// Observing double that appends every send to an ordered log.
///
/// `sent_at` comes from the injected clock so test assertions stay
/// deterministic.
pub struct RecordingEmailSender {
    clock: Arc<dyn Clock>,
    sent: Mutex<Vec<SentEmail>>,
}

impl RecordingEmailSender {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the append-only send log, oldest first.
    pub fn sent(&self) -> Vec<SentEmail> {
        self.log().clone()
    }

    pub fn call_count(&self) -> usize {
        self.log().len()
    }

    pub fn was_sent_to(&self, to: &str) -> bool {
        self.log().iter().any(|email| email.to == to)
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<SentEmail>> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EmailSender for RecordingEmailSender {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        self.log().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            sent_at: self.clock.now(),
        });
        Ok(())
    }
}
