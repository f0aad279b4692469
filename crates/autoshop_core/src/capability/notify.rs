//! Notification capability.
//!
//! Mirrors the email seam: a real dispatcher and an observing double that
//! counts calls and records `(recipient, message)` pairs.

use super::DeliveryError;
use log::info;
use std::sync::Mutex;

/// Sends one internal notification to one recipient.
pub trait Notifier: Send + Sync {
    fn notify(&self, recipient: &str, message: &str) -> Result<(), DeliveryError>;
}

/// Production notifier dispatching through the process log channel.
///
/// The concrete push/SMS channel sits behind this seam and is outside core
/// scope.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, recipient: &str, message: &str) -> Result<(), DeliveryError> {
        info!("event=notify_dispatch module=capability status=ok recipient={recipient} message={message}");
        Ok(())
    }
}

/// One observed notification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub recipient: String,
    pub message: String,
}

/// Observing double recording every notification for later assertion.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<NotificationRecord>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.log().len()
    }

    /// Whether `recipient` was notified at least once over the full history.
    pub fn was_notified(&self, recipient: &str) -> bool {
        self.log().iter().any(|call| call.recipient == recipient)
    }

    /// All notifications observed for `recipient`, oldest first.
    pub fn notifications_for(&self, recipient: &str) -> Vec<NotificationRecord> {
        self.log()
            .iter()
            .filter(|call| call.recipient == recipient)
            .cloned()
            .collect()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<NotificationRecord>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, recipient: &str, message: &str) -> Result<(), DeliveryError> {
        self.log().push(NotificationRecord {
            recipient: recipient.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}
