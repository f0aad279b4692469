//! Composition factory.
//!
//! # Responsibility
//! - Select and wire concrete capability implementations; the only place
//!   this happens.
//!
//! # Invariants
//! - Managers receive capability trait objects, never concrete types.
//! - The production store path comes from explicit configuration; there is
//!   no ambient global database handle.
//! - The test store is in-memory and lives only as long as the fixture.

use crate::capability::{
    Clock, DeliveryError, EmailSender, LogNotifier, ManualClock, Notifier, RecordingEmailSender,
    RecordingNotifier, SmtpConfig, SmtpEmailSender, SystemClock,
};
use crate::db::{DbError, Store};
use crate::repo::{SqliteAppointmentRepository, SqliteInvoiceRepository};
use crate::service::{AutoServiceManager, BillingManager, DatePolicy};
use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;

/// Explicit production configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Path of the durable SQLite database file.
    pub db_path: PathBuf,
    /// Outbound SMTP settings.
    pub smtp: SmtpConfig,
    /// Requested-date validation rule. Defaults to `AllowPast`.
    pub date_policy: DatePolicy,
}

/// The wired manager pair sharing one store.
pub struct ManagerSet {
    pub appointments: AutoServiceManager<SqliteAppointmentRepository>,
    pub billing: BillingManager<SqliteAppointmentRepository, SqliteInvoiceRepository>,
}

/// Test wiring: managers plus handles to the controllable/observing doubles
/// and the raw store for row-level assertions.
pub struct TestFixture {
    pub managers: ManagerSet,
    pub clock: Arc<ManualClock>,
    pub email: Arc<RecordingEmailSender>,
    pub notifier: Arc<RecordingNotifier>,
    pub store: Store,
}

/// Failure while assembling a manager set.
#[derive(Debug)]
pub enum FactoryError {
    Db(DbError),
    Email(DeliveryError),
}

impl Display for FactoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Email(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FactoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Email(err) => Some(err),
        }
    }
}

impl From<DbError> for FactoryError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<DeliveryError> for FactoryError {
    fn from(value: DeliveryError) -> Self {
        Self::Email(value)
    }
}

/// Wires real capabilities over a durable file-backed store.
pub fn build_production(config: &ShopConfig) -> Result<ManagerSet, FactoryError> {
    let store = Store::open(&config.db_path)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let email: Arc<dyn EmailSender> = Arc::new(SmtpEmailSender::new(&config.smtp)?);
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    Ok(assemble(store, clock, email, notifier, config.date_policy))
}

/// Wires controllable/observing doubles over an ephemeral in-memory store.
///
/// The recording email sender shares the manual clock so its `sent_at`
/// values stay deterministic.
pub fn build_test(fixed_time: NaiveDateTime) -> Result<TestFixture, FactoryError> {
    let store = Store::open_in_memory()?;
    let clock = Arc::new(ManualClock::new(fixed_time));
    let email = Arc::new(RecordingEmailSender::new(clock.clone() as Arc<dyn Clock>));
    let notifier = Arc::new(RecordingNotifier::new());

    let managers = assemble(
        store.clone(),
        clock.clone(),
        email.clone(),
        notifier.clone(),
        DatePolicy::AllowPast,
    );

    Ok(TestFixture {
        managers,
        clock,
        email,
        notifier,
        store,
    })
}

fn assemble(
    store: Store,
    clock: Arc<dyn Clock>,
    email: Arc<dyn EmailSender>,
    notifier: Arc<dyn Notifier>,
    date_policy: DatePolicy,
) -> ManagerSet {
    let appointment_repo = SqliteAppointmentRepository::new(store.clone());
    let invoice_repo = SqliteInvoiceRepository::new(store);

    let appointments = AutoServiceManager::new(
        clock.clone(),
        email.clone(),
        notifier,
        appointment_repo.clone(),
        date_policy,
    );
    let billing = BillingManager::new(clock, email, appointment_repo, invoice_repo);

    ManagerSet {
        appointments,
        billing,
    }
}
