//! Core domain logic for the AutoShop appointment and invoicing system.
//! This crate is the single source of truth for business invariants.
//!
//! Every side-effecting dependency (wall-clock time, outbound email,
//! notifications, persistence) sits behind a capability trait and is
//! selected in [`factory`], so production and test wiring differ only in
//! which implementations get injected.

pub mod capability;
pub mod db;
pub mod factory;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use capability::{
    Clock, DeliveryError, EmailSender, LogNotifier, ManualClock, NotificationRecord, Notifier,
    RecordingEmailSender, RecordingNotifier, SentEmail, SmtpConfig, SmtpEmailSender, SystemClock,
};
pub use db::{DbError, DbResult, Store};
pub use factory::{build_production, build_test, FactoryError, ManagerSet, ShopConfig, TestFixture};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::appointment::{Appointment, AppointmentStatus, NewAppointment, ServiceType};
pub use model::invoice::{Invoice, NewInvoice};
pub use model::ValidationError;
pub use repo::{
    AppointmentListQuery, AppointmentRepository, InvoiceListQuery, InvoiceRepository, RepoError,
    RepoResult, SqliteAppointmentRepository, SqliteInvoiceRepository,
};
pub use service::{
    AppointmentConfirmation, AppointmentRequest, AutoServiceManager, BillingManager, DatePolicy,
    InvoiceReceipt,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
