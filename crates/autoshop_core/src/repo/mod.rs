//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define transactional data-access contracts for appointments/invoices.
//! - Isolate SQLite query details from manager orchestration.
//!
//! # Invariants
//! - Write paths validate entity invariants before SQL mutations.
//! - Writes run inside IMMEDIATE transactions; any error exit rolls back.
//! - Referential-integrity rejections surface as `RepoError::Constraint`,
//!   never as a generic failure.

use crate::db::DbError;
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod appointment_repo;
pub mod invoice_repo;

pub use appointment_repo::{
    AppointmentListQuery, AppointmentRepository, SqliteAppointmentRepository,
};
pub use invoice_repo::{InvoiceListQuery, InvoiceRepository, SqliteInvoiceRepository};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Malformed input rejected before any write.
    Validation(ValidationError),
    /// A referenced entity does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// The store rejected a write because a referenced row is missing.
    Constraint(String),
    /// The transaction could not commit for infrastructure reasons.
    Db(DbError),
    /// Persisted state failed to parse back into the domain model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Constraint(message) => write!(f, "constraint violation: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::Constraint(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        // SQLite reports foreign-key failures as a constraint error code;
        // keep them distinct from transport/commit failures.
        if let rusqlite::Error::SqliteFailure(inner, _) = &value {
            if inner.code == rusqlite::ErrorCode::ConstraintViolation {
                return Self::Constraint(value.to_string());
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}
