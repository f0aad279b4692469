//! Appointment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `appointments` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `create` validates the draft before the SQL insert and assigns the id
//!   inside one IMMEDIATE transaction.
//! - `list` is ordered by id ascending and restartable (a fresh statement
//!   per call).

use crate::db::Store;
use crate::model::appointment::{Appointment, AppointmentStatus, NewAppointment, ServiceType};
use crate::model::{DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::repo::{RepoError, RepoResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Row, TransactionBehavior};

const APPOINTMENT_SELECT_SQL: &str = "SELECT
    id,
    client_name,
    email,
    service_type,
    date,
    created_at,
    status
FROM appointments";

/// Query options for listing appointments.
#[derive(Debug, Clone, Default)]
pub struct AppointmentListQuery {
    pub status: Option<AppointmentStatus>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for appointment persistence.
pub trait AppointmentRepository {
    /// Persists the draft and returns the store-assigned id.
    fn create(&self, appointment: &NewAppointment) -> RepoResult<i64>;
    /// Gets one appointment by id.
    fn get(&self, id: i64) -> RepoResult<Appointment>;
    /// Lists appointments ordered by id ascending.
    fn list(&self, query: &AppointmentListQuery) -> RepoResult<Vec<Appointment>>;
    /// Overwrites the status column; transition policy is the caller's.
    fn update_status(&self, id: i64, status: AppointmentStatus) -> RepoResult<()>;
    /// Administrative row removal. Returns whether a row was deleted.
    fn delete(&self, id: i64) -> RepoResult<bool>;
    /// Total row count.
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed appointment repository.
#[derive(Clone)]
pub struct SqliteAppointmentRepository {
    store: Store,
}

impl SqliteAppointmentRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl AppointmentRepository for SqliteAppointmentRepository {
    fn create(&self, appointment: &NewAppointment) -> RepoResult<i64> {
        appointment.validate()?;

        let mut conn = self.store.connection();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO appointments (
                client_name,
                email,
                service_type,
                date,
                created_at,
                status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                appointment.client_name.as_str(),
                appointment.email.as_str(),
                appointment.service_type.as_db(),
                appointment.date.format(DATE_FORMAT).to_string(),
                appointment.created_at.format(TIMESTAMP_FORMAT).to_string(),
                appointment.status.as_db(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(id)
    }

    fn get(&self, id: i64) -> RepoResult<Appointment> {
        let conn = self.store.connection();
        let mut stmt = conn.prepare(&format!("{APPOINTMENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => parse_appointment_row(row),
            None => Err(RepoError::NotFound {
                entity: "appointment",
                id,
            }),
        }
    }

    fn list(&self, query: &AppointmentListQuery) -> RepoResult<Vec<Appointment>> {
        let mut sql = format!("{APPOINTMENT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_db().to_string()));
        }

        sql.push_str(" ORDER BY id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let conn = self.store.connection();
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut appointments = Vec::new();

        while let Some(row) = rows.next()? {
            appointments.push(parse_appointment_row(row)?);
        }

        Ok(appointments)
    }

    fn update_status(&self, id: i64, status: AppointmentStatus) -> RepoResult<()> {
        let conn = self.store.connection();
        let changed = conn.execute(
            "UPDATE appointments SET status = ?1 WHERE id = ?2;",
            params![status.as_db(), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "appointment",
                id,
            });
        }

        Ok(())
    }

    fn delete(&self, id: i64) -> RepoResult<bool> {
        let conn = self.store.connection();
        let changed = conn.execute("DELETE FROM appointments WHERE id = ?1;", params![id])?;
        Ok(changed > 0)
    }

    fn count(&self) -> RepoResult<u64> {
        let conn = self.store.connection();
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM appointments;", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }
}

fn parse_appointment_row(row: &Row<'_>) -> RepoResult<Appointment> {
    let service_text: String = row.get("service_type")?;
    let service_type = ServiceType::parse(&service_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid service type `{service_text}` in appointments.service_type"
        ))
    })?;

    let status_text: String = row.get("status")?;
    let status = AppointmentStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in appointments.status"
        ))
    })?;

    let date_text: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{date_text}` in appointments.date"))
    })?;

    let created_text: String = row.get("created_at")?;
    let created_at =
        NaiveDateTime::parse_from_str(&created_text, TIMESTAMP_FORMAT).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid timestamp `{created_text}` in appointments.created_at"
            ))
        })?;

    Ok(Appointment {
        id: row.get("id")?,
        client_name: row.get("client_name")?,
        email: row.get("email")?,
        service_type,
        date,
        created_at,
        status,
    })
}
