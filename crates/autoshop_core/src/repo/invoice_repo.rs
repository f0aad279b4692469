//! Invoice repository contract and SQLite implementation.
//!
//! # Invariants
//! - `create` runs inside an IMMEDIATE transaction; the schema-level
//!   foreign key on `appointment_id` makes a violating invoice roll back
//!   before it becomes visible to any read.
//! - `paid` is stored as 0/1 and never any other integer.

use crate::db::Store;
use crate::model::invoice::{Invoice, NewInvoice};
use crate::model::TIMESTAMP_FORMAT;
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Row, TransactionBehavior};

const INVOICE_SELECT_SQL: &str = "SELECT
    id,
    appointment_id,
    amount,
    issued_at,
    paid
FROM invoices";

/// Query options for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceListQuery {
    pub appointment_id: Option<i64>,
    pub paid: Option<bool>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for invoice persistence.
pub trait InvoiceRepository {
    /// Persists the draft and returns the store-assigned id.
    fn create(&self, invoice: &NewInvoice) -> RepoResult<i64>;
    /// Gets one invoice by id.
    fn get(&self, id: i64) -> RepoResult<Invoice>;
    /// Lists invoices ordered by id ascending.
    fn list(&self, query: &InvoiceListQuery) -> RepoResult<Vec<Invoice>>;
    /// First invoice raised against the given appointment, if any.
    fn find_by_appointment(&self, appointment_id: i64) -> RepoResult<Option<Invoice>>;
    /// Flips the paid flag to true.
    fn mark_paid(&self, id: i64) -> RepoResult<()>;
    /// Total row count.
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed invoice repository.
#[derive(Clone)]
pub struct SqliteInvoiceRepository {
    store: Store,
}

impl SqliteInvoiceRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl InvoiceRepository for SqliteInvoiceRepository {
    fn create(&self, invoice: &NewInvoice) -> RepoResult<i64> {
        invoice.validate()?;

        let mut conn = self.store.connection();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO invoices (
                appointment_id,
                amount,
                issued_at,
                paid
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                invoice.appointment_id,
                invoice.amount,
                invoice.issued_at.format(TIMESTAMP_FORMAT).to_string(),
                i64::from(invoice.paid),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(id)
    }

    fn get(&self, id: i64) -> RepoResult<Invoice> {
        let conn = self.store.connection();
        let mut stmt = conn.prepare(&format!("{INVOICE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => parse_invoice_row(row),
            None => Err(RepoError::NotFound {
                entity: "invoice",
                id,
            }),
        }
    }

    fn list(&self, query: &InvoiceListQuery) -> RepoResult<Vec<Invoice>> {
        let mut sql = format!("{INVOICE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(appointment_id) = query.appointment_id {
            sql.push_str(" AND appointment_id = ?");
            bind_values.push(Value::Integer(appointment_id));
        }

        if let Some(paid) = query.paid {
            sql.push_str(" AND paid = ?");
            bind_values.push(Value::Integer(i64::from(paid)));
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
        let mut invoices = Vec::new();

        while let Some(row) = rows.next()? {
            invoices.push(parse_invoice_row(row)?);
        }

        Ok(invoices)
    }

    fn find_by_appointment(&self, appointment_id: i64) -> RepoResult<Option<Invoice>> {
        let conn = self.store.connection();
        let mut stmt = conn.prepare(&format!(
            "{INVOICE_SELECT_SQL} WHERE appointment_id = ?1 ORDER BY id ASC LIMIT 1;"
        ))?;

        let mut rows = stmt.query(params![appointment_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_invoice_row(row)?)),
            None => Ok(None),
        }
    }

    fn mark_paid(&self, id: i64) -> RepoResult<()> {
        let conn = self.store.connection();
        let changed = conn.execute("UPDATE invoices SET paid = 1 WHERE id = ?1;", params![id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "invoice",
                id,
            });
        }

        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        let conn = self.store.connection();
        let count: u64 =
            conn.query_row("SELECT COUNT(*) FROM invoices;", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn parse_invoice_row(row: &Row<'_>) -> RepoResult<Invoice> {
    let issued_text: String = row.get("issued_at")?;
    let issued_at = NaiveDateTime::parse_from_str(&issued_text, TIMESTAMP_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid timestamp `{issued_text}` in invoices.issued_at"
        ))
    })?;

    let paid = match row.get::<_, i64>("paid")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid paid value `{other}` in invoices.paid"
            )));
        }
    };

    Ok(Invoice {
        id: row.get("id")?,
        appointment_id: row.get("appointment_id")?,
        amount: row.get("amount")?,
        issued_at,
        paid,
    })
}
