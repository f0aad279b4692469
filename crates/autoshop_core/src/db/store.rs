//! Shared connection handle for SQLite stores.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations before handing out a usable connection.
//! - Serialize connection access for single-writer transaction scopes.
//!
//! # Invariants
//! - Handed-out connections have `foreign_keys=ON`.
//! - Handed-out connections have migrations fully applied.
//! - One `Store` owns exactly one connection; clones share it.

use super::migrations::apply_migrations;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Owning handle over one SQLite connection.
///
/// Cloning the handle shares the underlying connection, which is what the
/// appointment and invoice repositories need so that foreign keys resolve
/// against the same database.
#[derive(Clone, Debug)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Opens a durable, file-backed store and applies all pending migrations.
    ///
    /// # Side effects
    /// - Performs connection bootstrap and migration checks.
    /// - Emits `db_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let started_at = Instant::now();
        info!("event=db_open module=db status=start mode=file");

        let conn = match Connection::open(path) {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        Self::bootstrap(conn, "file", started_at)
    }

    /// Opens an ephemeral in-memory store and applies all pending migrations.
    ///
    /// The database lives only as long as this handle (and its clones).
    pub fn open_in_memory() -> DbResult<Self> {
        let started_at = Instant::now();
        info!("event=db_open module=db status=start mode=memory");

        let conn = match Connection::open_in_memory() {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_open_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        Self::bootstrap(conn, "memory", started_at)
    }

    fn bootstrap(mut conn: Connection, mode: &str, started_at: Instant) -> DbResult<Self> {
        let result = configure_connection(&mut conn);
        match result {
            Ok(()) => {
                info!(
                    "event=db_open module=db status=ok mode={} duration_ms={}",
                    mode,
                    started_at.elapsed().as_millis()
                );
                Ok(Self {
                    conn: Arc::new(Mutex::new(conn)),
                })
            }
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                    mode,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Locks and returns the shared connection.
    ///
    /// Callers open transactions on the guard; rusqlite transactions roll
    /// back on drop unless committed, which gives every exit path scoped
    /// release semantics.
    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn configure_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}
