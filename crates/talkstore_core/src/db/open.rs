//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open the writer connection (file or in-memory) and create the schema.
//! - Open read-only connections against an existing file store.
//! - Apply the pragmas every catalog connection relies on.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a bounded busy timeout.
//! - Writer connections have the schema fully applied.
//! - File stores run in WAL mode so readers never wait on each other.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a store file and applies the schema when missing.
///
/// # Side effects
/// - Creates the database file if it does not exist.
/// - Emits `db_open` logging events with duration and status.
///
/// # Errors
/// - [`DbError::Open`] when the file cannot be opened or created.
/// - [`DbError::UnsupportedSchemaVersion`] for a store written by a newer build.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let conn = Connection::open(path).map_err(|source| DbError::Open {
        path: path.to_path_buf(),
        source,
    });
    finish_open("file", started_at, conn, |conn| {
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
        bootstrap_writer(conn)
    })
}

/// Opens a private in-memory store with the schema applied.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = Connection::open_in_memory().map_err(DbError::from);
    finish_open("memory", started_at, conn, bootstrap_writer)
}

/// Opens a read-only connection to an existing store file.
///
/// The caller must have opened the store with [`open_db`] first; this
/// function neither creates the file nor touches the schema.
pub fn open_db_read_only(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|source| DbError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

fn finish_open(
    mode: &str,
    started_at: Instant,
    conn: DbResult<Connection>,
    bootstrap: impl FnOnce(&mut Connection) -> DbResult<()>,
) -> DbResult<Connection> {
    let mut conn = match conn {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }
    };

    match bootstrap(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
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

fn bootstrap_writer(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
