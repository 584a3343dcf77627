//! Schema registry and executor.
//!
//! # Responsibility
//! - Hold the catalog schema steps in strictly increasing order.
//! - Apply pending steps in one transaction so a store never ends up with a
//!   partial schema.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - The applied version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, TransactionBehavior};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the schema version recorded in the database.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Creates or completes the catalog schema on the provided connection.
///
/// A store already at the latest version is left untouched.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current = current_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Exclusive)?;
    // Another opener may have finished the schema while we waited for the lock.
    let current = current_version(&tx)?;
    if current == latest {
        return Ok(());
    }

    for migration in MIGRATIONS {
        if migration.version <= current {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!(
        "event=schema_migrate module=db status=ok from_version={} to_version={}",
        current, latest
    );
    Ok(())
}
