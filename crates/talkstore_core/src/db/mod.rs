//! SQLite storage bootstrap for the talk catalog.
//!
//! # Responsibility
//! - Open and configure writer and reader connections.
//! - Create the catalog schema on first open and guard its version.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Catalog rows are never read or written before the schema is in place.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_db_read_only};

pub type DbResult<T> = Result<T, DbError>;

/// Storage-level failure.
///
/// `Open` and `UnsupportedSchemaVersion` mean the store is unavailable and
/// are only produced while opening it.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Open { path, source } => {
                write!(f, "cannot open talk store at `{}`: {source}", path.display())
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Open { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
