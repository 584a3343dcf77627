//! Repository layer over the catalog tables.
//!
//! # Responsibility
//! - Keep SQL for each table family behind a small trait.
//! - Enforce referential integrity and cascades in code, inside whatever
//!   transaction the caller opened.
//!
//! # Invariants
//! - Repositories never open or commit transactions themselves; the caller
//!   decides the unit of work.
//! - Lookups report absence as `Ok(None)`; semantic write failures use
//!   dedicated `RepoError` variants, never sentinel values.

use crate::db::DbError;
use crate::model::catalog::EntityKind;
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod catalog_repo;
pub mod review_repo;
pub mod speech_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by every store operation.
#[derive(Debug)]
pub enum RepoError {
    /// Input rejected before writing.
    Validation(ValidationError),
    /// Engine or connection failure.
    Db(DbError),
    /// Delete target does not exist.
    NotFound { entity: EntityKind, id: i64 },
    /// Write referenced a row that does not exist.
    IntegrityViolation { entity: EntityKind, id: i64 },
    /// A persisted row could not be mapped to the domain model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::IntegrityViolation { entity, id } => {
                write!(f, "referenced {entity} does not exist: {id}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::IntegrityViolation { .. } | Self::InvalidData(_) => None,
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
        Self::Db(DbError::Sqlite(value))
    }
}
