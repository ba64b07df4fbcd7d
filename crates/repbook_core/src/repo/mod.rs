//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the fixed set of typed operations presentation code may use.
//! - Isolate SQLite row layout and query details from the rest of core.
//!
//! # Invariants
//! - Repositories are the only reader/writer of the underlying store;
//!   callers never see row representations or issue raw queries.
//! - Write paths validate domain records before SQL mutations.
//! - Deletes are idempotent; updates of missing ids return `NotFound`.

use crate::db::DbError;
use crate::model::set::SetValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod catalog_repo;
pub mod set_repo;
pub mod variation_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Semantic error for repository operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(SetValidationError),
    Db(DbError),
    NotFound {
        entity: &'static str,
        id: String,
    },
    /// An insert or update would break a foreign-key invariant.
    Constraint(String),
    /// Persisted state could not be read back as a valid domain record.
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn not_found(entity: &'static str, id: impl Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Constraint(message) => write!(f, "constraint violation: {message}"),
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

impl From<SetValidationError> for RepoError {
    fn from(value: SetValidationError) -> Self {
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
        match value {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::Constraint(message.unwrap_or_else(|| code.to_string()))
            }
            other => Self::Db(DbError::Sqlite(other)),
        }
    }
}
