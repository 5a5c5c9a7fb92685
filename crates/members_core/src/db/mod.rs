//! SQLite database collaborator used by repositories.
//!
//! # Responsibility
//! - Open and configure SQLite connections and apply schema migrations.
//! - Execute parameterized table writes and select queries.
//! - Return row sets as flat `column -> string` maps.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Column values are always bound as parameters, never spliced into SQL.
//! - Database errors propagate unmodified inside `DbError::Sqlite`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
pub mod query;
pub mod write;

pub use open::{open_db, open_db_in_memory};
pub use query::{QueryBuilder, RowMap};
pub use write::{delete, insert, update, ColumnType};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Value list and type-hint list lengths differ.
    TypeHintMismatch {
        values: usize,
        types: usize,
    },
    /// A value does not satisfy its column type hint.
    InvalidValue {
        column: String,
        message: String,
    },
    /// Update/delete called without any match criteria.
    EmptyCriteria {
        table: String,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::TypeHintMismatch { values, types } => write!(
                f,
                "got {values} column values but {types} type hints"
            ),
            Self::InvalidValue { column, message } => {
                write!(f, "invalid value for column `{column}`: {message}")
            }
            Self::EmptyCriteria { table } => {
                write!(f, "refusing to modify every row of `{table}` without criteria")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. }
            | Self::TypeHintMismatch { .. }
            | Self::InvalidValue { .. }
            | Self::EmptyCriteria { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
