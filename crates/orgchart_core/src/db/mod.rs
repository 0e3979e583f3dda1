//! SQLite-backed position store: connection setup, migrations and the
//! structural checks the repository depends on.
//!
//! # Invariants
//! - Connections handed out enforce foreign keys; `ON DELETE RESTRICT` and
//!   parent reference checks rely on it.
//! - The repository accepts a connection only after
//!   [`ensure_position_schema`] passes.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::ensure_position_schema;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure opening, migrating or verifying the position store.
#[derive(Debug)]
pub enum StoreError {
    /// Driver-level failure.
    Sqlite(rusqlite::Error),
    /// The file was written by a newer binary.
    SchemaTooNew { found: u32, supported: u32 },
    /// Migrations have not been applied to this connection.
    SchemaBehind { found: u32, expected: u32 },
    /// The `positions` table is absent.
    MissingTable(&'static str),
    /// A `positions` column is absent.
    MissingColumn(&'static str),
    /// No unique index covers `positions.name` alone.
    NameNotUnique,
    /// `PRAGMA foreign_keys` is off, so parent links are not enforced.
    ForeignKeysDisabled,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "position store schema v{found} is newer than this build (v{supported})"
            ),
            Self::SchemaBehind { found, expected } => write!(
                f,
                "position store schema v{found} needs migration to v{expected}"
            ),
            Self::MissingTable(table) => write!(f, "table `{table}` is missing"),
            Self::MissingColumn(column) => {
                write!(f, "column `positions.{column}` is missing")
            }
            Self::NameNotUnique => write!(f, "`positions.name` has no unique index"),
            Self::ForeignKeysDisabled => write!(f, "foreign key enforcement is off"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
