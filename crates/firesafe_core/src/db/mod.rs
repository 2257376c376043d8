//! Company store bootstrap: connections, schema versions, readiness checks.
//!
//! # Invariants
//! - A connection handed to the record store has `user_version` equal to the
//!   latest migration and every [`StoreTable`] present.
//! - Readiness failures are `DbError`s; the repository layer only wraps them.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use migrations::{ensure_schema_ready, schema_state, SchemaState};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Tables the company store reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreTable {
    Companies,
    Equipment,
}

impl StoreTable {
    pub const ALL: [StoreTable; 2] = [StoreTable::Companies, StoreTable::Equipment];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Companies => "companies",
            Self::Equipment => "equipment",
        }
    }
}

impl Display for StoreTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum DbError {
    /// Store unreachable or SQL failure.
    Sqlite(rusqlite::Error),
    /// File was written by a newer binary; never downgraded.
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },
    /// Connection was not opened through `open_db` (or is mid-upgrade).
    SchemaBehind { db_version: u32, expected: u32 },
    /// Version matches but a company store table is gone.
    MissingTable(StoreTable),
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
                "company store schema {db_version} is newer than supported {latest_supported}"
            ),
            Self::SchemaBehind {
                db_version,
                expected,
            } => write!(
                f,
                "company store schema {db_version} is not migrated to {expected}"
            ),
            Self::MissingTable(table) => write!(f, "company store table `{table}` is missing"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
