//! Company store schema history.
//!
//! Steps are applied in one transaction and the reached step is recorded in
//! `PRAGMA user_version`. Step 1 creates the company and equipment tables;
//! step 2 adds per-item explicit expiration.

use crate::db::{DbError, DbResult, StoreTable};
use log::{info, warn};
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "company_store",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "equipment_expiration",
        sql: include_str!("0002_equipment_expiration.sql"),
    },
];

/// Where a connection's schema stands relative to this binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Current,
    Behind { db_version: u32 },
    Ahead { db_version: u32 },
}

pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the schema version recorded on a connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

pub fn schema_state(conn: &Connection) -> DbResult<SchemaState> {
    let db_version = current_user_version(conn)?;
    let latest = latest_version();
    Ok(if db_version == latest {
        SchemaState::Current
    } else if db_version < latest {
        SchemaState::Behind { db_version }
    } else {
        SchemaState::Ahead { db_version }
    })
}

/// Brings an older company store up to the latest schema.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = match schema_state(conn)? {
        SchemaState::Current => return Ok(()),
        SchemaState::Ahead { db_version } => {
            warn!(
                "event=db_migrate module=db status=error error_code=schema_ahead db_version={} latest={}",
                db_version,
                latest_version()
            );
            return Err(DbError::UnsupportedSchemaVersion {
                db_version,
                latest_supported: latest_version(),
            });
        }
        SchemaState::Behind { db_version } => db_version,
    };

    let tx = conn.transaction()?;
    for step in MIGRATIONS.iter().filter(|step| step.version > from) {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate module=db status=step version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        from,
        latest_version()
    );
    Ok(())
}

/// Checks that `conn` can serve the company store without migrating it.
pub fn ensure_schema_ready(conn: &Connection) -> DbResult<()> {
    match schema_state(conn)? {
        SchemaState::Current => {}
        SchemaState::Behind { db_version } => {
            return Err(DbError::SchemaBehind {
                db_version,
                expected: latest_version(),
            })
        }
        SchemaState::Ahead { db_version } => {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version,
                latest_supported: latest_version(),
            })
        }
    }

    for table in StoreTable::ALL {
        let present: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table.as_str()],
            |row| row.get(0),
        )?;
        if !present {
            return Err(DbError::MissingTable(table));
        }
    }
    Ok(())
}
