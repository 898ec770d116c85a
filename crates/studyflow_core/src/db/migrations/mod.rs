//! Schema migration registry for the organizer database.
//!
//! # Responsibility
//! - Carry every schema change as an ordered SQL script.
//! - Bring an opened database up to the version this binary expects.
//!
//! # Invariants
//! - Registry versions increase strictly; the last entry is the supported
//!   version.
//! - `PRAGMA user_version` always reflects the applied version.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const REGISTRY: &[(u32, &str)] = &[(1, include_str!("0001_init.sql"))];

/// Schema version this binary was built against.
pub fn latest_version() -> u32 {
    REGISTRY.last().map_or(0, |(version, _)| *version)
}

/// Brings `conn` up to [`latest_version`].
///
/// Pending scripts run inside a single transaction. A database already at
/// the supported version is left untouched; one beyond it is refused.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let applied = user_version(conn)?;
    let supported = latest_version();

    if applied > supported {
        return Err(DbError::UnsupportedSchemaVersion {
            found: applied,
            supported,
        });
    }

    if applied < supported {
        let tx = conn.transaction()?;
        for (version, sql) in REGISTRY.iter().filter(|(version, _)| *version > applied) {
            tx.execute_batch(sql)?;
            tx.execute_batch(&format!("PRAGMA user_version = {version};"))?;
        }
        tx.commit()?;
    }

    Ok(())
}

fn user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}
