//! Key-value backend contract plus SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Provide load/save of whole-collection snapshots under fixed keys.
//! - Guard against operating on an unmigrated SQLite connection.
//!
//! # Invariants
//! - `save` is an upsert; a key holds at most one value.
//! - `MemoryKvBackend` records every accepted write in arrival order.

use crate::db::{migrations, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Transport error for durable key-value operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    Backend(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::Backend(message) => write!(f, "backend failure: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
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

/// Narrow persistence contract for whole-collection snapshots.
///
/// The store serializes a full collection to one string value and mirrors it
/// under a fixed key; backends only move opaque strings.
pub trait KvBackend {
    /// Loads the value stored under `key`, if any.
    fn load(&self, key: &str) -> RepoResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> RepoResult<()>;
}

impl<B: KvBackend + ?Sized> KvBackend for &B {
    fn load(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).save(key, value)
    }
}

/// SQLite-backed key-value store.
pub struct SqliteKvBackend<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvBackend<'conn> {
    /// Constructs a backend from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl KvBackend for SqliteKvBackend<'_> {
    fn load(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_entries WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn save(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-memory backend for tests and host shells without durable storage.
///
/// Records accepted writes in arrival order so tests can assert the store's
/// write-through traffic, and can inject load/save failures to exercise the
/// fail-soft paths without real I/O.
#[derive(Debug, Default)]
pub struct MemoryKvBackend {
    entries: RefCell<HashMap<String, String>>,
    journal: RefCell<Vec<(String, String)>>,
    fail_loads: Cell<bool>,
    fail_saves: Cell<bool>,
}

impl MemoryKvBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds a key, bypassing the write journal.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    /// Makes every subsequent `load` fail.
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.set(fail);
    }

    /// Makes every subsequent `save` fail.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Accepted writes, oldest first.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.journal.borrow().clone()
    }
}

impl KvBackend for MemoryKvBackend {
    fn load(&self, key: &str) -> RepoResult<Option<String>> {
        if self.fail_loads.get() {
            return Err(RepoError::Backend(format!(
                "injected load failure for `{key}`"
            )));
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> RepoResult<()> {
        if self.fail_saves.get() {
            return Err(RepoError::Backend(format!(
                "injected save failure for `{key}`"
            )));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.journal
            .borrow_mut()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = migrations::latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    // table_info yields no rows for an unknown table, which covers both the
    // missing-table and missing-column checks in one probe.
    let columns = column_names(conn, "kv_entries")?;
    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable("kv_entries"));
    }
    for column in ["key", "value", "updated_at"] {
        if !columns.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "kv_entries",
                column,
            });
        }
    }

    Ok(())
}

fn column_names(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}
