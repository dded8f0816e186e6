//! SQLite-backed store adapter.
//!
//! Two tables: `collections` holds the collection names, `properties` holds
//! one row per (collection, key) with a dynamically-typed `value` column.
//! Booleans and integers land as INTEGER, text (including the textual float
//! encoding) as TEXT. The connection sits behind a mutex so one handle can be
//! shared process-wide.

use crate::core::error::PrefstoreError;
use crate::core::store::{SettingsStore, StoredValue};
use rusqlite::types::{FromSql, ToSql, Value};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

const SCHEMA_COLLECTIONS: &str = "
    CREATE TABLE IF NOT EXISTS collections (
        name TEXT PRIMARY KEY
    )
";
const SCHEMA_PROPERTIES: &str = "
    CREATE TABLE IF NOT EXISTS properties (
        collection TEXT NOT NULL,
        key TEXT NOT NULL,
        value,
        PRIMARY KEY (collection, key),
        FOREIGN KEY (collection) REFERENCES collections(name)
    )
";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (creating if needed) a settings database at `path`.
    pub fn open(path: &Path) -> Result<Self, PrefstoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database. Contents vanish on drop.
    pub fn open_in_memory() -> Result<Self, PrefstoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, PrefstoreError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))?;
        conn.execute("PRAGMA foreign_keys=ON;", [])?;
        conn.execute(SCHEMA_COLLECTIONS, [])?;
        conn.execute(SCHEMA_PROPERTIES, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<R>(
        &self,
        f: impl FnOnce(&Connection) -> Result<R, PrefstoreError>,
    ) -> Result<R, PrefstoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| PrefstoreError::StoreAccess("sqlite connection lock poisoned".to_string()))?;
        f(&conn)
    }

    fn get_typed<T: FromSql>(&self, collection: &str, key: &str) -> Result<T, PrefstoreError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM properties WHERE collection = ?1 AND key = ?2",
                params![collection, key],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| {
                PrefstoreError::StoreAccess(format!(
                    "no property '{}' in collection '{}'",
                    key, collection
                ))
            })
        })
    }

    fn set_typed<T: ToSql>(
        &self,
        collection: &str,
        key: &str,
        value: T,
    ) -> Result<(), PrefstoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO properties (collection, key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(collection, key) DO UPDATE SET value = excluded.value",
                params![collection, key, value],
            )?;
            Ok(())
        })
    }

    /// All collection names, sorted. Backs the inspection CLI.
    pub fn collections(&self) -> Result<Vec<String>, PrefstoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT name FROM collections ORDER BY name")?;
            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(names)
        })
    }

    /// All (key, raw value) pairs of one collection, sorted by key.
    ///
    /// Raw view: booleans are indistinguishable from integers here, since
    /// both live in an INTEGER column.
    pub fn properties(&self, collection: &str) -> Result<Vec<(String, StoredValue)>, PrefstoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT key, value FROM properties WHERE collection = ?1 ORDER BY key",
            )?;
            let rows = stmt
                .query_map(params![collection], |row| {
                    let key: String = row.get(0)?;
                    let value: Value = row.get(1)?;
                    Ok((key, value))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows
                .into_iter()
                .map(|(key, value)| {
                    let stored = match value {
                        Value::Integer(i) => StoredValue::Int(i),
                        Value::Text(s) => StoredValue::Text(s),
                        Value::Real(r) => StoredValue::Text(r.to_string()),
                        Value::Null | Value::Blob(_) => StoredValue::Text(String::new()),
                    };
                    (key, stored)
                })
                .collect())
        })
    }
}

impl SettingsStore for SqliteStore {
    fn collection_exists(&self, name: &str) -> Result<bool, PrefstoreError> {
        self.with_conn(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM collections WHERE name = ?1)",
                params![name],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    fn create_collection(&self, name: &str) -> Result<(), PrefstoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO collections (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
                params![name],
            )?;
            Ok(())
        })
    }

    fn property_exists(&self, collection: &str, key: &str) -> Result<bool, PrefstoreError> {
        self.with_conn(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM properties WHERE collection = ?1 AND key = ?2)",
                params![collection, key],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    fn get_bool(&self, collection: &str, key: &str) -> Result<bool, PrefstoreError> {
        self.get_typed(collection, key)
    }

    fn set_bool(&self, collection: &str, key: &str, value: bool) -> Result<(), PrefstoreError> {
        self.set_typed(collection, key, value)
    }

    fn get_int(&self, collection: &str, key: &str) -> Result<i64, PrefstoreError> {
        self.get_typed(collection, key)
    }

    fn set_int(&self, collection: &str, key: &str, value: i64) -> Result<(), PrefstoreError> {
        self.set_typed(collection, key, value)
    }

    fn get_text(&self, collection: &str, key: &str) -> Result<String, PrefstoreError> {
        self.get_typed(collection, key)
    }

    fn set_text(&self, collection: &str, key: &str, value: &str) -> Result<(), PrefstoreError> {
        self.set_typed(collection, key, value)
    }
}
