//! SQLite-backed key-value store.
//!
//! Each logical bucket (tasks, log, pomodoro count, schedule, engine
//! snapshot) is one JSON value under one key. Buckets are loaded
//! independently; a missing or corrupt bucket falls back to its default
//! rather than failing startup.

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{data_dir, Bucket};
use crate::error::StoreError;
use crate::log::SessionLog;
use crate::schedule::SchedulePlan;
use crate::task::TaskQueue;
use crate::timer::BankTimer;

/// Key-value store at `~/.config/focusbank/focusbank.db`.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store, creating the file and schema if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let path = data_dir()?.join("focusbank.db");
        let conn = Connection::open(&path)
            .map_err(|source| StoreError::OpenFailed { path, source })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Load a bucket, falling back to the type's default when the bucket is
    /// missing or its JSON does not parse.
    pub fn load<T: DeserializeOwned + Default>(&self, bucket: Bucket) -> T {
        self.get(bucket.key())
            .ok()
            .flatten()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Save a bucket.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save<T: Serialize>(&self, bucket: Bucket, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        self.set(bucket.key(), &json)
    }

    // ── Typed buckets ────────────────────────────────────────────────

    pub fn load_tasks(&self) -> TaskQueue {
        self.load(Bucket::Tasks)
    }

    pub fn load_log(&self) -> SessionLog {
        self.load(Bucket::Log)
    }

    pub fn load_pomodoro_count(&self) -> u32 {
        self.load(Bucket::PomodoroCount)
    }

    pub fn load_schedule(&self) -> SchedulePlan {
        self.load(Bucket::Schedule)
    }

    /// Engine snapshots have no meaningful default; absence means a fresh
    /// engine should be built from settings.
    pub fn load_engine(&self) -> Option<BankTimer> {
        self.get(Bucket::Engine.key())
            .ok()
            .flatten()
            .and_then(|json| serde_json::from_str(&json).ok())
    }
}
