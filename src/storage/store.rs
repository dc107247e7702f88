//! Bucket store backed by an embedded SQLite database
//!
//! Buckets are rows of the `buckets` table; entries live in a `WITHOUT ROWID`
//! table keyed by `(bucket_id, key)`, so keys iterate in byte-wise ascending
//! order. Reads run in a deferred transaction (a consistent WAL snapshot),
//! writes in an immediate transaction that holds the single writer lock until
//! commit.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bucket does not exist: {0}")]
    BucketNotFound(String),

    #[error("bucket already exists: {0}")]
    BucketAlreadyExists(String),

    #[error("store schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema { found: i32, supported: i32 },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Entry count and payload size of one bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketStats {
    pub name: String,
    pub entries: u64,
    pub bytes: u64,
}

/// Handle to an opened store file
pub struct Store {
    path: PathBuf,
    conn: Connection,
}

impl Store {
    /// Schema version - bump when the layout changes
    const SCHEMA_VERSION: i32 = 1;

    /// Opens the store at `path`, creating the file if it does not exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;

        // WAL gives readers a snapshot that concurrent writers do not disturb
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self { path, conn };
        store.ensure_schema()?;

        debug!(path = %store.path.display(), "store opened");
        Ok(store)
    }

    /// Returns the path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_schema(&self) -> Result<(), StoreError> {
        let version: i32 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version > Self::SCHEMA_VERSION {
            return Err(StoreError::UnsupportedSchema {
                found: version,
                supported: Self::SCHEMA_VERSION,
            });
        }

        if version < Self::SCHEMA_VERSION {
            self.conn.execute_batch(
                "
                CREATE TABLE IF NOT EXISTS buckets (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL UNIQUE
                );

                CREATE TABLE IF NOT EXISTS entries (
                    bucket_id INTEGER NOT NULL REFERENCES buckets(id),
                    key TEXT NOT NULL,
                    value BLOB NOT NULL,
                    PRIMARY KEY (bucket_id, key)
                ) WITHOUT ROWID;
                ",
            )?;
            self.conn.execute(
                &format!("PRAGMA user_version = {}", Self::SCHEMA_VERSION),
                [],
            )?;
        }

        Ok(())
    }

    /// Runs `f` inside a read transaction
    fn view<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        // Dropping the transaction rolls it back; nothing was written
        f(&tx)
    }

    /// Runs `f` inside a write transaction, committing only if it succeeds
    fn update<T>(
        &mut self,
        f: impl FnOnce(&Transaction<'_>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    /// Lists all bucket names in tree (ascending name) order
    pub fn buckets(&self) -> Result<Vec<String>, StoreError> {
        self.view(|tx| {
            let mut stmt = tx.prepare("SELECT name FROM buckets ORDER BY name")?;
            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(names)
        })
    }

    /// Returns true if the bucket exists
    pub fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError> {
        self.view(|tx| Ok(bucket_id(tx, bucket)?.is_some()))
    }

    /// Lists the keys of a bucket in ascending order
    pub fn keys(&self, bucket: &str) -> Result<Vec<String>, StoreError> {
        self.view(|tx| {
            let id = require_bucket(tx, bucket)?;
            let mut stmt = tx.prepare("SELECT key FROM entries WHERE bucket_id = ?1 ORDER BY key")?;
            let keys = stmt
                .query_map(params![id], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(keys)
        })
    }

    /// Reads a value.
    ///
    /// A missing key yields an empty value rather than an error, so a missing
    /// key and an empty value cannot be told apart. A missing bucket is an
    /// error.
    pub fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.view(|tx| {
            let id = require_bucket(tx, bucket)?;
            let value: Option<Vec<u8>> = tx
                .query_row(
                    "SELECT value FROM entries WHERE bucket_id = ?1 AND key = ?2",
                    params![id, key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value.unwrap_or_default())
        })
    }

    /// Inserts or replaces a value; the bucket must already exist
    pub fn set(&mut self, bucket: &str, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.update(|tx| {
            let id = require_bucket(tx, bucket)?;
            tx.execute(
                "INSERT OR REPLACE INTO entries (bucket_id, key, value) VALUES (?1, ?2, ?3)",
                params![id, key, value],
            )?;
            Ok(())
        })?;
        debug!(bucket, key, bytes = value.len(), "value written");
        Ok(())
    }

    /// Creates an empty bucket
    pub fn create_bucket(&mut self, bucket: &str) -> Result<(), StoreError> {
        self.update(|tx| {
            if bucket_id(tx, bucket)?.is_some() {
                return Err(StoreError::BucketAlreadyExists(bucket.to_string()));
            }
            tx.execute("INSERT INTO buckets (name) VALUES (?1)", params![bucket])?;
            Ok(())
        })?;
        debug!(bucket, "bucket created");
        Ok(())
    }

    /// Deletes a bucket together with all of its entries
    pub fn delete_bucket(&mut self, bucket: &str) -> Result<(), StoreError> {
        let removed = self.update(|tx| {
            let id = require_bucket(tx, bucket)?;
            let removed = tx.execute("DELETE FROM entries WHERE bucket_id = ?1", params![id])?;
            tx.execute("DELETE FROM buckets WHERE id = ?1", params![id])?;
            Ok(removed)
        })?;
        debug!(bucket, entries = removed, "bucket deleted");
        Ok(())
    }

    /// Deletes one entry. Deleting an absent key is not an error.
    pub fn delete_key(&mut self, bucket: &str, key: &str) -> Result<(), StoreError> {
        self.update(|tx| {
            let id = require_bucket(tx, bucket)?;
            tx.execute(
                "DELETE FROM entries WHERE bucket_id = ?1 AND key = ?2",
                params![id, key],
            )?;
            Ok(())
        })?;
        debug!(bucket, key, "key deleted");
        Ok(())
    }

    /// Per-bucket entry counts and payload sizes, in bucket order
    pub fn stats(&self) -> Result<Vec<BucketStats>, StoreError> {
        self.view(|tx| {
            let mut stmt = tx.prepare(
                "SELECT b.name, COUNT(e.key), COALESCE(SUM(LENGTH(e.value)), 0)
                 FROM buckets b LEFT JOIN entries e ON e.bucket_id = b.id
                 GROUP BY b.id
                 ORDER BY b.name",
            )?;
            let stats = stmt
                .query_map([], |row| {
                    Ok(BucketStats {
                        name: row.get(0)?,
                        entries: row.get::<_, i64>(1)? as u64,
                        bytes: row.get::<_, i64>(2)? as u64,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(stats)
        })
    }
}

fn bucket_id(conn: &Connection, bucket: &str) -> Result<Option<i64>, StoreError> {
    let id = conn
        .query_row(
            "SELECT id FROM buckets WHERE name = ?1",
            params![bucket],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

fn require_bucket(conn: &Connection, bucket: &str) -> Result<i64, StoreError> {
    bucket_id(conn, bucket)?.ok_or_else(|| StoreError::BucketNotFound(bucket.to_string()))
}
