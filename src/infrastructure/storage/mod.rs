//! SQLite-backed bucket store
//!
//! A bucket is a row in `buckets`; its quotes live in `quotes`, ordered by id.
//! Every call opens its own connection and closes it before returning, so the
//! dispatcher and the HTTP surface can share one handle without holding a
//! connection between decisions.

use async_trait::async_trait;
use rusqlite::{params, Connection, TransactionBehavior};
use std::path::{Path, PathBuf};

use crate::application::errors::StorageError;
use crate::domain::entities::Quote;
use crate::domain::traits::BucketStore;

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;
    CREATE TABLE IF NOT EXISTS buckets (
        name TEXT PRIMARY KEY,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE TABLE IF NOT EXISTS quotes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        bucket TEXT NOT NULL REFERENCES buckets(name) ON DELETE CASCADE,
        body TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_quotes_bucket ON quotes(bucket);
";

/// Handle to the quote database. Cheap to share; holds only the path.
#[derive(Debug, Clone)]
pub struct SqliteBucketStore {
    path: PathBuf,
}

impl SqliteBucketStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the database once to surface configuration problems at startup
    pub fn init(&self) -> Result<(), StorageError> {
        close(open(&self.path)?)
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Path) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || f(&path))
            .await
            .map_err(|e| StorageError::Unavailable(format!("store task failed: {}", e)))?
    }
}

fn open(path: &Path) -> Result<Connection, StorageError> {
    let conn = Connection::open(path).map_err(|e| StorageError::Unavailable(e.to_string()))?;
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;
    conn.execute_batch(SCHEMA)
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;
    Ok(conn)
}

fn close(conn: Connection) -> Result<(), StorageError> {
    conn.close()
        .map_err(|(_, e)| StorageError::Unavailable(e.to_string()))
}

fn append_quote(path: &Path, bucket: &str, quote: &str) -> Result<(), StorageError> {
    let mut conn = open(path)?;
    let write_err = |e: rusqlite::Error| StorageError::WriteFailed(e.to_string());

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(write_err)?;
    tx.execute("INSERT OR IGNORE INTO buckets (name) VALUES (?1)", [bucket])
        .map_err(write_err)?;
    tx.execute(
        "INSERT INTO quotes (bucket, body) VALUES (?1, ?2)",
        params![bucket, quote],
    )
    .map_err(write_err)?;
    tx.commit().map_err(write_err)?;

    close(conn)
}

fn read_quotes(path: &Path, bucket: &str) -> Result<Vec<Quote>, StorageError> {
    let mut conn = open(path)?;
    let read_err = |e: rusqlite::Error| StorageError::ReadFailed(e.to_string());

    // The read and the prune share one write lock so an append cannot land
    // between them and lose its quote to the cascade.
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(read_err)?;
    let quotes = {
        let mut stmt = tx
            .prepare("SELECT body FROM quotes WHERE bucket = ?1 ORDER BY id")
            .map_err(read_err)?;
        let rows = stmt
            .query_map([bucket], |row| row.get::<_, String>(0))
            .map_err(read_err)?;
        let quotes = rows.collect::<Result<Vec<String>, _>>().map_err(read_err)?;
        quotes
    };

    if quotes.is_empty() {
        // no-op when the bucket was never created
        if let Err(e) = tx.execute(
            "DELETE FROM buckets WHERE name = ?1 \
             AND NOT EXISTS (SELECT 1 FROM quotes WHERE bucket = ?1)",
            [bucket],
        ) {
            tracing::warn!("Could not remove empty bucket '{}': {}", bucket, e);
        }
    }
    tx.commit().map_err(read_err)?;

    close(conn)?;
    Ok(quotes.into_iter().map(Quote::from).collect())
}

fn list_buckets(path: &Path) -> Result<Vec<String>, StorageError> {
    let conn = open(path)?;
    let read_err = |e: rusqlite::Error| StorageError::ReadFailed(e.to_string());

    let names = {
        let mut stmt = conn
            .prepare("SELECT name FROM buckets ORDER BY name")
            .map_err(read_err)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0)).map_err(read_err)?;
        let names = rows.collect::<Result<Vec<String>, _>>().map_err(read_err)?;
        names
    };

    close(conn)?;
    Ok(names)
}

#[async_trait]
impl BucketStore for SqliteBucketStore {
    async fn append(&self, bucket: &str, quote: &str) -> Result<(), StorageError> {
        let bucket = bucket.to_string();
        let quote = quote.to_string();
        self.blocking(move |path| append_quote(path, &bucket, &quote)).await
    }

    async fn read_all(&self, bucket: &str) -> Result<Vec<Quote>, StorageError> {
        let bucket = bucket.to_string();
        self.blocking(move |path| read_quotes(path, &bucket)).await
    }

    async fn bucket_names(&self) -> Result<Vec<String>, StorageError> {
        self.blocking(list_buckets).await
    }
}
