//! SQLite-backed store (feature `sqlite`).

use std::path::Path;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use tokio::runtime::{Builder, Runtime};

use super::{KeyValueStore, StorageError};

/// `sqlx` pool driven by a private current-thread runtime so the store keeps a
/// synchronous API.
#[derive(Debug)]
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
    runtime: Runtime,
}

impl SqliteKeyValueStore {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create store directory at {:?}", parent))?;
        }

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to create runtime for SqliteKeyValueStore")?;

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = runtime
            .block_on(SqlitePool::connect_with(options))
            .with_context(|| format!("failed to create SQLite pool at {:?}", path))?;

        runtime
            .block_on(
                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS records (
                        key        TEXT PRIMARY KEY,
                        value      TEXT NOT NULL,
                        updated_at TEXT NOT NULL
                    )
                    "#,
                )
                .execute(&pool),
            )
            .context("failed to create records table")?;

        Ok(Self { pool, runtime })
    }
}

fn backend(err: sqlx::Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

const UPSERT: &str = r#"
    INSERT INTO records (key, value, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(key)
    DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.runtime.block_on(async {
            let row = sqlx::query("SELECT value FROM records WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;

            match row {
                Some(row) => Ok(Some(row.try_get::<String, _>("value").map_err(backend)?)),
                None => Ok(None),
            }
        })
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.put_all(&[(key, value.to_string())])
    }

    /// All records are written in one transaction.
    fn put_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let now = chrono::Utc::now().to_rfc3339();

        self.runtime.block_on(async {
            let mut tx = self.pool.begin().await.map_err(backend)?;
            for (key, value) in entries {
                sqlx::query(UPSERT)
                    .bind(*key)
                    .bind(value.as_str())
                    .bind(now.as_str())
                    .execute(&mut *tx)
                    .await
                    .map_err(backend)?;
            }
            tx.commit().await.map_err(backend)
        })
    }
}
