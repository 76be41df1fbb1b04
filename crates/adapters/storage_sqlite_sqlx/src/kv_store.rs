//! `SQLite` implementation of [`KeyValueStore`].

use std::future::Future;

use sqlx::SqlitePool;

use acctl_app::ports::KeyValueStore;
use acctl_domain::error::AcCtlError;

use crate::error::StorageError;

const SELECT_VALUE: &str = "SELECT value FROM kv WHERE namespace = ? AND key = ?";
const UPSERT_VALUE: &str = "INSERT INTO kv (namespace, key, value) VALUES (?, ?, ?) \
     ON CONFLICT (namespace, key) DO UPDATE SET value = excluded.value, \
     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// `SQLite`-backed key-value store.
///
/// Each `put` is its own statement, hence its own implicit transaction.
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
}

impl SqliteKeyValueStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(
        &self,
        namespace: &str,
        key: &str,
    ) -> impl Future<Output = Result<Option<i64>, AcCtlError>> + Send {
        let pool = self.pool.clone();
        let namespace = namespace.to_string();
        let key = key.to_string();
        async move {
            let row: Option<(i64,)> = sqlx::query_as(SELECT_VALUE)
                .bind(&namespace)
                .bind(&key)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|(value,)| value))
        }
    }

    fn put(
        &self,
        namespace: &str,
        key: &str,
        value: i64,
    ) -> impl Future<Output = Result<(), AcCtlError>> + Send {
        let pool = self.pool.clone();
        let namespace = namespace.to_string();
        let key = key.to_string();
        async move {
            sqlx::query(UPSERT_VALUE)
                .bind(&namespace)
                .bind(&key)
                .bind(value)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
