//! Opening the `SQLite` file that backs the key-value store.
//!
//! Every `put` must survive a power cut on its own: the schedule store
//! relies on the order of individual writes, not on transactions. The
//! connection is therefore opened in WAL mode with `synchronous = FULL`,
//! which syncs the log on every commit.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};

use crate::error::StorageError;

/// How long a writer waits on a locked database before giving up.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the store lives and how patient writers are.
#[derive(Debug, Clone)]
pub struct Config {
    /// `sqlx` `SQLite` URL, e.g. `sqlite:acctl.db` or `sqlite::memory:`.
    pub database_url: String,
    pub busy_timeout: Duration,
}

impl Config {
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    fn connect_options(&self) -> Result<SqliteConnectOptions, StorageError> {
        Ok(SqliteConnectOptions::from_str(&self.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full)
            .busy_timeout(self.busy_timeout))
    }

    /// Open (creating if needed) the database and bring its schema up to
    /// date.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the URL is invalid, the file cannot be
    /// opened, or a migration fails.
    pub async fn build(self) -> Result<Database, StorageError> {
        let pool = SqlitePool::connect_with(self.connect_options()?).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(
            url = %self.database_url,
            busy_timeout_ms = self.busy_timeout.as_millis(),
            "key-value database ready"
        );
        Ok(Database { pool })
    }
}

/// An open, migrated database.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
