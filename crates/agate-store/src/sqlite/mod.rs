//! SQLite backend.
//!
//! One shared [`Database`] handle owns the connection; each entity type gets
//! a [`SqliteRecordStore`] view over it. Statements are always
//! parameterized and run on tokio's blocking pool.

mod schema;
mod store;

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::{Connection, ErrorCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

pub use schema::SqlEntity;
pub use store::SqliteRecordStore;

/// Location used when the database URL is `:memory:`.
pub const IN_MEMORY_URL: &str = ":memory:";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Connection settings for the SQLite backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// File path, `sqlite://` URL, or `:memory:`.
    pub url: String,
    /// Turn on `PRAGMA foreign_keys`, making dangling references a
    /// constraint violation.
    pub enforce_foreign_keys: bool,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "agate.db".into(),
            enforce_foreign_keys: false,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl DatabaseConfig {
    pub fn in_memory() -> Self {
        Self {
            url: IN_MEMORY_URL.into(),
            ..Self::default()
        }
    }

    /// The filesystem path named by `url`, or `None` for an in-memory database.
    pub fn path(&self) -> Option<&Path> {
        let path = self.url.strip_prefix("sqlite://").unwrap_or(&self.url);
        (path != IN_MEMORY_URL).then(|| Path::new(path))
    }
}

/// Shared handle to one SQLite connection.
///
/// Cloning is cheap; every clone talks to the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database and bootstrap any missing tables.
    pub fn open(config: &DatabaseConfig) -> StoreResult<Self> {
        let conn = match config.path() {
            Some(path) => Connection::open(path).map_err(map_sqlite_error)?,
            None => Connection::open_in_memory().map_err(map_sqlite_error)?,
        };
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(map_sqlite_error)?;
        // Set explicitly both ways: the bundled build enables foreign keys by default.
        let foreign_keys = if config.enforce_foreign_keys { "ON" } else { "OFF" };
        conn.execute_batch(&format!("PRAGMA foreign_keys = {foreign_keys};"))
            .map_err(map_sqlite_error)?;
        schema::bootstrap(&conn).map_err(map_sqlite_error)?;

        info!(
            url = %config.url,
            foreign_keys = config.enforce_foreign_keys,
            "opened database"
        );
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open(&DatabaseConfig::in_memory())
    }

    /// Round-trip a trivial query to prove the connection is usable.
    pub async fn ping(&self) -> StoreResult<()> {
        self.call(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map(|_| ())
                .map_err(map_sqlite_error)
        })
        .await
    }

    /// Run `f` against the connection on the blocking pool.
    pub async fn call<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Unavailable("connection lock poisoned".into()))?;
            f(&*guard)
        })
        .await
        .map_err(|err| StoreError::Internal(format!("database task failed: {err}")))?
    }

    /// Typed store view for one entity.
    pub fn store<E: SqlEntity>(&self) -> SqliteRecordStore<E> {
        debug!(table = E::TABLE, "creating record store");
        SqliteRecordStore::new(self.clone())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

/// Classify a rusqlite failure without losing its message.
pub(crate) fn map_sqlite_error(err: rusqlite::Error) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            ErrorCode::ConstraintViolation => StoreError::ConstraintViolation(err.to_string()),
            ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::CannotOpen
            | ErrorCode::SystemIoFailure
            | ErrorCode::NotADatabase => StoreError::Unavailable(err.to_string()),
            _ => StoreError::Internal(err.to_string()),
        },
        _ => StoreError::Internal(err.to_string()),
    }
}
