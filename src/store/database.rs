//! Per-call SQLite connections.
//!
//! Every call opens a fresh connection, runs one closure on tokio-rusqlite's
//! background thread and closes the connection again. No pooling.

use std::path::PathBuf;
use std::time::Duration;

use tokio_rusqlite::Connection;

use super::error::map_tokio_rusqlite_error;
use crate::error::Result;

/// How long a statement waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the SQLite database file.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens a connection, runs `function` against it and closes it.
    ///
    /// The file is created if it does not exist.
    pub async fn call<F, T>(&self, function: F) -> Result<T>
    where
        F: FnOnce(&mut rusqlite::Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Connection::open(&self.path)
            .await
            .map_err(map_tokio_rusqlite_error)?;

        let result = conn
            .call(move |conn| {
                conn.busy_timeout(BUSY_TIMEOUT)
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;
                function(conn).map_err(tokio_rusqlite::Error::Rusqlite)
            })
            .await
            .map_err(map_tokio_rusqlite_error);

        if let Err(err) = conn.close().await {
            tracing::warn!(path = %self.path.display(), error = %err, "Failed to close database connection");
        }

        result
    }
}
