// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements run on tokio-rusqlite's single background thread, so a
//! [`Database`] serializes its callers. Each [`Database::transact`] call gets
//! its own [`TxCoordinator`]; coordinators never outlive the closure they
//! were created for.

use std::path::Path;
use std::time::Duration;

use minibb_config::model::StorageConfig;
use minibb_core::BbError;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::map_tr_err;
use crate::migrations::run_migrations;
use crate::tx::TxCoordinator;

/// Async handle to the forum database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path`, apply connection
    /// PRAGMAs, and run pending migrations.
    pub async fn open(path: &str, config: &StorageConfig) -> Result<Self, BbError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| BbError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| BbError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(config.wal_mode, config.busy_timeout_ms).await?;
        info!(path, wal = config.wal_mode, "database opened");
        Ok(db)
    }

    /// Open a private in-memory database with the schema applied.
    pub async fn open_in_memory() -> Result<Self, BbError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| BbError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(false, StorageConfig::default().busy_timeout_ms)
            .await?;
        Ok(db)
    }

    /// Run `f` against the bare connection, outside any unit of work.
    pub async fn read<T, F>(&self, f: F) -> Result<T, BbError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, BbError> + Send + 'static,
    {
        self.conn
            .call(move |conn| -> Result<Result<T, BbError>, rusqlite::Error> { Ok(f(conn)) })
            .await
            .map_err(map_tr_err)?
    }

    /// Run `f` as a root unit of work on a fresh coordinator.
    ///
    /// `f` commits on `Ok` and rolls back on `Err`; units it nests through
    /// [`TxCoordinator::run`] become savepoints.
    pub async fn transact<T, F>(&self, f: F) -> Result<T, BbError>
    where
        T: Send + 'static,
        F: FnOnce(&mut TxCoordinator<'_>) -> Result<T, BbError> + Send + 'static,
    {
        self.conn
            .call(move |conn| -> Result<Result<T, BbError>, rusqlite::Error> {
                let mut coord = TxCoordinator::new(conn);
                Ok(coord.run(f))
            })
            .await
            .map_err(map_tr_err)?
    }

    /// Fold the WAL back into the main database file.
    pub async fn checkpoint(&self) -> Result<(), BbError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn prepare(&self, wal_mode: bool, busy_timeout_ms: u64) -> Result<(), BbError> {
        self.conn
            .call(move |conn| -> Result<Result<(), BbError>, rusqlite::Error> {
                apply_pragmas(conn, wal_mode, Duration::from_millis(busy_timeout_ms))?;
                Ok(run_migrations(conn))
            })
            .await
            .map_err(map_tr_err)?
    }
}

fn apply_pragmas(conn: &Connection, wal_mode: bool, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.busy_timeout(busy_timeout)?;
    if wal_mode {
        // journal_mode reports the resulting mode as a row.
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        debug!(mode = %mode, "journal mode set");
    }
    conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA synchronous = NORMAL;")?;
    Ok(())
}
