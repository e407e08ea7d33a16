// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, migrations and lifecycle.
//!
//! Schema preparation runs once on a short-lived blocking connection; all
//! later queries go through tokio-rusqlite's single background thread.

use yolchi_config::model::StorageConfig;
use yolchi_core::YolchiError;
use tracing::{debug, info};

use crate::migrations::run_migrations;

/// Convert a tokio-rusqlite error into [`YolchiError::Storage`].
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> YolchiError {
    YolchiError::storage(e)
}

/// Handle to the SQLite database. Cloning shares the same background connection.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` with WAL enabled.
    pub async fn open(path: &str) -> Result<Self, YolchiError> {
        Self::open_with(path, true).await
    }

    /// Open the database described by the storage configuration.
    pub async fn open_from_config(config: &StorageConfig) -> Result<Self, YolchiError> {
        Self::open_with(&config.database_path, config.wal_mode).await
    }

    /// Open the database at `path`, choosing the journal mode.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, YolchiError> {
        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(YolchiError::storage)?;
        }

        let owned = path.to_string();
        tokio::task::spawn_blocking(move || prepare_schema(&owned, wal_mode))
            .await
            .map_err(|e| YolchiError::Internal(format!("schema preparation panicked: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(YolchiError::storage)?;
        conn.call(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;
            Ok::<_, rusqlite::Error>(())
        })
        .await
        .map_err(map_tr_err)?;

        info!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The shared async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Close the background connection, flushing pending work.
    pub async fn close(self) -> Result<(), YolchiError> {
        self.conn.close().await.map_err(YolchiError::storage)?;
        debug!("database closed");
        Ok(())
    }
}

/// Apply journal PRAGMAs and embedded migrations on a blocking connection.
fn prepare_schema(path: &str, wal_mode: bool) -> Result<(), YolchiError> {
    let mut conn = rusqlite::Connection::open(path).map_err(YolchiError::storage)?;
    let journal = if wal_mode { "WAL" } else { "DELETE" };
    conn.pragma_update(None, "journal_mode", journal)
        .map_err(YolchiError::storage)?;
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(YolchiError::storage)?;
    run_migrations(&mut conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_creates_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/yolchi.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();

        let tables: Vec<String> = db
            .connection()
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' \
                     AND name NOT LIKE 'sqlite_%' AND name NOT LIKE 'refinery_%' ORDER BY name",
                )?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok::<_, rusqlite::Error>(names)
            })
            .await
            .unwrap();

        assert_eq!(
            tables,
            vec![
                "campaign_documents",
                "customer_moderation_reasons",
                "customers",
                "driver_infos",
                "reasons",
                "regions",
                "sub_regions",
            ]
        );
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yolchi.db");
        let path = path.to_str().unwrap();

        Database::open(path).await.unwrap().close().await.unwrap();
        let db = Database::open_with(path, false).await.unwrap();
        db.close().await.unwrap();
    }
}
