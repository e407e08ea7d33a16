// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`StateStore`] implementations: SQLite table and process memory.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use yolchi_config::model::{StateBackend, StorageConfig};
use yolchi_core::{StateStore, YolchiError};

use crate::database::Database;
use crate::queries::documents;

/// Campaign documents kept in the `campaign_documents` table.
#[derive(Clone)]
pub struct SqliteStateStore {
    db: Database,
}

impl SqliteStateStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, YolchiError> {
        documents::get_document(&self.db, key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), YolchiError> {
        documents::put_document(&self.db, key, value).await?;
        debug!(key, bytes = value.len(), "document stored");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), YolchiError> {
        let existed = documents::delete_document(&self.db, key).await?;
        debug!(key, existed, "document deleted");
        Ok(())
    }
}

/// Campaign documents held in process memory.
#[derive(Default)]
pub struct MemoryStateStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, YolchiError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), YolchiError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), YolchiError> {
        self.values.write().await.remove(key);
        Ok(())
    }
}

/// Build the state store selected by the storage configuration.
pub fn state_store_for(config: &StorageConfig, db: &Database) -> Arc<dyn StateStore> {
    match config.state_backend {
        StateBackend::Sqlite => Arc::new(SqliteStateStore::new(db.clone())),
        StateBackend::Memory => {
            warn!("campaign state kept in memory; documents are lost on restart");
            Arc::new(MemoryStateStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn exercise(store: &dyn StateStore) {
        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "{\"a\":1}").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("{\"a\":1}"));
        store.set("k", "{\"a\":2}").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("{\"a\":2}"));
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.delete("k").await.unwrap();
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        exercise(&MemoryStateStore::new()).await;
    }

    #[tokio::test]
    async fn sqlite_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("s.db").to_str().unwrap())
            .await
            .unwrap();
        exercise(&SqliteStateStore::new(db)).await;
    }
}
