//! API key persistence
//!
//! Mirrors the host's client storage: string values under string keys, and a
//! missing key reads back as an empty string.

use async_trait::async_trait;
use directories::ProjectDirs;
use redb::{Database, TableDefinition};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use crate::shared::error::{AppError, AppResult};

/// Storage key of the translation API key.
pub const API_KEY: &str = "API_KEY";

const STORAGE_TABLE: TableDefinition<&str, &str> = TableDefinition::new("client_storage");

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Value under `key`, or `""` when nothing is stored.
    async fn get(&self, key: &str) -> AppResult<String>;

    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    async fn api_key(&self) -> AppResult<String> {
        self.get(API_KEY).await
    }
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    values: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: &str) -> AppResult<String> {
        let values = self
            .values
            .lock()
            .map_err(|_| AppError::Storage("credential store poisoned".into()))?;
        Ok(values.get(key).cloned().unwrap_or_default())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| AppError::Storage("credential store poisoned".into()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Redb-backed store in the platform data directory.
pub struct RedbCredentialStore {
    db: Database,
}

impl RedbCredentialStore {
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Ok(Self { db })
    }

    pub fn open_default() -> AppResult<Self> {
        let dirs = ProjectDirs::from("com", "antigravity", "layer-translator")
            .ok_or_else(|| AppError::Storage("Failed to get project directories".to_string()))?;
        Self::open(&dirs.data_dir().join("client_storage.redb"))
    }
}

#[async_trait]
impl CredentialStore for RedbCredentialStore {
    async fn get(&self, key: &str) -> AppResult<String> {
        let read_txn = self.db.begin_read()?;
        // Table is created lazily by the first write
        if let Ok(table) = read_txn.open_table(STORAGE_TABLE) {
            if let Some(value) = table.get(key)? {
                return Ok(value.value().to_string());
            }
        }
        Ok(String::new())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(STORAGE_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        tracing::debug!("[Credentials] Stored value for {}", key);
        Ok(())
    }
}
