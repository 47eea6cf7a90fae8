use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;

use crate::config::{Config, StoreConfig};
use crate::spanner::SpannerStore;

/// Fixed record keys in the external store's flat namespace.
pub mod keys {
    pub const EMOJIS: &str = "emojis";
    pub const BOT_STATUS: &str = "bot-status";
}

/// Key-value store facade over the configured backend
///
/// Records are JSON documents serialized to strings on the way in and parsed
/// on the way out, so both backends see a flat string-to-string namespace.
#[derive(Clone)]
pub enum Store {
    Spanner(SpannerStore),
    Memory(MemoryStore),
}

impl Store {
    /// Create the store backend selected by configuration
    pub async fn from_config(config: &Config) -> Result<Self> {
        match &config.store {
            StoreConfig::Spanner(spanner) => {
                Ok(Store::Spanner(SpannerStore::from_config(spanner).await?))
            }
            StoreConfig::Memory => Ok(Store::Memory(MemoryStore::new())),
        }
    }

    /// Read the JSON document stored under `key`
    ///
    /// # Errors
    /// Returns an error if the backend read fails or the stored value is not
    /// valid JSON.
    pub async fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let raw = match self {
            Store::Spanner(spanner) => spanner.get(key).await?,
            Store::Memory(memory) => memory.get(key).await,
        };

        match raw {
            Some(raw) => {
                let value = serde_json::from_str(&raw)
                    .context("Failed to deserialize stored JSON document")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Overwrite the JSON document stored under `key`
    ///
    /// # Errors
    /// Returns an error if serialization or the backend write fails.
    pub async fn put(&self, key: &str, value: &JsonValue) -> Result<()> {
        let raw = serde_json::to_string(value)
            .context("Failed to serialize JSON document")?;

        match self {
            Store::Spanner(spanner) => spanner.put(key, &raw).await,
            Store::Memory(memory) => {
                memory.put(key, raw).await;
                Ok(())
            }
        }
    }

    /// Verify that the backend is reachable
    ///
    /// # Errors
    /// Returns an error if the backend cannot be queried.
    pub async fn health_check(&self) -> Result<()> {
        match self {
            Store::Spanner(spanner) => spanner.health_check().await,
            Store::Memory(_) => Ok(()),
        }
    }
}

/// In-process backend for local development and tests
///
/// Holds raw serialized documents behind a `RwLock`; the lock is for interior
/// mutability only, writes still race last-writer-wins like the hosted store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    async fn put(&self, key: &str, value: String) {
        self.entries.write().await.insert(key.to_string(), value);
    }
}
