//! Async key-value storage shim.
//!
//! Two backends behind one trait: [`FileStore`] persists entries to disk and
//! survives restarts, [`MemoryStore`] lives only for the process lifetime.
//! The hosting environment picks a backend once at startup via [`select`];
//! callers never probe per operation.

mod disk;
mod memory;

pub use disk::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use futures::future;
use std::path::PathBuf;

/// Faults from the underlying backend, surfaced to the caller unmodified.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt storage file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Uniform async contract over whichever backend was selected.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, overwriting any prior value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes `key` if present; no-op otherwise.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    async fn clear(&self) -> Result<(), StorageError>;

    /// All stored keys, in whatever order the backend enumerates them.
    async fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Ordered `(key, value)` lookups, dispatched concurrently.
    async fn multi_get(
        &self,
        keys: &[String],
    ) -> Result<Vec<(String, Option<String>)>, StorageError> {
        future::try_join_all(keys.iter().map(|key| async move {
            Ok::<_, StorageError>((key.clone(), self.get(key).await?))
        }))
        .await
    }

    /// Applies every pair concurrently, overwrite semantics per pair. Pairs
    /// already written stay written even if another pair fails.
    async fn multi_set(&self, pairs: &[(String, String)]) -> Result<(), StorageError> {
        future::try_join_all(pairs.iter().map(|(key, value)| self.set(key, value))).await?;
        Ok(())
    }

    /// Deletes every key concurrently.
    async fn multi_remove(&self, keys: &[String]) -> Result<(), StorageError> {
        future::try_join_all(keys.iter().map(|key| self.remove(key))).await?;
        Ok(())
    }
}

/// Default data directory (`~/.krishi_gateway`), if a home directory exists.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".krishi_gateway"))
}

/// Picks the backend once from the hosting environment's capability: a
/// usable data directory gives the durable file-backed store, anything else
/// falls back to the in-memory map. The fallback is an accepted degradation;
/// its values do not survive a restart.
pub fn select(data_dir: Option<PathBuf>) -> Box<dyn KeyValueStore> {
    match data_dir.or_else(default_data_dir) {
        Some(dir) => match FileStore::open(&dir) {
            Ok(store) => {
                tracing::info!("Using durable key-value store at {:?}", dir);
                Box::new(store)
            }
            Err(e) => {
                tracing::warn!(
                    "Durable store unavailable ({}); values will not survive restart",
                    e
                );
                Box::new(MemoryStore::new())
            }
        },
        None => {
            tracing::warn!("No home directory; values will not survive restart");
            Box::new(MemoryStore::new())
        }
    }
}
