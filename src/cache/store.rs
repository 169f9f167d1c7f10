use std::future::Future;

use anyhow::Result;

use crate::cache::file_store::FileStore;
use crate::cache::token_cache::MemoryStore;
use crate::config::settings::StorageConfig;

/// Key-value slot holding the serialized token record.
///
/// Stands in for browser-scoped storage: one shared mutable slot per key,
/// no locking across `get` and `set`.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    fn set(&self, key: &str, value: Vec<u8>) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone)]
pub enum StoreKind {
    Memory(MemoryStore),
    File(FileStore),
}

impl StoreKind {
    pub fn name(&self) -> &'static str {
        match self {
            StoreKind::Memory(_) => "memory",
            StoreKind::File(_) => "file",
        }
    }
}

impl TokenStore for StoreKind {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self {
            StoreKind::Memory(s) => s.get(key).await,
            StoreKind::File(s) => s.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        match self {
            StoreKind::Memory(s) => s.set(key, value).await,
            StoreKind::File(s) => s.set(key, value).await,
        }
    }
}

pub fn build_store(cfg: &StorageConfig) -> StoreKind {
    match cfg {
        StorageConfig::Memory { .. } => StoreKind::Memory(MemoryStore::new()),
        StorageConfig::File { path, .. } => StoreKind::File(FileStore::new(path)),
    }
}
