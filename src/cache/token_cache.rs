use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cache::store::TokenStore;

/// Process-local token store: key -> serialized record
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())) }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

impl TokenStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let map = self.inner.read().await;
        Ok(map.get(key).cloned())
    }

    /// Overwrites any previous record under `key`
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut map = self.inner.write().await;
        map.insert(key.to_owned(), value);
        Ok(())
    }
}
