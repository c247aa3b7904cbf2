//! In-memory [`KvStore`] implementation for tests and embedded use.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::KvStore;

/// `HashMap` behind a `RwLock`. Nothing survives the process.
#[derive(Default)]
pub struct InMemoryKv {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for InMemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow!("kv store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow!("kv store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
