//! Persistent saved/watched id-sets.
//!
//! Each [`CollectionKind`] is one flat list of item ids stored as a JSON
//! array string under a fixed key in a [`KvStore`]. The list keeps insertion
//! order; [`Collection::add`] and [`Collection::remove`] are idempotent.
//!
//! There is a single writer on a single device: no eviction, no expiry, and
//! no conflict resolution.

pub mod memory;

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A persistent key-value string store.
///
/// Implementations must be `Send + Sync` so a collection can be shared
/// across request handlers.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`, `None` if never written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Saved,
    Watched,
}

impl CollectionKind {
    /// Storage key for this collection.
    pub fn key(&self) -> &'static str {
        match self {
            CollectionKind::Saved => "saved",
            CollectionKind::Watched => "watched",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CollectionKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "saved" => Ok(CollectionKind::Saved),
            "watched" => Ok(CollectionKind::Watched),
            _ => Err(ParseError::Collection(s.to_string())),
        }
    }
}

/// One id-set bound to its store.
pub struct Collection<'a> {
    store: &'a dyn KvStore,
    kind: CollectionKind,
}

impl<'a> Collection<'a> {
    pub fn new(store: &'a dyn KvStore, kind: CollectionKind) -> Self {
        Self { store, kind }
    }

    pub fn saved(store: &'a dyn KvStore) -> Self {
        Self::new(store, CollectionKind::Saved)
    }

    pub fn watched(store: &'a dyn KvStore) -> Self {
        Self::new(store, CollectionKind::Watched)
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// All ids in insertion order, as persisted.
    pub async fn list_all(&self) -> Result<Vec<String>> {
        let key = self.kind.key();
        match self.store.get(key).await? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).with_context(|| {
                format!("stored value for '{}' is not a JSON array of ids", key)
            }),
        }
    }

    pub async fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.list_all().await?.iter().any(|existing| existing == id))
    }

    /// Append `id` unless already present. Returns whether the set changed.
    pub async fn add(&self, id: &str) -> Result<bool> {
        let mut ids = self.list_all().await?;
        if ids.iter().any(|existing| existing == id) {
            return Ok(false);
        }
        ids.push(id.to_string());
        self.write(&ids).await?;
        tracing::debug!(collection = %self.kind, id, "added");
        Ok(true)
    }

    /// Remove `id` if present. Returns whether the set changed.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let mut ids = self.list_all().await?;
        let before = ids.len();
        ids.retain(|existing| existing != id);
        if ids.len() == before {
            return Ok(false);
        }
        self.write(&ids).await?;
        tracing::debug!(collection = %self.kind, id, "removed");
        Ok(true)
    }

    /// Flip membership of `id`. Returns the new membership.
    pub async fn toggle(&self, id: &str) -> Result<bool> {
        if self.contains(id).await? {
            self.remove(id).await?;
            Ok(false)
        } else {
            self.add(id).await?;
            Ok(true)
        }
    }

    async fn write(&self, ids: &[String]) -> Result<()> {
        let raw = serde_json::to_string(ids)?;
        self.store.set(self.kind.key(), &raw).await
    }
}
