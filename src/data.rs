//! Read-only access to the producer artifacts.
//!
//! ```text
//! data/
//! ├── feeds.json              feed index
//! ├── transcripts/{id}.json   optional, per item
//! ├── summaries/{id}.json     optional, per item
//! └── sources.yaml            followed sources (.json also accepted)
//! ```
//!
//! Files are read on every call; nothing is cached, so a producer run that
//! rewrites `feeds.json` is visible on the next request.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use oasis_core::enrichment::EnrichmentSource;
use oasis_core::models::{FeedsData, SourcesConfig, Summary, Transcript};

use crate::config::DataConfig;

#[derive(Debug, Clone)]
pub struct DataRepository {
    feeds_path: PathBuf,
    transcripts_dir: PathBuf,
    summaries_dir: PathBuf,
    sources_path: PathBuf,
}

impl DataRepository {
    pub fn new(config: &DataConfig) -> Self {
        Self {
            feeds_path: config.feeds_path(),
            transcripts_dir: config.transcripts_path(),
            summaries_dir: config.summaries_path(),
            sources_path: config.sources_path(),
        }
    }

    pub async fn load_feeds(&self) -> Result<FeedsData> {
        let raw = match tokio::fs::read_to_string(&self.feeds_path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => anyhow::bail!(
                "feed index not found: {} (has the fetcher run?)",
                self.feeds_path.display()
            ),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read feed index: {}", self.feeds_path.display())
                })
            }
        };
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse feed index: {}", self.feeds_path.display()))
    }

    /// The sources list. A missing file yields an empty list.
    pub async fn load_sources(&self) -> Result<SourcesConfig> {
        let raw = match tokio::fs::read_to_string(&self.sources_path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %self.sources_path.display(), "sources file not found");
                return Ok(SourcesConfig::default());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read sources: {}", self.sources_path.display())
                })
            }
        };
        parse_sources(&self.sources_path, &raw)
    }
}

fn parse_sources(path: &Path, raw: &str) -> Result<SourcesConfig> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(raw)
            .with_context(|| format!("Failed to parse sources: {}", path.display()))
    } else {
        serde_yaml::from_str(raw)
            .with_context(|| format!("Failed to parse sources: {}", path.display()))
    }
}

/// `{dir}/{id}.json`, or `None` when `id` could escape `dir`.
fn artifact_path(dir: &Path, id: &str) -> Option<PathBuf> {
    let valid = !id.is_empty()
        && !id.starts_with('.')
        && !id.contains(['/', '\\', '\0'])
        && !id.contains("..");
    valid.then(|| dir.join(format!("{}.json", id)))
}

async fn read_optional_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
    };
    let value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(value))
}

#[async_trait]
impl EnrichmentSource for DataRepository {
    async fn fetch_transcript(&self, id: &str) -> Result<Option<Transcript>> {
        match artifact_path(&self.transcripts_dir, id) {
            Some(path) => read_optional_json(&path).await,
            None => Ok(None),
        }
    }

    async fn fetch_summary(&self, id: &str) -> Result<Option<Summary>> {
        match artifact_path(&self.summaries_dir, id) {
            Some(path) => read_optional_json(&path).await,
            None => Ok(None),
        }
    }
}
