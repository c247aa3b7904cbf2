//! Core data models used throughout Oasis.
//!
//! These types mirror the JSON artifacts deposited by the external
//! producers: the feed index (`feeds.json`), per-item transcripts and
//! summaries, and the sources list. Field names on the wire follow those
//! artifacts exactly, so feed items are camelCase while enrichment files
//! are snake_case.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// The content service an item or source originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Bilibili,
    X,
    Podcast,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Youtube,
        Platform::Bilibili,
        Platform::X,
        Platform::Podcast,
    ];

    /// Wire identifier (`youtube`, `bilibili`, `x`, `podcast`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Bilibili => "bilibili",
            Platform::X => "x",
            Platform::Podcast => "podcast",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Youtube => "YouTube",
            Platform::Bilibili => "Bilibili",
            Platform::X => "X",
            Platform::Podcast => "Podcast",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "youtube" => Ok(Platform::Youtube),
            "bilibili" => Ok(Platform::Bilibili),
            "x" | "twitter" => Ok(Platform::X),
            "podcast" => Ok(Platform::Podcast),
            _ => Err(ParseError::Platform(s.to_string())),
        }
    }
}

/// A topical tag attached to items and sources.
///
/// Producers may emit tags this build does not know about; those are kept
/// verbatim as [`Domain::Other`] rather than rejected, so a new tag in the
/// data never breaks loading the feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Domain {
    Ai,
    Business,
    Global,
    Creator,
    Dev,
    Design,
    Tech,
    Growth,
    Other(String),
}

impl Domain {
    pub const KNOWN: [Domain; 8] = [
        Domain::Ai,
        Domain::Business,
        Domain::Global,
        Domain::Creator,
        Domain::Dev,
        Domain::Design,
        Domain::Tech,
        Domain::Growth,
    ];

    fn known(tag: &str) -> Option<Domain> {
        match tag.to_ascii_lowercase().as_str() {
            "ai" => Some(Domain::Ai),
            "business" => Some(Domain::Business),
            "global" => Some(Domain::Global),
            "creator" => Some(Domain::Creator),
            "dev" => Some(Domain::Dev),
            "design" => Some(Domain::Design),
            "tech" => Some(Domain::Tech),
            "growth" => Some(Domain::Growth),
            _ => None,
        }
    }

    /// Lenient conversion used for data read from artifacts.
    pub fn from_tag(tag: &str) -> Domain {
        Domain::known(tag).unwrap_or_else(|| Domain::Other(tag.to_string()))
    }

    /// Wire tag as written by the producers (`AI`, `Business`, ...).
    pub fn as_str(&self) -> &str {
        match self {
            Domain::Ai => "AI",
            Domain::Business => "Business",
            Domain::Global => "Global",
            Domain::Creator => "Creator",
            Domain::Dev => "Dev",
            Domain::Design => "Design",
            Domain::Tech => "Tech",
            Domain::Growth => "Growth",
            Domain::Other(tag) => tag,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Domain::Ai => "AI & Tech",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse for user input: only the known tags are accepted.
impl FromStr for Domain {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::known(s.trim()).ok_or_else(|| ParseError::Domain(s.to_string()))
    }
}

impl From<String> for Domain {
    fn from(tag: String) -> Self {
        Domain::known(&tag).unwrap_or(Domain::Other(tag))
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        match domain {
            Domain::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

/// One piece of ingested content metadata shown in the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: String,
    /// Display name of the source.
    pub source: String,
    pub source_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_avatar: Option<String>,
    pub platform: Platform,
    #[serde(default)]
    pub domains: Vec<Domain>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    /// Length in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// RFC 3339 publish timestamp, kept as written by the producer.
    pub published: String,
    #[serde(default)]
    pub has_transcript: bool,
    #[serde(default)]
    pub transcript_preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_summary: Option<bool>,
}

impl FeedItem {
    /// Title, falling back to the post body for untitled items (microblog
    /// posts have no title).
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.content.as_deref().filter(|c| !c.is_empty()))
            .unwrap_or("(untitled)")
    }

    /// Parsed publish time. RFC 3339 is preferred; an ISO 8601 timestamp
    /// without an offset (`2025-01-10T11:00:00.123456`) is read as UTC.
    /// `None` for anything else.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.published) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.published, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn has_domain(&self, domain: &Domain) -> bool {
        self.domains.iter().any(|d| d == domain)
    }
}

/// The feed index (`feeds.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedsData {
    pub last_updated: String,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub items: Vec<FeedItem>,
}

impl FeedsData {
    pub fn find(&self, id: &str) -> Option<&FeedItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub source: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub full_text: String,
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
    #[serde(default)]
    pub word_count: u64,
    #[serde(default)]
    pub fetched_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryKeyPoint {
    /// Offset into the media, in seconds.
    pub timestamp: f64,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<SummaryKeyPoint>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub generated_at: String,
}

/// A followed channel, account, or feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub name: String,
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub domains: Vec<Domain>,
}

impl Source {
    /// The platform-specific handle this source is followed by.
    pub fn handle(&self) -> Option<&str> {
        self.channel_id
            .as_deref()
            .or(self.uid.as_deref())
            .or(self.username.as_deref())
            .or(self.feed_url.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainInfo {
    pub id: Domain,
    pub label: String,
    #[serde(default)]
    pub color: String,
}

/// The sources list (`sources.yaml` / `sources.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub domains: Vec<DomainInfo>,
}
