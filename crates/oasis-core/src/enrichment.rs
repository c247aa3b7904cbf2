//! Lazy loading of per-item enrichment (transcripts and summaries).
//!
//! Enrichment artifacts are produced out-of-band and may simply not exist
//! for an item. Loading therefore never fails from the caller's point of
//! view: a missing resource and an unreadable one both resolve to
//! [`Availability::Unavailable`], and the view renders a fallback.
//!
//! An item view requests the transcript and the summary independently.
//! Either may complete first, and either may complete after the user has
//! moved on to another item. [`DetailState`] accepts completions in any
//! order and drops those whose [`ViewTicket`] is no longer current.
//!
//! ```text
//!   begin(item) ──▶ ticket #n ──┬──▶ load_transcript ──▶ apply_transcript(#n)
//!                               └──▶ load_summary    ──▶ apply_summary(#n)
//!   begin(other) / close() ──▶ #n is stale, late results are ignored
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::models::{FeedItem, Summary, Transcript};

/// Where enrichment artifacts are read from.
///
/// `Ok(None)` means the artifact does not exist for this id. `Err` is for
/// artifacts that exist but could not be read or parsed.
#[async_trait]
pub trait EnrichmentSource: Send + Sync {
    async fn fetch_transcript(&self, id: &str) -> Result<Option<Transcript>>;

    async fn fetch_summary(&self, id: &str) -> Result<Option<Summary>>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum Availability<T> {
    Available(T),
    Unavailable,
}

impl<T> Availability<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Availability::Available(value) => Some(value),
            Availability::Unavailable => None,
        }
    }
}

impl<T> From<Option<T>> for Availability<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Availability::Available(v),
            None => Availability::Unavailable,
        }
    }
}

pub async fn load_transcript(source: &dyn EnrichmentSource, id: &str) -> Availability<Transcript> {
    resolve("transcript", id, source.fetch_transcript(id).await)
}

pub async fn load_summary(source: &dyn EnrichmentSource, id: &str) -> Availability<Summary> {
    resolve("summary", id, source.fetch_summary(id).await)
}

fn resolve<T>(kind: &str, id: &str, fetched: Result<Option<T>>) -> Availability<T> {
    match fetched {
        Ok(Some(value)) => Availability::Available(value),
        Ok(None) => {
            tracing::debug!(kind, id, "enrichment not available");
            Availability::Unavailable
        }
        Err(e) => {
            tracing::warn!(kind, id, error = %format!("{:#}", e), "failed to load enrichment");
            Availability::Unavailable
        }
    }
}

/// Progress of one enrichment load inside an item view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum LoadState<T> {
    Idle,
    Loading,
    Ready(T),
    Unavailable,
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Availability<T>> for LoadState<T> {
    fn from(value: Availability<T>) -> Self {
        match value {
            Availability::Available(v) => LoadState::Ready(v),
            Availability::Unavailable => LoadState::Unavailable,
        }
    }
}

/// Proof that a load was started for a particular navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTicket {
    generation: u64,
    item_id: String,
}

impl ViewTicket {
    pub fn item_id(&self) -> &str {
        &self.item_id
    }
}

/// Navigation generation counter.
///
/// Every navigation (and every close) bumps the generation; only tickets
/// from the latest navigation are current. The counter is atomic so a
/// ticket can be checked from whichever task completes the load.
#[derive(Debug, Default)]
pub struct ViewGuard {
    generation: AtomicU64,
}

impl ViewGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigate(&self, item_id: &str) -> ViewTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        ViewTicket {
            generation,
            item_id: item_id.to_string(),
        }
    }

    /// Invalidate every outstanding ticket.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, ticket: &ViewTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }
}

/// What the transcript area of an item view shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TranscriptFallback<'a> {
    Full(&'a Transcript),
    Loading,
    Preview(&'a str),
    None,
}

/// Enrichment state of the item view currently on screen.
#[derive(Debug, Default)]
pub struct DetailState {
    guard: ViewGuard,
    item_id: Option<String>,
    transcript: LoadState<Transcript>,
    summary: LoadState<Summary>,
}

impl DetailState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the view to `item` and return the ticket both loads must
    /// present.
    ///
    /// The summary is always attempted. The transcript is only attempted
    /// when the feed says one exists; otherwise it starts out unavailable.
    pub fn begin(&mut self, item: &FeedItem) -> ViewTicket {
        let ticket = self.guard.navigate(&item.id);
        self.item_id = Some(item.id.clone());
        self.summary = LoadState::Loading;
        self.transcript = if item.has_transcript {
            LoadState::Loading
        } else {
            LoadState::Unavailable
        };
        ticket
    }

    /// Leave the view. Late results are dropped.
    pub fn close(&mut self) {
        self.guard.invalidate();
        self.item_id = None;
        self.transcript = LoadState::Idle;
        self.summary = LoadState::Idle;
    }

    pub fn guard(&self) -> &ViewGuard {
        &self.guard
    }

    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    pub fn transcript(&self) -> &LoadState<Transcript> {
        &self.transcript
    }

    pub fn summary(&self) -> &LoadState<Summary> {
        &self.summary
    }

    pub fn is_loading(&self) -> bool {
        self.transcript.is_loading() || self.summary.is_loading()
    }

    /// Apply a finished transcript load. Returns `false` if it was stale.
    pub fn apply_transcript(&mut self, ticket: &ViewTicket, result: Availability<Transcript>) -> bool {
        if !self.accepts(ticket, "transcript") {
            return false;
        }
        self.transcript = result.into();
        true
    }

    /// Apply a finished summary load. Returns `false` if it was stale.
    pub fn apply_summary(&mut self, ticket: &ViewTicket, result: Availability<Summary>) -> bool {
        if !self.accepts(ticket, "summary") {
            return false;
        }
        self.summary = result.into();
        true
    }

    fn accepts(&self, ticket: &ViewTicket, kind: &str) -> bool {
        if self.guard.is_current(ticket) {
            return true;
        }
        tracing::debug!(kind, id = ticket.item_id(), "discarding stale enrichment result");
        false
    }

    /// Pick what to render for the transcript of `item`.
    pub fn transcript_view<'a>(&'a self, item: &'a FeedItem) -> TranscriptFallback<'a> {
        transcript_fallback(&self.transcript, item)
    }
}

/// Full transcript when loaded, else the feed's preview text, else nothing.
pub fn transcript_fallback<'a>(
    state: &'a LoadState<Transcript>,
    item: &'a FeedItem,
) -> TranscriptFallback<'a> {
    match state {
        LoadState::Ready(transcript) => TranscriptFallback::Full(transcript),
        LoadState::Loading => TranscriptFallback::Loading,
        LoadState::Idle | LoadState::Unavailable => match item.transcript_preview.as_deref() {
            Some(preview) if !preview.is_empty() => TranscriptFallback::Preview(preview),
            _ => TranscriptFallback::None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Platform, SummaryKeyPoint, TranscriptSegment};
    use anyhow::bail;

    struct FixedSource;

    #[async_trait]
    impl EnrichmentSource for FixedSource {
        async fn fetch_transcript(&self, id: &str) -> Result<Option<Transcript>> {
            match id {
                "with" => Ok(Some(transcript())),
                "broken" => bail!("unexpected end of JSON input"),
                _ => Ok(None),
            }
        }

        async fn fetch_summary(&self, id: &str) -> Result<Option<Summary>> {
            match id {
                "with" => Ok(Some(summary())),
                "broken" => bail!("permission denied"),
                _ => Ok(None),
            }
        }
    }

    fn transcript() -> Transcript {
        Transcript {
            source: "youtube".into(),
            language: "en".into(),
            full_text: "hello world".into(),
            segments: vec![TranscriptSegment {
                start: 0.0,
                end: 2.5,
                text: "hello world".into(),
            }],
            word_count: 2,
            fetched_at: "2025-01-05T10:00:00Z".into(),
        }
    }

    fn summary() -> Summary {
        Summary {
            video_id: "with".into(),
            title: "Greeting".into(),
            summary: "Someone says hello.".into(),
            key_points: vec![SummaryKeyPoint {
                timestamp: 0.0,
                title: "Hello".into(),
                content: "The greeting".into(),
            }],
            tags: vec!["greeting".into()],
            generated_at: "2025-01-05T11:00:00Z".into(),
        }
    }

    fn item(id: &str, has_transcript: bool) -> FeedItem {
        FeedItem {
            id: id.into(),
            source: "Source".into(),
            source_id: "src".into(),
            source_avatar: None,
            platform: Platform::Youtube,
            domains: vec![],
            title: Some("Title".into()),
            content: None,
            url: "https://www.youtube.com/watch?v=abc".into(),
            thumbnail: None,
            images: None,
            duration: None,
            published: "2025-01-05T10:00:00Z".into(),
            has_transcript,
            transcript_preview: Some("hello...".into()),
            has_summary: None,
        }
    }

    #[tokio::test]
    async fn test_missing_resolves_unavailable() {
        assert_eq!(load_transcript(&FixedSource, "none").await, Availability::Unavailable);
        assert_eq!(load_summary(&FixedSource, "none").await, Availability::Unavailable);
    }

    #[tokio::test]
    async fn test_errors_resolve_unavailable() {
        assert_eq!(load_transcript(&FixedSource, "broken").await, Availability::Unavailable);
        assert_eq!(load_summary(&FixedSource, "broken").await, Availability::Unavailable);
    }

    #[tokio::test]
    async fn test_present_resolves_available() {
        assert_eq!(
            load_transcript(&FixedSource, "with").await,
            Availability::Available(transcript())
        );
        assert!(load_summary(&FixedSource, "with").await.is_available());
    }

    #[test]
    fn test_begin_skips_transcript_when_absent() {
        let mut state = DetailState::new();
        state.begin(&item("a", false));
        assert_eq!(state.transcript(), &LoadState::Unavailable);
        assert!(state.summary().is_loading());
    }

    #[test]
    fn test_completions_in_any_order() {
        let mut state = DetailState::new();
        let it = item("with", true);
        let ticket = state.begin(&it);
        assert!(state.is_loading());
        assert!(state.apply_summary(&ticket, Availability::Available(summary())));
        assert!(state.transcript().is_loading());
        assert!(state.apply_transcript(&ticket, Availability::Available(transcript())));
        assert!(!state.is_loading());
        assert!(matches!(state.transcript_view(&it), TranscriptFallback::Full(_)));
    }

    #[test]
    fn test_stale_results_are_ignored_after_navigation() {
        let mut state = DetailState::new();
        let first = state.begin(&item("a", true));
        let second = state.begin(&item("b", true));
        assert!(!state.apply_transcript(&first, Availability::Available(transcript())));
        assert!(!state.apply_summary(&first, Availability::Unavailable));
        assert!(state.transcript().is_loading());
        assert!(state.apply_summary(&second, Availability::Unavailable));
        assert_eq!(state.item_id(), Some("b"));
    }

    #[test]
    fn test_stale_results_are_ignored_after_close() {
        let mut state = DetailState::new();
        let ticket = state.begin(&item("a", true));
        state.close();
        assert!(!state.apply_summary(&ticket, Availability::Available(summary())));
        assert_eq!(state.summary(), &LoadState::Idle);
        assert_eq!(state.item_id(), None);
    }

    #[test]
    fn test_transcript_fallbacks() {
        let mut state = DetailState::new();
        let mut it = item("a", true);
        let ticket = state.begin(&it);
        assert_eq!(state.transcript_view(&it), TranscriptFallback::Loading);
        state.apply_transcript(&ticket, Availability::Unavailable);
        assert_eq!(state.transcript_view(&it), TranscriptFallback::Preview("hello..."));
        it.transcript_preview = None;
        assert_eq!(state.transcript_view(&it), TranscriptFallback::None);
    }

    #[test]
    fn test_availability_serializes_with_status() {
        let json = serde_json::to_value(Availability::<Summary>::Unavailable).unwrap();
        assert_eq!(json, serde_json::json!({"status": "unavailable"}));
        let json = serde_json::to_value(Availability::Available(summary())).unwrap();
        assert_eq!(json["status"], "available");
        assert_eq!(json["data"]["title"], "Greeting");
    }
}
