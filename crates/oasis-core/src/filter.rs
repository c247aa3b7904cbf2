//! Multi-facet feed filtering.
//!
//! A [`FeedFilter`] combines three predicates, all of which must pass:
//!
//! | Facet | Passes when |
//! |-------|-------------|
//! | domains | the set is empty, or the item carries at least one selected domain |
//! | platforms | the set is empty, or the item's platform is selected |
//! | query | the query is empty, or it is a case-insensitive substring of the title, content, source name, or transcript preview |
//!
//! Filtering never caches: [`FeedFilter::apply`] is a pure function of the
//! filter and the list it is given, and keeps the list's order.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::models::{Domain, FeedItem, Platform};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedFilter {
    #[serde(default)]
    pub domains: BTreeSet<Domain>,
    #[serde(default)]
    pub platforms: BTreeSet<Platform>,
    #[serde(default)]
    pub query: String,
}

impl FeedFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domains.insert(domain);
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platforms.insert(platform);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Select the domain if unselected, otherwise deselect it.
    pub fn toggle_domain(&mut self, domain: Domain) {
        if !self.domains.remove(&domain) {
            self.domains.insert(domain);
        }
    }

    /// Select the platform if unselected, otherwise deselect it.
    pub fn toggle_platform(&mut self, platform: Platform) {
        if !self.platforms.remove(&platform) {
            self.platforms.insert(platform);
        }
    }

    pub fn clear_domains(&mut self) {
        self.domains.clear();
    }

    pub fn clear_platforms(&mut self) {
        self.platforms.clear();
    }

    /// True when no facet constrains the feed.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty() && self.platforms.is_empty() && self.query.is_empty()
    }

    pub fn matches(&self, item: &FeedItem) -> bool {
        self.matches_domain(item) && self.matches_platform(item) && self.matches_query(item)
    }

    fn matches_domain(&self, item: &FeedItem) -> bool {
        self.domains.is_empty() || item.domains.iter().any(|d| self.domains.contains(d))
    }

    fn matches_platform(&self, item: &FeedItem) -> bool {
        self.platforms.is_empty() || self.platforms.contains(&item.platform)
    }

    fn matches_query(&self, item: &FeedItem) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        [
            item.title.as_deref(),
            item.content.as_deref(),
            Some(item.source.as_str()),
            item.transcript_preview.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// The items that pass every facet, in their original order.
    pub fn apply<'a>(&self, items: &'a [FeedItem]) -> Vec<&'a FeedItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

/// Default window for the "new" badge.
pub const NEW_WINDOW_HOURS: i64 = 24;

/// Number of items published strictly after `now - window`.
///
/// Items whose publish time cannot be parsed are never counted as new.
pub fn count_new(items: &[FeedItem], now: DateTime<Utc>, window: Duration) -> usize {
    let cutoff = now - window;
    items
        .iter()
        .filter_map(|item| item.published_at())
        .filter(|published| *published > cutoff)
        .count()
}

/// Feed items whose id is in `saved_ids`, in feed order.
///
/// Saved ids that no longer exist in the feed are skipped.
pub fn saved_items<'a>(items: &'a [FeedItem], saved_ids: &[String]) -> Vec<&'a FeedItem> {
    items
        .iter()
        .filter(|item| saved_ids.iter().any(|id| id == &item.id))
        .collect()
}

/// Watched-status filter for the saved-items view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchFilter {
    #[default]
    All,
    Unwatched,
    Watched,
}

impl WatchFilter {
    pub fn matches(&self, item: &FeedItem, watched_ids: &[String]) -> bool {
        let watched = watched_ids.iter().any(|id| id == &item.id);
        match self {
            WatchFilter::All => true,
            WatchFilter::Unwatched => !watched,
            WatchFilter::Watched => watched,
        }
    }

    pub fn apply<'a>(&self, items: &[&'a FeedItem], watched_ids: &[String]) -> Vec<&'a FeedItem> {
        items
            .iter()
            .copied()
            .filter(|item| self.matches(item, watched_ids))
            .collect()
    }
}

impl FromStr for WatchFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(WatchFilter::All),
            "unwatched" => Ok(WatchFilter::Unwatched),
            "watched" | "completed" => Ok(WatchFilter::Watched),
            _ => Err(ParseError::WatchFilter(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, platform: Platform, domains: &[Domain], title: Option<&str>) -> FeedItem {
        FeedItem {
            id: id.to_string(),
            source: format!("Source {}", id),
            source_id: format!("src_{}", id),
            source_avatar: None,
            platform,
            domains: domains.to_vec(),
            title: title.map(str::to_string),
            content: None,
            url: format!("https://example.com/{}", id),
            thumbnail: None,
            images: None,
            duration: None,
            published: "2025-01-05T10:00:00Z".to_string(),
            has_transcript: false,
            transcript_preview: None,
            has_summary: None,
        }
    }

    fn sample() -> Vec<FeedItem> {
        let mut tweet = item("t1", Platform::X, &[Domain::Ai, Domain::Design], None);
        tweet.content = Some("Shipping a new Cursor feature".into());
        let mut pod = item("p1", Platform::Podcast, &[Domain::Business], Some("Episode 12"));
        pod.transcript_preview = Some("today we talk about GPU supply chains".into());
        vec![
            item("y1", Platform::Youtube, &[Domain::Ai, Domain::Dev], Some("Intro to LLMs")),
            tweet,
            item("b1", Platform::Bilibili, &[Domain::Creator], Some("Camera review")),
            pod,
        ]
    }

    fn ids(items: &[&FeedItem]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let items = sample();
        let filter = FeedFilter::new();
        assert!(filter.is_empty());
        assert_eq!(ids(&filter.apply(&items)), vec!["y1", "t1", "b1", "p1"]);
    }

    #[test]
    fn test_domain_filter_intersects() {
        let items = sample();
        let filter = FeedFilter::new().with_domain(Domain::Ai).with_domain(Domain::Creator);
        assert_eq!(ids(&filter.apply(&items)), vec!["y1", "t1", "b1"]);
    }

    #[test]
    fn test_platform_filter() {
        let items = sample();
        let filter = FeedFilter::new()
            .with_platform(Platform::Podcast)
            .with_platform(Platform::X);
        assert_eq!(ids(&filter.apply(&items)), vec!["t1", "p1"]);
    }

    #[test]
    fn test_query_matches_each_field_case_insensitively() {
        let items = sample();
        let by_title = FeedFilter::new().with_query("llms");
        assert_eq!(ids(&by_title.apply(&items)), vec!["y1"]);
        let by_content = FeedFilter::new().with_query("CURSOR");
        assert_eq!(ids(&by_content.apply(&items)), vec!["t1"]);
        let by_source = FeedFilter::new().with_query("source b1");
        assert_eq!(ids(&by_source.apply(&items)), vec!["b1"]);
        let by_preview = FeedFilter::new().with_query("gpu supply");
        assert_eq!(ids(&by_preview.apply(&items)), vec!["p1"]);
    }

    #[test]
    fn test_facets_and_together() {
        let items = sample();
        let filter = FeedFilter::new()
            .with_domain(Domain::Ai)
            .with_platform(Platform::X)
            .with_query("intro");
        assert!(filter.apply(&items).is_empty());
        let filter = FeedFilter::new()
            .with_domain(Domain::Ai)
            .with_platform(Platform::Youtube)
            .with_query("intro");
        assert_eq!(ids(&filter.apply(&items)), vec!["y1"]);
    }

    #[test]
    fn test_non_ascii_query() {
        let mut items = sample();
        items[2].title = Some("硅谷101 访谈".into());
        let filter = FeedFilter::new().with_query("硅谷");
        assert_eq!(ids(&filter.apply(&items)), vec!["b1"]);
    }

    #[test]
    fn test_toggle_facets() {
        let mut filter = FeedFilter::new();
        filter.toggle_domain(Domain::Tech);
        filter.toggle_platform(Platform::X);
        assert!(filter.domains.contains(&Domain::Tech));
        assert!(filter.platforms.contains(&Platform::X));
        filter.toggle_domain(Domain::Tech);
        assert!(filter.domains.is_empty());
        filter.clear_platforms();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_count_new() {
        let mut items = sample();
        items[0].published = "2025-01-10T09:00:00Z".into();
        items[1].published = "2025-01-09T13:00:00+02:00".into();
        items[2].published = "garbage".into();
        let now = DateTime::parse_from_rfc3339("2025-01-10T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(count_new(&items, now, Duration::hours(NEW_WINDOW_HOURS)), 1);
        assert_eq!(count_new(&items, now, Duration::hours(48)), 2);
    }

    #[test]
    fn test_count_new_accepts_naive_timestamps() {
        let mut items = sample();
        items[0].published = "2025-01-10T11:00:00.123456".into();
        items[1].published = "2025-01-01T11:00:00".into();
        items[2].published = "garbage".into();
        let now = DateTime::parse_from_rfc3339("2025-01-10T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(count_new(&items, now, Duration::hours(NEW_WINDOW_HOURS)), 1);
    }

    #[test]
    fn test_saved_items_keep_feed_order() {
        let items = sample();
        let saved = vec!["p1".to_string(), "missing".to_string(), "y1".to_string()];
        assert_eq!(ids(&saved_items(&items, &saved)), vec!["y1", "p1"]);
    }

    #[test]
    fn test_watch_filter() {
        let items = sample();
        let all: Vec<&FeedItem> = items.iter().collect();
        let watched = vec!["t1".to_string()];
        assert_eq!(WatchFilter::All.apply(&all, &watched).len(), 4);
        assert_eq!(ids(&WatchFilter::Watched.apply(&all, &watched)), vec!["t1"]);
        assert_eq!(
            ids(&WatchFilter::Unwatched.apply(&all, &watched)),
            vec!["y1", "b1", "p1"]
        );
        assert_eq!("completed".parse::<WatchFilter>().unwrap(), WatchFilter::Watched);
        assert!("later".parse::<WatchFilter>().is_err());
    }
}
