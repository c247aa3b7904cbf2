//! Filtered feed listing.
//!
//! Shared by `oasis feed` and `GET /feed`. The feed index is re-read and
//! the filter re-applied on every call, so results always reflect the
//! current `feeds.json`.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use oasis_core::collection::{Collection, KvStore};
use oasis_core::filter::{count_new, FeedFilter};
use oasis_core::format::{format_duration, item_age};
use oasis_core::models::{Domain, FeedItem, Platform};

use crate::config::Config;
use crate::data::DataRepository;
use crate::sqlite_store::SqliteKv;

/// One row of the feed with the user's flags attached.
#[derive(Debug, Clone, Serialize)]
pub struct FeedEntry {
    #[serde(flatten)]
    pub item: FeedItem,
    pub saved: bool,
    pub watched: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedPage {
    pub last_updated: String,
    /// Items in the index before filtering.
    pub total: usize,
    /// Items in the index published within the "new" window.
    pub new_count: usize,
    /// Items matching the filter (before `limit`).
    pub count: usize,
    pub items: Vec<FeedEntry>,
}

/// Build a filter from user-supplied facet names.
///
/// Each value may itself be a comma-separated list. Unknown names are an
/// error rather than silently matching nothing. The query is used as
/// given, surrounding whitespace included.
pub fn build_filter(
    domains: &[String],
    platforms: &[String],
    query: Option<&str>,
) -> Result<FeedFilter> {
    let mut filter = FeedFilter::new();
    for name in split_values(domains) {
        filter = filter.with_domain(name.parse::<Domain>()?);
    }
    for name in split_values(platforms) {
        filter = filter.with_platform(name.parse::<Platform>()?);
    }
    if let Some(q) = query {
        filter = filter.with_query(q);
    }
    Ok(filter)
}

fn split_values(values: &[String]) -> impl Iterator<Item = &str> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub async fn query_feed(
    repo: &DataRepository,
    kv: &dyn KvStore,
    filter: &FeedFilter,
    now: DateTime<Utc>,
    new_window: Duration,
    limit: Option<usize>,
) -> Result<FeedPage> {
    let feeds = repo.load_feeds().await?;
    let saved = Collection::saved(kv).list_all().await?;
    let watched = Collection::watched(kv).list_all().await?;

    let matched = filter.apply(&feeds.items);
    let count = matched.len();
    let items = matched
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|item| FeedEntry {
            saved: saved.contains(&item.id),
            watched: watched.contains(&item.id),
            item: item.clone(),
        })
        .collect();

    Ok(FeedPage {
        last_updated: feeds.last_updated.clone(),
        total: feeds.items.len(),
        new_count: count_new(&feeds.items, now, new_window),
        count,
        items,
    })
}

pub async fn run_feed(
    config: &Config,
    domains: &[String],
    platforms: &[String],
    query: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let filter = build_filter(domains, platforms, query)?;
    let repo = DataRepository::new(&config.data);
    let kv = SqliteKv::open(config).await?;
    let now = Utc::now();
    let page = query_feed(
        &repo,
        &kv,
        &filter,
        now,
        Duration::hours(config.feed.new_window_hours),
        limit.or(config.feed.default_limit),
    )
    .await;
    kv.close().await;
    let page = page?;

    println!(
        "{} items ({} new), updated {}",
        page.total, page.new_count, page.last_updated
    );
    if !filter.is_empty() {
        println!("{} match the filter", page.count);
    }
    println!();

    if page.items.is_empty() {
        println!("No items.");
        return Ok(());
    }

    for (i, entry) in page.items.iter().enumerate() {
        let item = &entry.item;
        let mut flags = Vec::new();
        if entry.saved {
            flags.push("saved");
        }
        if entry.watched {
            flags.push("watched");
        }
        if item.has_transcript {
            flags.push("transcript");
        }

        println!(
            "{}. [{}] {} / {}",
            i + 1,
            item.platform.label(),
            item.source,
            item.display_title().replace('\n', " ").trim()
        );
        let duration = format_duration(item.duration);
        if duration.is_empty() {
            println!("    published: {}", item_age(item, now));
        } else {
            println!("    published: {}  duration: {}", item_age(item, now), duration);
        }
        if !item.domains.is_empty() {
            let tags: Vec<&str> = item.domains.iter().map(|d| d.as_str()).collect();
            println!("    domains: {}", tags.join(", "));
        }
        if !flags.is_empty() {
            println!("    flags: {}", flags.join(", "));
        }
        println!("    url: {}", item.url);
        println!("    id: {}", item.id);
        println!();
    }

    Ok(())
}
