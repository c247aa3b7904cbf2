//! Feed and collection overview.
//!
//! A quick summary of what the producers have deposited and where the
//! user stands: item counts per platform, the "new" count, transcript and
//! summary coverage, and saved/watched totals. Used by `oasis stats`.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use oasis_core::collection::{Collection, KvStore};
use oasis_core::filter::{count_new, saved_items, WatchFilter};
use oasis_core::models::Platform;

use crate::config::Config;
use crate::data::DataRepository;
use crate::sqlite_store::SqliteKv;

#[derive(Debug, Clone, Serialize)]
pub struct FeedStats {
    pub last_updated: String,
    pub total: usize,
    pub new_count: usize,
    pub by_platform: BTreeMap<Platform, usize>,
    pub with_transcript: usize,
    pub with_summary: usize,
    pub saved: usize,
    pub saved_unwatched: usize,
    pub watched: usize,
}

pub async fn feed_stats(
    repo: &DataRepository,
    kv: &dyn KvStore,
    now: DateTime<Utc>,
    new_window: Duration,
) -> Result<FeedStats> {
    let feeds = repo.load_feeds().await?;
    let saved_ids = Collection::saved(kv).list_all().await?;
    let watched_ids = Collection::watched(kv).list_all().await?;

    let mut by_platform = BTreeMap::new();
    for item in &feeds.items {
        *by_platform.entry(item.platform).or_insert(0) += 1;
    }

    let saved = saved_items(&feeds.items, &saved_ids);

    Ok(FeedStats {
        last_updated: feeds.last_updated.clone(),
        total: feeds.items.len(),
        new_count: count_new(&feeds.items, now, new_window),
        by_platform,
        with_transcript: feeds.items.iter().filter(|i| i.has_transcript).count(),
        with_summary: feeds
            .items
            .iter()
            .filter(|i| i.has_summary.unwrap_or(false))
            .count(),
        saved: saved_ids.len(),
        saved_unwatched: WatchFilter::Unwatched.apply(&saved, &watched_ids).len(),
        watched: watched_ids.len(),
    })
}

pub async fn run_stats(config: &Config) -> Result<()> {
    let repo = DataRepository::new(&config.data);
    let kv = SqliteKv::open(config).await?;
    let stats = feed_stats(
        &repo,
        &kv,
        Utc::now(),
        Duration::hours(config.feed.new_window_hours),
    )
    .await;
    kv.close().await;
    let stats = stats?;

    println!("Oasis - Feed Stats");
    println!("==================");
    println!();
    println!("  Feed:        {}", config.data.feeds_path().display());
    println!("  Updated:     {}", stats.last_updated);
    println!();
    println!("  Items:       {}", stats.total);
    println!(
        "  New:         {} (last {}h)",
        stats.new_count, config.feed.new_window_hours
    );
    println!(
        "  Transcripts: {} / {} ({}%)",
        stats.with_transcript,
        stats.total,
        percent(stats.with_transcript, stats.total)
    );
    println!(
        "  Summaries:   {} / {} ({}%)",
        stats.with_summary,
        stats.total,
        percent(stats.with_summary, stats.total)
    );
    println!();
    println!("  By platform:");
    for p in Platform::ALL {
        println!(
            "    {:<10} {:>6}",
            p.label(),
            stats.by_platform.get(&p).copied().unwrap_or(0)
        );
    }
    println!();
    println!("  Saved:       {} ({} unwatched)", stats.saved, stats.saved_unwatched);
    println!("  Watched:     {}", stats.watched);
    println!();

    Ok(())
}

fn percent(part: usize, whole: usize) -> usize {
    if whole > 0 {
        part * 100 / whole
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(4, 4), 100);
    }
}
