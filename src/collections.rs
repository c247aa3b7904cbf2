//! Saved and watched collections: the saved-items view and the
//! add/remove/toggle commands.

use anyhow::Result;
use serde::Serialize;

use oasis_core::collection::{Collection, CollectionKind, KvStore};
use oasis_core::error::ItemError;
use oasis_core::filter::{saved_items, WatchFilter};
use oasis_core::models::FeedItem;

use crate::config::Config;
use crate::data::DataRepository;
use crate::sqlite_store::SqliteKv;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Add,
    Remove,
    Toggle,
}

/// Result of a membership change.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeOutcome {
    pub kind: CollectionKind,
    pub id: String,
    /// Membership after the change.
    pub member: bool,
    /// Whether the stored set was modified.
    pub changed: bool,
}

/// Apply one membership change. Blank ids are rejected with
/// [`ItemError::EmptyId`].
pub async fn apply_change(
    kv: &dyn KvStore,
    kind: CollectionKind,
    change: Change,
    id: &str,
) -> Result<ChangeOutcome> {
    if id.trim().is_empty() {
        return Err(ItemError::EmptyId.into());
    }
    let collection = Collection::new(kv, kind);
    let (member, changed) = match change {
        Change::Add => (true, collection.add(id).await?),
        Change::Remove => (false, collection.remove(id).await?),
        Change::Toggle => (collection.toggle(id).await?, true),
    };
    Ok(ChangeOutcome {
        kind,
        id: id.to_string(),
        member,
        changed,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedEntry {
    #[serde(flatten)]
    pub item: FeedItem,
    pub watched: bool,
}

/// The saved-items page: saved feed items with their watched status.
#[derive(Debug, Clone, Serialize)]
pub struct SavedView {
    pub filter: WatchFilter,
    /// Saved items still in the feed.
    pub saved_count: usize,
    pub unwatched_count: usize,
    pub items: Vec<SavedEntry>,
    /// Saved ids that no longer appear in the feed index.
    pub missing: Vec<String>,
}

pub async fn saved_view(
    repo: &DataRepository,
    kv: &dyn KvStore,
    filter: WatchFilter,
) -> Result<SavedView> {
    let feeds = repo.load_feeds().await?;
    let saved_ids = Collection::saved(kv).list_all().await?;
    let watched_ids = Collection::watched(kv).list_all().await?;

    let saved = saved_items(&feeds.items, &saved_ids);
    let unwatched_count = WatchFilter::Unwatched.apply(&saved, &watched_ids).len();
    let items = filter
        .apply(&saved, &watched_ids)
        .into_iter()
        .map(|item| SavedEntry {
            watched: watched_ids.contains(&item.id),
            item: item.clone(),
        })
        .collect();
    let missing = saved_ids
        .iter()
        .filter(|id| feeds.find(id).is_none())
        .cloned()
        .collect();

    Ok(SavedView {
        filter,
        saved_count: saved.len(),
        unwatched_count,
        items,
        missing,
    })
}

pub async fn run_saved_list(config: &Config, filter: WatchFilter) -> Result<()> {
    let repo = DataRepository::new(&config.data);
    let kv = SqliteKv::open(config).await?;
    let view = saved_view(&repo, &kv, filter).await;
    kv.close().await;
    let view = view?;

    println!(
        "{} saved, {} unwatched",
        view.saved_count, view.unwatched_count
    );
    println!();

    if view.items.is_empty() {
        println!("Nothing saved.");
    }
    for entry in &view.items {
        let mark = if entry.watched { "x" } else { " " };
        println!(
            "[{}] {:<10} {} / {}",
            mark,
            entry.item.platform.label(),
            entry.item.source,
            entry.item.display_title().replace('\n', " ").trim()
        );
        println!("    id: {}", entry.item.id);
    }

    if !view.missing.is_empty() {
        println!();
        println!("Not in the current feed: {}", view.missing.join(", "));
    }
    Ok(())
}

pub async fn run_list_ids(config: &Config, kind: CollectionKind) -> Result<()> {
    let kv = SqliteKv::open(config).await?;
    let ids = Collection::new(&kv, kind).list_all().await;
    kv.close().await;
    let ids = ids?;

    if ids.is_empty() {
        println!("No {} items.", kind);
    }
    for id in ids {
        println!("{}", id);
    }
    Ok(())
}

pub async fn run_change(config: &Config, kind: CollectionKind, change: Change, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(ItemError::EmptyId.into());
    }
    let repo = DataRepository::new(&config.data);
    if let Ok(feeds) = repo.load_feeds().await {
        if feeds.find(id).is_none() {
            eprintln!("Warning: {} is not in the current feed", id);
        }
    }

    let kv = SqliteKv::open(config).await?;
    let outcome = apply_change(&kv, kind, change, id).await;
    kv.close().await;
    let outcome = outcome?;

    let verb = match (outcome.member, outcome.changed) {
        (true, true) => "added to",
        (true, false) => "already in",
        (false, true) => "removed from",
        (false, false) => "not in",
    };
    println!("{} {} {}", outcome.id, verb, outcome.kind);
    Ok(())
}
