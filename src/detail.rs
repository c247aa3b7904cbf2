//! Item detail: one feed item with its saved/watched flags and its
//! lazily loaded transcript and summary.
//!
//! Used by both the `oasis show` CLI command and `GET /items/{id}`.
//! The transcript and summary loads run as independent tasks and are
//! applied to a [`DetailState`] in whatever order they finish.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinSet;

use oasis_core::collection::{Collection, KvStore};
use oasis_core::enrichment::{
    load_summary, load_transcript, transcript_fallback, Availability, DetailState,
    EnrichmentSource, LoadState, TranscriptFallback,
};
use oasis_core::error::ItemError;
use oasis_core::format::{format_duration, format_timestamp, item_age, video_url_with_timestamp};
use oasis_core::models::{FeedItem, Summary, Transcript};

use crate::config::Config;
use crate::data::DataRepository;
use crate::sqlite_store::SqliteKv;

#[derive(Debug, Clone, Serialize)]
pub struct ItemDetail {
    pub item: FeedItem,
    pub saved: bool,
    pub watched: bool,
    pub transcript: LoadState<Transcript>,
    pub summary: LoadState<Summary>,
}

enum Completion {
    Transcript(Availability<Transcript>),
    Summary(Availability<Summary>),
}

/// Start both enrichment loads for `item` and apply them to `state` as
/// they finish.
///
/// Results that arrive after `state` has moved to another item are
/// dropped by the state's guard. A load task that panics leaves its
/// resource unavailable.
pub async fn load_enrichment(
    source: Arc<dyn EnrichmentSource>,
    state: &mut DetailState,
    item: &FeedItem,
) {
    let ticket = state.begin(item);
    let mut tasks = JoinSet::new();

    if item.has_transcript {
        let source = source.clone();
        let id = item.id.clone();
        tasks.spawn(async move { Completion::Transcript(load_transcript(source.as_ref(), &id).await) });
    }
    {
        let source = source.clone();
        let id = item.id.clone();
        tasks.spawn(async move { Completion::Summary(load_summary(source.as_ref(), &id).await) });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Completion::Transcript(result)) => {
                state.apply_transcript(&ticket, result);
            }
            Ok(Completion::Summary(result)) => {
                state.apply_summary(&ticket, result);
            }
            Err(e) => {
                tracing::warn!(id = %item.id, error = %e, "enrichment task failed");
            }
        }
    }

    if state.transcript().is_loading() {
        state.apply_transcript(&ticket, Availability::Unavailable);
    }
    if state.summary().is_loading() {
        state.apply_summary(&ticket, Availability::Unavailable);
    }
}

/// Core detail lookup returning structured data (used by CLI and server).
///
/// An id missing from the feed is [`ItemError::NotFound`].
pub async fn get_item_detail(
    repo: &DataRepository,
    kv: &dyn KvStore,
    id: &str,
) -> Result<ItemDetail> {
    let feeds = repo.load_feeds().await?;
    let item = match feeds.find(id) {
        Some(item) => item.clone(),
        None => return Err(ItemError::NotFound(id.to_string()).into()),
    };

    let saved = Collection::saved(kv).contains(id).await?;
    let watched = Collection::watched(kv).contains(id).await?;

    let mut state = DetailState::new();
    let source: Arc<dyn EnrichmentSource> = Arc::new(repo.clone());
    load_enrichment(source, &mut state, &item).await;

    Ok(ItemDetail {
        saved,
        watched,
        transcript: state.transcript().clone(),
        summary: state.summary().clone(),
        item,
    })
}

/// CLI entry point: loads the detail and prints it to stdout.
pub async fn run_show(config: &Config, id: &str) -> Result<()> {
    let repo = DataRepository::new(&config.data);
    let kv = SqliteKv::open(config).await?;
    let detail = get_item_detail(&repo, &kv, id).await;
    kv.close().await;
    let detail = detail?;
    let item = &detail.item;
    let now = Utc::now();

    println!("--- Item ---");
    println!("id:        {}", item.id);
    println!("title:     {}", item.display_title());
    println!("platform:  {}", item.platform.label());
    println!("source:    {}", item.source);
    if !item.domains.is_empty() {
        let labels: Vec<&str> = item.domains.iter().map(|d| d.label()).collect();
        println!("domains:   {}", labels.join(", "));
    }
    println!("published: {} ({})", item.published, item_age(item, now));
    let duration = format_duration(item.duration);
    if !duration.is_empty() {
        println!("duration:  {}", duration);
    }
    println!("url:       {}", item.url);
    println!(
        "status:    {}{}",
        if detail.saved { "saved" } else { "not saved" },
        if detail.watched { ", watched" } else { "" }
    );
    println!();

    match &detail.summary {
        LoadState::Ready(summary) => {
            println!("--- Summary ---");
            println!("{}", summary.summary);
            if !summary.tags.is_empty() {
                println!("tags: {}", summary.tags.join(", "));
            }
            for point in &summary.key_points {
                println!(
                    "  [{}] {} - {}",
                    format_timestamp(point.timestamp),
                    point.title,
                    point.content
                );
                println!("         {}", video_url_with_timestamp(item, point.timestamp));
            }
            println!();
        }
        _ => println!("(no summary available)\n"),
    }

    match transcript_fallback(&detail.transcript, item) {
        TranscriptFallback::Full(transcript) => {
            println!(
                "--- Transcript ({}, {} segments) ---",
                transcript.language,
                transcript.segments.len()
            );
            for segment in &transcript.segments {
                println!("[{}] {}", format_timestamp(segment.start), segment.text);
            }
        }
        TranscriptFallback::Preview(preview) => {
            println!("--- Transcript preview ---");
            println!("{}", preview);
        }
        TranscriptFallback::Loading | TranscriptFallback::None => {
            println!("(no transcript available)");
        }
    }

    Ok(())
}
