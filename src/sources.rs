//! Followed sources listing (`oasis sources`).

use anyhow::Result;
use serde::Serialize;

use oasis_core::models::{Platform, Source};
use oasis_core::sources::{filter_by_platform, SourceStats};

use crate::config::Config;
use crate::data::DataRepository;

#[derive(Debug, Clone, Serialize)]
pub struct SourcesView {
    pub stats: SourceStats,
    pub sources: Vec<Source>,
}

/// Core listing returning structured data (used by CLI and server).
///
/// Stats always cover every source; `platform` only narrows the list.
pub async fn get_sources(repo: &DataRepository, platform: Option<Platform>) -> Result<SourcesView> {
    let config = repo.load_sources().await?;
    let stats = SourceStats::from_sources(&config.sources);
    let sources = filter_by_platform(&config.sources, platform)
        .into_iter()
        .cloned()
        .collect();
    Ok(SourcesView { stats, sources })
}

pub async fn list_sources(config: &Config, platform: Option<Platform>) -> Result<()> {
    let repo = DataRepository::new(&config.data);
    let view = get_sources(&repo, platform).await?;

    println!("{} sources", view.stats.total);
    for p in Platform::ALL {
        println!("  {:<10} {}", p.label(), view.stats.for_platform(p));
    }
    println!();

    if view.sources.is_empty() {
        println!("No sources.");
        return Ok(());
    }

    println!("{:<18} {:<10} {:<24} DOMAINS", "ID", "PLATFORM", "NAME");
    for source in &view.sources {
        let domains: Vec<&str> = source.domains.iter().map(|d| d.as_str()).collect();
        println!(
            "{:<18} {:<10} {:<24} {}",
            source.id,
            source.platform.as_str(),
            source.name,
            domains.join(", ")
        );
    }

    Ok(())
}
