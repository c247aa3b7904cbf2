//! Followed-source summaries.

use serde::Serialize;

use crate::models::{Platform, Source};

/// Number of followed sources, overall and per platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    pub total: usize,
    pub youtube: usize,
    pub bilibili: usize,
    pub x: usize,
    pub podcast: usize,
}

impl SourceStats {
    pub fn from_sources(sources: &[Source]) -> Self {
        let mut stats = SourceStats {
            total: sources.len(),
            ..Default::default()
        };
        for source in sources {
            match source.platform {
                Platform::Youtube => stats.youtube += 1,
                Platform::Bilibili => stats.bilibili += 1,
                Platform::X => stats.x += 1,
                Platform::Podcast => stats.podcast += 1,
            }
        }
        stats
    }

    pub fn for_platform(&self, platform: Platform) -> usize {
        match platform {
            Platform::Youtube => self.youtube,
            Platform::Bilibili => self.bilibili,
            Platform::X => self.x,
            Platform::Podcast => self.podcast,
        }
    }
}

/// Sources on `platform`, or all of them when `None`. Order is kept.
pub fn filter_by_platform(sources: &[Source], platform: Option<Platform>) -> Vec<&Source> {
    sources
        .iter()
        .filter(|s| platform.map_or(true, |p| s.platform == p))
        .collect()
}
