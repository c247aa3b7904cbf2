//! Display formatting for durations, timestamps, and deep links.

use chrono::{DateTime, Utc};

use crate::models::{FeedItem, Platform};

/// `H:MM:SS` for an hour or more, else `M:SS`. Empty for missing or zero.
pub fn format_duration(seconds: Option<f64>) -> String {
    let total = match seconds {
        Some(s) if s > 0.0 => s.floor() as u64,
        _ => return String::new(),
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// `M:SS` offset into the media. Minutes are not wrapped into hours.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Short relative age: `42m ago`, `5h ago`, `3d ago`, then `Jan 5`.
///
/// Timestamps in the future are treated as just published.
pub fn format_relative_time(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - published).num_seconds().max(0);
    let minutes = diff / 60;
    let hours = diff / 3600;
    let days = diff / 86_400;

    if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        published.format("%b %-d").to_string()
    }
}

/// Relative age of an item, or the raw `published` string when it does not
/// parse.
pub fn item_age(item: &FeedItem, now: DateTime<Utc>) -> String {
    match item.published_at() {
        Some(published) => format_relative_time(published, now),
        None => item.published.clone(),
    }
}

/// Link to the original that starts playback at `seconds`.
///
/// YouTube watch URLs already carry a query string, Bilibili URLs do not.
/// Other platforms have no seek parameter and get the plain URL.
pub fn video_url_with_timestamp(item: &FeedItem, seconds: f64) -> String {
    let secs = seconds.max(0.0).floor() as u64;
    match item.platform {
        Platform::Youtube => format!("{}&t={}s", item.url, secs),
        Platform::Bilibili => format!("{}?t={}", item.url, secs),
        Platform::X | Platform::Podcast => item.url.clone(),
    }
}
