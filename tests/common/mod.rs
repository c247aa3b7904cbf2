//! Fixture data directory shared by the CLI and server tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write `config/oasis.toml` and a populated `data/` under a fresh temp dir.
///
/// Feed contents, newest first:
///
/// | id | platform | domains | enrichment |
/// |----|----------|---------|------------|
/// | `yt_new` | youtube | AI, Dev | transcript + summary files |
/// | `x_1` | x | Business | none |
/// | `bili_1` | bilibili | AI | flagged, preview only |
/// | `pod_1` | podcast | Growth | none |
pub fn setup_test_env(port: u16) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let data_dir = root.join("data");
    fs::create_dir_all(data_dir.join("transcripts")).unwrap();
    fs::create_dir_all(data_dir.join("summaries")).unwrap();

    write_feeds(&data_dir);
    write_enrichment(&data_dir);
    fs::write(
        data_dir.join("sources.yaml"),
        r#"sources:
  - id: openai
    name: OpenAI
    platform: youtube
    channel_id: UCXZCJLdBC09xxGZ6gcdrc6A
    domains: [AI, Dev]
  - id: benlang
    name: Ben Lang
    platform: x
    username: benln
    domains: [Business]
  - id: lenny
    name: Lenny's Podcast
    platform: podcast
    feed_url: https://example.com/lenny.rss
    domains: [Growth]
"#,
    )
    .unwrap();

    let config_content = format!(
        r#"[data]
dir = "{root}/data"

[db]
path = "{root}/data/oasis.sqlite"

[server]
bind = "127.0.0.1:{port}"
"#,
        root = root.display(),
        port = port
    );

    let config_path = config_dir.join("oasis.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn write_feeds(data_dir: &Path) {
    let now = chrono::Utc::now().to_rfc3339();
    let feeds = serde_json::json!({
        "last_updated": "2025-01-06T08:00:00Z",
        "count": 4,
        "items": [
            {
                "id": "yt_new",
                "source": "OpenAI",
                "sourceId": "openai",
                "platform": "youtube",
                "domains": ["AI", "Dev"],
                "title": "Building agents with GPT",
                "url": "https://www.youtube.com/watch?v=abc123",
                "thumbnail": "https://i.ytimg.com/vi/abc123/hqdefault.jpg",
                "duration": 3725,
                "published": now,
                "hasTranscript": true,
                "transcriptPreview": "Welcome to the agents workshop",
                "hasSummary": true
            },
            {
                "id": "x_1",
                "source": "Ben Lang",
                "sourceId": "benlang",
                "platform": "x",
                "domains": ["Business"],
                "title": null,
                "content": "Shipping is a habit, not an event",
                "url": "https://x.com/benln/status/1",
                "published": "2025-01-04T12:00:00Z",
                "hasTranscript": false
            },
            {
                "id": "bili_1",
                "source": "Tech Notes",
                "sourceId": "technotes",
                "platform": "bilibili",
                "domains": ["AI"],
                "title": "Large models from scratch",
                "url": "https://www.bilibili.com/video/BV1xx",
                "duration": 754,
                "published": "2025-01-03T09:30:00Z",
                "hasTranscript": true,
                "transcriptPreview": "Today we train a tiny transformer"
            },
            {
                "id": "pod_1",
                "source": "Lenny's Podcast",
                "sourceId": "lenny",
                "platform": "podcast",
                "domains": ["Growth"],
                "title": "Growth loops that compound",
                "url": "https://example.com/episodes/1",
                "published": "2025-01-02T05:00:00Z",
                "hasTranscript": false
            }
        ]
    });
    fs::write(
        data_dir.join("feeds.json"),
        serde_json::to_string_pretty(&feeds).unwrap(),
    )
    .unwrap();
}

fn write_enrichment(data_dir: &Path) {
    let transcript = serde_json::json!({
        "source": "youtube",
        "language": "en",
        "full_text": "Welcome to the agents workshop. Today we wire tools together.",
        "segments": [
            { "start": 0.0, "end": 4.2, "text": "Welcome to the agents workshop." },
            { "start": 65.5, "end": 70.0, "text": "Today we wire tools together." }
        ],
        "word_count": 10,
        "fetched_at": "2025-01-06T08:05:00Z"
    });
    fs::write(
        data_dir.join("transcripts/yt_new.json"),
        transcript.to_string(),
    )
    .unwrap();

    let summary = serde_json::json!({
        "video_id": "yt_new",
        "title": "Building agents with GPT",
        "summary": "A walkthrough of tool-using agents.",
        "key_points": [
            { "timestamp": 65.0, "title": "Tools", "content": "Agents call functions." }
        ],
        "tags": ["agents", "llm"],
        "generated_at": "2025-01-06T08:10:00Z"
    });
    fs::write(data_dir.join("summaries/yt_new.json"), summary.to_string()).unwrap();
}
