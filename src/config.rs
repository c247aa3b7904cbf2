//! TOML configuration.
//!
//! ```toml
//! [data]
//! dir = "./data"                 # feeds.json, transcripts/, summaries/
//! sources_file = "./scripts/sources.yaml"
//!
//! [db]
//! path = "./data/oasis.sqlite"
//!
//! [server]
//! bind = "127.0.0.1:7340"
//!
//! [feed]
//! new_window_hours = 24
//! ```
//!
//! Only `[data].dir` and `[db].path` are required.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    pub db: DbConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Location of the artifacts deposited by the external producers.
#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    pub dir: PathBuf,
    #[serde(default)]
    pub feeds_file: Option<PathBuf>,
    #[serde(default)]
    pub transcripts_dir: Option<PathBuf>,
    #[serde(default)]
    pub summaries_dir: Option<PathBuf>,
    #[serde(default)]
    pub sources_file: Option<PathBuf>,
}

impl DataConfig {
    pub fn feeds_path(&self) -> PathBuf {
        self.feeds_file
            .clone()
            .unwrap_or_else(|| self.dir.join("feeds.json"))
    }

    pub fn transcripts_path(&self) -> PathBuf {
        self.transcripts_dir
            .clone()
            .unwrap_or_else(|| self.dir.join("transcripts"))
    }

    pub fn summaries_path(&self) -> PathBuf {
        self.summaries_dir
            .clone()
            .unwrap_or_else(|| self.dir.join("summaries"))
    }

    pub fn sources_path(&self) -> PathBuf {
        self.sources_file
            .clone()
            .unwrap_or_else(|| self.dir.join("sources.yaml"))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    /// Items published within this many hours count as new.
    #[serde(default = "default_new_window_hours")]
    pub new_window_hours: i64,
    /// Default row limit for `oasis feed`. `None` prints everything.
    #[serde(default)]
    pub default_limit: Option<usize>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            new_window_hours: default_new_window_hours(),
            default_limit: None,
        }
    }
}

fn default_new_window_hours() -> i64 {
    24
}

impl Config {
    /// A config rooted at `root`, with everything else defaulted.
    pub fn minimal(root: &Path) -> Self {
        Self {
            data: DataConfig {
                dir: root.join("data"),
                feeds_file: None,
                transcripts_dir: None,
                summaries_dir: None,
                sources_file: None,
            },
            db: DbConfig {
                path: root.join("data").join("oasis.sqlite"),
            },
            server: ServerConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.feed.new_window_hours <= 0 {
        anyhow::bail!("feed.new_window_hours must be > 0");
    }

    if config.feed.default_limit == Some(0) {
        anyhow::bail!("feed.default_limit must be >= 1 when set");
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_src: &str) -> Result<Config> {
        let config: Config = toml::from_str(toml_src)?;
        validate(&config)?;
        Ok(config)
    }

    #[test]
    fn test_defaults() {
        let config = parse(
            r#"
[data]
dir = "/srv/oasis/data"

[db]
path = "/srv/oasis/oasis.sqlite"
"#,
        )
        .unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:7340");
        assert_eq!(config.feed.new_window_hours, 24);
        assert_eq!(
            config.data.feeds_path(),
            PathBuf::from("/srv/oasis/data/feeds.json")
        );
        assert_eq!(
            config.data.summaries_path(),
            PathBuf::from("/srv/oasis/data/summaries")
        );
        assert_eq!(
            config.data.sources_path(),
            PathBuf::from("/srv/oasis/data/sources.yaml")
        );
    }

    #[test]
    fn test_overrides() {
        let config = parse(
            r#"
[data]
dir = "/data"
transcripts_dir = "/mnt/transcripts"
sources_file = "/etc/oasis/sources.json"

[db]
path = "/data/oasis.sqlite"

[feed]
new_window_hours = 48
default_limit = 20
"#,
        )
        .unwrap();
        assert_eq!(config.data.transcripts_path(), PathBuf::from("/mnt/transcripts"));
        assert_eq!(config.data.sources_path(), PathBuf::from("/etc/oasis/sources.json"));
        assert_eq!(config.feed.default_limit, Some(20));
    }

    #[test]
    fn test_rejects_bad_window() {
        let err = parse(
            r#"
[data]
dir = "/data"

[db]
path = "/data/oasis.sqlite"

[feed]
new_window_hours = 0
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("new_window_hours"));
    }

    #[test]
    fn test_missing_data_section_fails() {
        assert!(parse("[db]\npath = \"x\"\n").is_err());
    }
}
