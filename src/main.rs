//! # Oasis CLI (`oasis`)
//!
//! Browse the aggregated feed, open items with their transcript and
//! summary, manage the saved and watched sets, and run the HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! oasis --config ./config/oasis.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `oasis init` | Create the SQLite database |
//! | `oasis feed` | Filtered feed (`--domain`, `--platform`, `--query`, `--limit`) |
//! | `oasis show <id>` | Item detail with transcript and summary |
//! | `oasis saved list\|add\|remove\|toggle` | Saved items |
//! | `oasis watched list\|add\|remove\|toggle` | Watched items |
//! | `oasis sources` | Followed sources and per-platform counts |
//! | `oasis stats` | Feed and collection statistics |
//! | `oasis serve` | Start the JSON HTTP API |
//! | `oasis completions <shell>` | Print a shell completion script |
//!
//! ## Logging
//!
//! Diagnostics go to stderr. `OASIS_LOG` takes an `EnvFilter` directive
//! (default `oasis=info,warn`); `OASIS_LOG_FORMAT=json` switches to JSON
//! lines.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use oasis::collections::{self, Change};
use oasis::config;
use oasis::{db, detail, feed, server, sources, stats};
use oasis_core::collection::CollectionKind;
use oasis_core::filter::WatchFilter;
use oasis_core::models::Platform;

/// Oasis: a personal content aggregation dashboard.
///
/// All commands except `completions` read a TOML configuration file given
/// by `--config`. See `config/oasis.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "oasis",
    about = "Oasis: filter the aggregated feed, keep saved and watched lists, read transcripts and summaries",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/oasis.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent; running it again leaves existing collections intact.
    Init,

    /// List the feed in feed order.
    ///
    /// Domain and platform flags may be repeated or comma-separated. An item
    /// matches when it carries any selected domain, comes from any selected
    /// platform, and contains the query text.
    Feed {
        /// Domain tag (AI, Business, Global, Creator, Dev, Design, Tech, Growth).
        #[arg(long = "domain")]
        domains: Vec<String>,

        /// Platform (youtube, bilibili, x, podcast).
        #[arg(long = "platform")]
        platforms: Vec<String>,

        /// Case-insensitive text matched against title, content, source name,
        /// and transcript preview.
        #[arg(long, short)]
        query: Option<String>,

        /// Maximum number of items to print.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one item with its summary and transcript.
    Show {
        /// Feed item id.
        id: String,
    },

    /// Manage saved items.
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },

    /// Manage watched items.
    Watched {
        #[command(subcommand)]
        action: WatchedAction,
    },

    /// List followed sources.
    Sources {
        /// Only list sources on this platform.
        #[arg(long)]
        platform: Option<String>,
    },

    /// Print feed and collection statistics.
    Stats,

    /// Start the JSON HTTP API.
    ///
    /// Binds to the address configured in `[server].bind`.
    Serve,

    /// Generate a shell completion script.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum SavedAction {
    /// List saved items that are still in the feed.
    List {
        /// all, unwatched, or watched.
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Save an item.
    Add { id: String },
    /// Unsave an item.
    Remove { id: String },
    /// Flip an item's saved state.
    Toggle { id: String },
}

#[derive(Subcommand)]
enum WatchedAction {
    /// List watched ids.
    List,
    /// Mark an item watched.
    Add { id: String },
    /// Mark an item unwatched.
    Remove { id: String },
    /// Flip an item's watched state.
    Toggle { id: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("OASIS_LOG")
        .unwrap_or_else(|_| EnvFilter::new("oasis=info,warn"));

    let format = env::var("OASIS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Completions { shell } = &cli.command {
        let mut command = Cli::command();
        generate(*shell, &mut command, "oasis", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            db::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Feed {
            domains,
            platforms,
            query,
            limit,
        } => {
            feed::run_feed(&cfg, &domains, &platforms, query.as_deref(), limit).await?;
        }
        Commands::Show { id } => {
            detail::run_show(&cfg, &id).await?;
        }
        Commands::Saved { action } => match action {
            SavedAction::List { filter } => {
                let filter: WatchFilter = filter.parse()?;
                collections::run_saved_list(&cfg, filter).await?;
            }
            SavedAction::Add { id } => {
                collections::run_change(&cfg, CollectionKind::Saved, Change::Add, &id).await?;
            }
            SavedAction::Remove { id } => {
                collections::run_change(&cfg, CollectionKind::Saved, Change::Remove, &id).await?;
            }
            SavedAction::Toggle { id } => {
                collections::run_change(&cfg, CollectionKind::Saved, Change::Toggle, &id).await?;
            }
        },
        Commands::Watched { action } => match action {
            WatchedAction::List => {
                collections::run_list_ids(&cfg, CollectionKind::Watched).await?;
            }
            WatchedAction::Add { id } => {
                collections::run_change(&cfg, CollectionKind::Watched, Change::Add, &id).await?;
            }
            WatchedAction::Remove { id } => {
                collections::run_change(&cfg, CollectionKind::Watched, Change::Remove, &id).await?;
            }
            WatchedAction::Toggle { id } => {
                collections::run_change(&cfg, CollectionKind::Watched, Change::Toggle, &id).await?;
            }
        },
        Commands::Sources { platform } => {
            let platform = match platform.as_deref() {
                None | Some("all") => None,
                Some(name) => Some(name.parse::<Platform>()?),
            };
            sources::list_sources(&cfg, platform).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Completions { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_all_subcommands_parse() {
        let subcommands = [
            vec!["oasis", "init"],
            vec!["oasis", "feed", "--domain", "AI", "--domain", "Dev", "--platform", "x"],
            vec!["oasis", "feed", "-q", "gpt", "--limit", "5"],
            vec!["oasis", "show", "yt_1"],
            vec!["oasis", "saved", "list", "--filter", "unwatched"],
            vec!["oasis", "saved", "add", "yt_1"],
            vec!["oasis", "saved", "toggle", "yt_1"],
            vec!["oasis", "watched", "list"],
            vec!["oasis", "watched", "remove", "yt_1"],
            vec!["oasis", "sources", "--platform", "youtube"],
            vec!["oasis", "stats"],
            vec!["oasis", "serve"],
            vec!["oasis", "completions", "bash"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(result.is_ok(), "Failed to parse: {:?}", args);
        }
    }

    #[test]
    fn test_feed_flags_collect() {
        let cli = Cli::parse_from(["oasis", "feed", "--domain", "AI", "--domain", "Dev,Health"]);
        match cli.command {
            Commands::Feed { domains, .. } => assert_eq!(domains, vec!["AI", "Dev,Health"]),
            _ => panic!("expected feed"),
        }
    }
}
