//! # Oasis
//!
//! A personal content aggregation dashboard backend.
//!
//! External fetchers deposit a feed index (`feeds.json`) plus optional
//! per-item transcripts and summaries into a data directory. Oasis reads
//! those artifacts, filters the feed by domain, platform, and free text,
//! keeps the user's saved and watched sets in SQLite, and loads enrichment
//! lazily when an item is opened.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────┐
//! │  data/       │──▶│  oasis-core  │◀──│  SQLite  │
//! │ feeds.json   │   │ filter+state │   │  kv      │
//! └──────────────┘   └──────┬───────┘   └──────────┘
//!                           │
//!                 ┌─────────┴─────────┐
//!                 ▼                   ▼
//!            ┌──────────┐       ┌──────────┐
//!            │   CLI    │       │   HTTP   │
//!            │ (oasis)  │       │  (JSON)  │
//!            └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! oasis init                          # create database
//! oasis feed --domain AI --limit 20   # filtered feed
//! oasis show yt_abc123                # item with transcript and summary
//! oasis saved add yt_abc123
//! oasis serve                         # start HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`data`] | Producer artifacts on disk |
//! | [`db`] | Database connection and schema |
//! | [`sqlite_store`] | SQLite key-value store |
//! | [`feed`] | Filtered feed listing |
//! | [`detail`] | Item detail with enrichment |
//! | [`collections`] | Saved and watched sets |
//! | [`sources`] | Followed sources |
//! | [`stats`] | Feed statistics |
//! | [`server`] | JSON HTTP API |

pub mod collections;
pub mod config;
pub mod data;
pub mod db;
pub mod detail;
pub mod feed;
pub mod server;
pub mod sources;
pub mod sqlite_store;
pub mod stats;
