//! # Oasis Core
//!
//! Shared, runtime-agnostic logic for Oasis: feed models, multi-facet
//! filtering, the saved/watched collections, lazy enrichment loading, and
//! display formatting.
//!
//! This crate contains no tokio, sqlx, or filesystem I/O. Persistence and
//! artifact reading are expressed as traits ([`collection::KvStore`],
//! [`enrichment::EnrichmentSource`]) that the `oasis` application crate
//! implements.

pub mod collection;
pub mod enrichment;
pub mod error;
pub mod filter;
pub mod format;
pub mod models;
pub mod sources;
