use thiserror::Error;

/// Failure to parse a user-supplied facet name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown platform: '{0}' (expected youtube, bilibili, x, or podcast)")]
    Platform(String),
    #[error("unknown domain: '{0}'")]
    Domain(String),
    #[error("unknown watch filter: '{0}' (expected all, unwatched, or watched)")]
    WatchFilter(String),
    #[error("unknown collection: '{0}' (expected saved or watched)")]
    Collection(String),
}

/// Failure to resolve an item id.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("item not found: {0}")]
    NotFound(String),
    #[error("item id must not be empty")]
    EmptyId,
}
