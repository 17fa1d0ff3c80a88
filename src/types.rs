//! Common types and data structures

use std::fmt;
use std::sync::Arc;

/// Opaque reference to one subscription, as configured by the user.
/// Never interpreted beyond being handed to the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionRef(String);

impl SubscriptionRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved subscription as returned by the directory service.
///
/// Only `name` is interpreted; everything else rides along unmodified so
/// the directory payload survives a round-trip through the feed.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SubscriptionRecord {
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default, alias = "postCount")]
    pub post_count: i64,
    #[serde(default)]
    pub updated: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SubscriptionRecord {
    /// Minimal record carrying just a display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: String::new(),
            post_count: 0,
            updated: 0,
            extra: serde_json::Map::new(),
        }
    }
}

/// Immutable view of the accumulated records. Appends build a fresh
/// vector, so a snapshot handed out earlier is never invalidated.
pub type FeedSnapshot = Arc<Vec<SubscriptionRecord>>;

/// Display-ready projection of one record, recomputed on every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDescriptor {
    pub title: String,
}

/// Why a reference failed to resolve. Logged at debug level and dropped;
/// never shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("directory returned {0}")]
    Status(reqwest::StatusCode),
}
