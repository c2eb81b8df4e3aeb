//! Persistence contract for the single-slot feed cache and its engines.
//!
//! Every engine holds at most one [`CachedFeed`] and executes its operations
//! one at a time, in the order they were submitted:
//!
//! - [`SqliteFeedStore`]: SQLite through a dedicated connection thread
//! - [`FileFeedStore`]: a JSON file guarded by a fair async mutex
//! - [`InMemoryFeedStore`]: process memory, for tests and ephemeral runs

pub mod connection;
pub mod file;
pub mod memory;
pub mod migrations;
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

pub use crate::Error;
use crate::feed::FeedImage;

pub use connection::SqliteFeedStore;
pub use file::FileFeedStore;
pub use memory::InMemoryFeedStore;

/// Persisted form of a feed entry.
///
/// Mirrors [`FeedImage`] field for field but is owned by the storage layer so
/// the on-disk format can change without touching the domain model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFeedImage {
    pub id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Url,
}

impl From<&FeedImage> for LocalFeedImage {
    fn from(image: &FeedImage) -> Self {
        Self {
            id: image.id,
            description: image.description.clone(),
            location: image.location.clone(),
            url: image.url.clone(),
        }
    }
}

impl From<LocalFeedImage> for FeedImage {
    fn from(local: LocalFeedImage) -> Self {
        FeedImage { id: local.id, description: local.description, location: local.location, url: local.url }
    }
}

/// The content of the cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedFeed {
    pub feed: Vec<LocalFeedImage>,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of [`FeedStore::retrieve`].
#[derive(Debug)]
pub enum RetrieveCachedFeedResult {
    Empty,
    Found(CachedFeed),
    Failure(Error),
}

/// Single-slot feed persistence.
///
/// Implementations must run operations one at a time in submission order,
/// report an empty slot as [`RetrieveCachedFeedResult::Empty`], and never
/// delete anything as a side effect of `retrieve`.
#[async_trait]
pub trait FeedStore: Send + Sync {
    async fn retrieve(&self) -> RetrieveCachedFeedResult;

    /// Replace whatever is cached with `feed` stamped at `timestamp`.
    async fn insert(&self, feed: Vec<LocalFeedImage>, timestamp: DateTime<Utc>) -> Result<(), Error>;

    async fn delete_cached_feed(&self) -> Result<(), Error>;
}
