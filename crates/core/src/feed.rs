//! Domain feed model and the loader/cache abstractions built around it.

use async_trait::async_trait;
use url::Url;
use uuid::Uuid;

use crate::Error;

/// A single entry of the feed as seen by business logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedImage {
    pub id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Url,
}

impl FeedImage {
    pub fn new(id: Uuid, description: Option<String>, location: Option<String>, url: Url) -> Self {
        Self { id, description, location, url }
    }
}

/// Result of a feed load.
pub type LoadFeedResult = Result<Vec<FeedImage>, Error>;

/// Anything that can produce the current feed.
///
/// Each call is independent; implementations do not dedupe overlapping loads.
#[async_trait]
pub trait FeedLoader: Send + Sync {
    async fn load(&self) -> LoadFeedResult;
}

/// Anything that can persist a feed.
#[async_trait]
pub trait FeedCache: Send + Sync {
    async fn save(&self, feed: &[FeedImage]) -> Result<(), Error>;
}

#[async_trait]
impl<T: FeedLoader + ?Sized> FeedLoader for std::sync::Arc<T> {
    async fn load(&self) -> LoadFeedResult {
        (**self).load().await
    }
}

#[async_trait]
impl<T: FeedCache + ?Sized> FeedCache for std::sync::Arc<T> {
    async fn save(&self, feed: &[FeedImage]) -> Result<(), Error> {
        (**self).save(feed).await
    }
}
