//! In-process feed store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{CachedFeed, FeedStore, LocalFeedImage, RetrieveCachedFeedResult};
use crate::Error;

/// Feed store that keeps the slot in memory.
///
/// Operations queue on a fair mutex, so they apply in submission order.
#[derive(Debug, Default)]
pub struct InMemoryFeedStore {
    slot: Mutex<Option<CachedFeed>>,
}

impl InMemoryFeedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedStore for InMemoryFeedStore {
    async fn retrieve(&self) -> RetrieveCachedFeedResult {
        match self.slot.lock().await.as_ref() {
            Some(cache) => RetrieveCachedFeedResult::Found(cache.clone()),
            None => RetrieveCachedFeedResult::Empty,
        }
    }

    async fn insert(&self, feed: Vec<LocalFeedImage>, timestamp: DateTime<Utc>) -> Result<(), Error> {
        *self.slot.lock().await = Some(CachedFeed { feed, timestamp });
        Ok(())
    }

    async fn delete_cached_feed(&self) -> Result<(), Error> {
        self.slot.lock().await.take();
        Ok(())
    }
}
