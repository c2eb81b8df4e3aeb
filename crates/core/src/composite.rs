//! Loaders composed from other loaders.

use async_trait::async_trait;

use crate::feed::{FeedCache, FeedLoader, LoadFeedResult};

/// Loads from `decoratee` and writes every successful result through to
/// `cache`.
///
/// A failed save is logged; the loaded feed is still returned.
#[derive(Debug)]
pub struct FeedLoaderCacheDecorator<L, C> {
    decoratee: L,
    cache: C,
}

impl<L, C> FeedLoaderCacheDecorator<L, C> {
    pub fn new(decoratee: L, cache: C) -> Self {
        Self { decoratee, cache }
    }
}

#[async_trait]
impl<L: FeedLoader, C: FeedCache> FeedLoader for FeedLoaderCacheDecorator<L, C> {
    async fn load(&self) -> LoadFeedResult {
        let feed = self.decoratee.load().await?;
        if let Err(e) = self.cache.save(&feed).await {
            tracing::warn!(error = %e, "failed to cache loaded feed");
        }
        Ok(feed)
    }
}

/// Loads from `primary`, falling back to `fallback` when it fails.
#[derive(Debug)]
pub struct FeedLoaderWithFallback<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FeedLoaderWithFallback<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl<P: FeedLoader, F: FeedLoader> FeedLoader for FeedLoaderWithFallback<P, F> {
    async fn load(&self) -> LoadFeedResult {
        match self.primary.load().await {
            Ok(feed) => Ok(feed),
            Err(e) => {
                tracing::info!(error = %e, "primary feed loader failed; using fallback");
                self.fallback.load().await
            }
        }
    }
}
