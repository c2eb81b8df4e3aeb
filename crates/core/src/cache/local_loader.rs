//! Save, load and validate use cases over a [`FeedStore`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::FeedCachePolicy;
use crate::Error;
use crate::feed::{FeedCache, FeedImage, FeedLoader, LoadFeedResult};
use crate::store::{FeedStore, LocalFeedImage, RetrieveCachedFeedResult};
use crate::task::{LoadTask, live_owner};

/// Time source used to stamp and validate the cache.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Coordinates a [`FeedStore`], a clock and a [`FeedCachePolicy`].
///
/// - `save` clears the slot and only then inserts, stamped with the clock.
/// - `load` never writes: an expired cache loads as an empty feed and a
///   retrieval failure is returned as is.
/// - `validate_cache` is the only path that deletes stale or unreadable data.
pub struct LocalFeedLoader<S> {
    store: Arc<S>,
    current_date: Clock,
    policy: FeedCachePolicy,
}

impl<S> std::fmt::Debug for LocalFeedLoader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFeedLoader").field("policy", &self.policy).finish_non_exhaustive()
    }
}

fn to_local(feed: &[FeedImage]) -> Vec<LocalFeedImage> {
    feed.iter().map(LocalFeedImage::from).collect()
}

impl<S: FeedStore + 'static> LocalFeedLoader<S> {
    pub fn new(store: Arc<S>, current_date: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        Self { store, current_date: Arc::new(current_date), policy: FeedCachePolicy::default() }
    }

    pub fn with_policy(mut self, policy: FeedCachePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FeedCachePolicy {
        self.policy
    }

    /// Replace the cached feed with `feed`.
    ///
    /// A deletion failure is returned without attempting the insert.
    pub async fn save(&self, feed: &[FeedImage]) -> Result<(), Error> {
        self.store.delete_cached_feed().await?;
        self.store.insert(to_local(feed), (self.current_date)()).await?;
        tracing::debug!(images = feed.len(), "saved feed to cache");
        Ok(())
    }

    pub async fn load(&self) -> LoadFeedResult {
        let retrieval = self.store.retrieve().await;
        self.map_retrieval(retrieval)
    }

    /// Delete the cache if it cannot be read or has expired.
    ///
    /// Deletion failures are logged and otherwise ignored.
    pub async fn validate_cache(&self) {
        let retrieval = self.store.retrieve().await;
        if self.needs_deletion(&retrieval) {
            delete_ignoring_errors(self.store.as_ref()).await;
        }
    }

    fn map_retrieval(&self, retrieval: RetrieveCachedFeedResult) -> LoadFeedResult {
        match retrieval {
            RetrieveCachedFeedResult::Found(cache) if self.policy.validate(cache.timestamp, (self.current_date)()) => {
                Ok(cache.feed.into_iter().map(FeedImage::from).collect())
            }
            RetrieveCachedFeedResult::Found(cache) => {
                tracing::debug!(timestamp = %cache.timestamp, "cached feed expired");
                Ok(Vec::new())
            }
            RetrieveCachedFeedResult::Empty => Ok(Vec::new()),
            RetrieveCachedFeedResult::Failure(e) => Err(e),
        }
    }

    fn needs_deletion(&self, retrieval: &RetrieveCachedFeedResult) -> bool {
        match retrieval {
            RetrieveCachedFeedResult::Failure(e) => {
                tracing::debug!(error = %e, "cached feed unreadable");
                true
            }
            RetrieveCachedFeedResult::Found(cache) => !self.policy.validate(cache.timestamp, (self.current_date)()),
            RetrieveCachedFeedResult::Empty => false,
        }
    }

    /// Spawned form of [`LocalFeedLoader::save`].
    ///
    /// If the loader is dropped or the task cancelled while the deletion is in
    /// flight, the insert is never issued; in either case `completion` does
    /// not run.
    pub fn spawn_save<F>(self: &Arc<Self>, feed: Vec<FeedImage>, completion: F) -> LoadTask
    where
        F: FnOnce(Result<(), Error>) + Send + 'static,
    {
        let owner = Arc::downgrade(self);
        let store = Arc::clone(&self.store);
        LoadTask::spawn(move |token| async move {
            let deletion = store.delete_cached_feed().await;
            let Some(this) = live_owner(&owner, &token) else { return };
            if let Err(e) = deletion {
                completion(Err(e));
                return;
            }

            let timestamp = (this.current_date)();
            drop(this);
            let insertion = store.insert(to_local(&feed), timestamp).await;
            if live_owner(&owner, &token).is_some() {
                completion(insertion);
            }
        })
    }

    /// Spawned form of [`LocalFeedLoader::load`].
    pub fn spawn_load<F>(self: &Arc<Self>, completion: F) -> LoadTask
    where
        F: FnOnce(LoadFeedResult) + Send + 'static,
    {
        let owner = Arc::downgrade(self);
        let store = Arc::clone(&self.store);
        LoadTask::spawn(move |token| async move {
            let retrieval = store.retrieve().await;
            if let Some(this) = live_owner(&owner, &token) {
                completion(this.map_retrieval(retrieval));
            }
        })
    }

    /// Spawned form of [`LocalFeedLoader::validate_cache`].
    ///
    /// Nothing is deleted once the loader is gone or the task is cancelled.
    pub fn spawn_validate_cache(self: &Arc<Self>) -> LoadTask {
        let owner = Arc::downgrade(self);
        let store = Arc::clone(&self.store);
        LoadTask::spawn(move |token| async move {
            let retrieval = store.retrieve().await;
            let needs_deletion = match live_owner(&owner, &token) {
                Some(this) => this.needs_deletion(&retrieval),
                None => return,
            };
            if needs_deletion {
                delete_ignoring_errors(store.as_ref()).await;
            }
        })
    }
}

async fn delete_ignoring_errors<S: FeedStore + ?Sized>(store: &S) {
    if let Err(e) = store.delete_cached_feed().await {
        tracing::warn!(error = %e, "failed to delete invalid feed cache");
    }
}

#[async_trait]
impl<S: FeedStore + 'static> FeedLoader for LocalFeedLoader<S> {
    async fn load(&self) -> LoadFeedResult {
        LocalFeedLoader::load(self).await
    }
}

#[async_trait]
impl<S: FeedStore + 'static> FeedCache for LocalFeedLoader<S> {
    async fn save(&self, feed: &[FeedImage]) -> Result<(), Error> {
        LocalFeedLoader::save(self, feed).await
    }
}
