//! JSON flat-file feed store.
//!
//! The slot is one file holding `{"feed": [...], "timestamp": "..."}`. A
//! missing file is an empty slot. Writes go to a sibling temp file first and
//! are renamed into place, so a reader never sees a half-written cache.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{CachedFeed, FeedStore, LocalFeedImage, RetrieveCachedFeedResult};
use crate::Error;

/// File-backed feed store.
///
/// Operations queue on a fair mutex, so they run one at a time in the order
/// they were submitted.
#[derive(Debug)]
pub struct FileFeedStore {
    path: PathBuf,
    queue: Mutex<()>,
}

impl FileFeedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), queue: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_slot(&self) -> Result<Option<CachedFeed>, Error> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[async_trait]
impl FeedStore for FileFeedStore {
    async fn retrieve(&self) -> RetrieveCachedFeedResult {
        let _turn = self.queue.lock().await;
        match self.read_slot().await {
            Ok(Some(cache)) => RetrieveCachedFeedResult::Found(cache),
            Ok(None) => RetrieveCachedFeedResult::Empty,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "failed to read feed cache file");
                RetrieveCachedFeedResult::Failure(e)
            }
        }
    }

    async fn insert(&self, feed: Vec<LocalFeedImage>, timestamp: DateTime<Utc>) -> Result<(), Error> {
        let _turn = self.queue.lock().await;
        let encoded = serde_json::to_vec(&CachedFeed { feed, timestamp })
            .map_err(|e| Error::Store(format!("failed to encode feed cache: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let staging = self.staging_path();
        if let Err(e) = write_then_rename(&staging, &self.path, &encoded).await {
            discard_staging(&staging).await;
            return Err(e.into());
        }

        tracing::debug!(path = %self.path.display(), bytes = encoded.len(), "wrote feed cache file");
        Ok(())
    }

    async fn delete_cached_feed(&self) -> Result<(), Error> {
        let _turn = self.queue.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "removed feed cache file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

async fn write_then_rename(staging: &Path, path: &Path, contents: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(staging, contents).await?;
    tokio::fs::rename(staging, path).await
}

async fn discard_staging(staging: &Path) {
    match tokio::fs::remove_file(staging).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %staging.display(), error = %e, "failed to remove staged feed cache file"),
    }
}
