//! [`FeedStore`] operations for the SQLite engine.
//!
//! The slot lives in `feed_cache` (a single row, id = 1) with its images in
//! `feed_images`, ordered by `position`. Timestamps are stored as RFC 3339
//! strings with nanosecond precision so a retrieve returns exactly the
//! instant that was inserted.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;
use url::Url;
use uuid::Uuid;

use super::connection::SqliteFeedStore;
use super::{CachedFeed, FeedStore, LocalFeedImage, RetrieveCachedFeedResult};
use crate::Error;

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::CorruptCache(format!("timestamp {raw:?}: {e}")))
}

fn parse_image(id: &str, description: Option<String>, location: Option<String>, url: &str) -> Result<LocalFeedImage, Error> {
    let id = Uuid::parse_str(id).map_err(|e| Error::CorruptCache(format!("image id {id:?}: {e}")))?;
    let url = Url::parse(url).map_err(|e| Error::CorruptCache(format!("image url {url:?}: {e}")))?;
    Ok(LocalFeedImage { id, description, location, url })
}

impl SqliteFeedStore {
    async fn read_slot(&self) -> Result<Option<CachedFeed>, Error> {
        self.conn
            .call(|conn| -> Result<Option<CachedFeed>, Error> {
                let raw_timestamp = match conn.query_row("SELECT timestamp FROM feed_cache WHERE id = 1", [], |row| {
                    row.get::<_, String>(0)
                }) {
                    Ok(ts) => ts,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                    Err(e) => return Err(e.into()),
                };
                let timestamp = parse_timestamp(&raw_timestamp)?;

                let mut stmt =
                    conn.prepare("SELECT id, description, location, url FROM feed_images WHERE cache_id = 1 ORDER BY position")?;
                let rows = stmt.query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                })?;

                let mut feed = Vec::new();
                for row in rows {
                    let (id, description, location, url) = row?;
                    feed.push(parse_image(&id, description, location, &url)?);
                }

                Ok(Some(CachedFeed { feed, timestamp }))
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl FeedStore for SqliteFeedStore {
    async fn retrieve(&self) -> RetrieveCachedFeedResult {
        match self.read_slot().await {
            Ok(Some(cache)) => {
                tracing::debug!(images = cache.feed.len(), timestamp = %cache.timestamp, "retrieved cached feed");
                RetrieveCachedFeedResult::Found(cache)
            }
            Ok(None) => RetrieveCachedFeedResult::Empty,
            Err(e) => {
                tracing::debug!(error = %e, "failed to retrieve cached feed");
                RetrieveCachedFeedResult::Failure(e)
            }
        }
    }

    async fn insert(&self, feed: Vec<LocalFeedImage>, timestamp: DateTime<Utc>) -> Result<(), Error> {
        let timestamp = timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true);
        let count = feed.len();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                tx.execute("DELETE FROM feed_images", [])?;
                tx.execute("DELETE FROM feed_cache", [])?;
                tx.execute("INSERT INTO feed_cache (id, timestamp) VALUES (1, ?1)", params![timestamp])?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO feed_images (cache_id, position, id, description, location, url)
                         VALUES (1, ?1, ?2, ?3, ?4, ?5)",
                    )?;
                    for (position, image) in feed.iter().enumerate() {
                        stmt.execute(params![
                            position as i64,
                            image.id.to_string(),
                            &image.description,
                            &image.location,
                            image.url.as_str(),
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        tracing::debug!(images = count, "inserted cached feed");
        Ok(())
    }

    async fn delete_cached_feed(&self) -> Result<(), Error> {
        self.conn
            .call(|conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                tx.execute("DELETE FROM feed_images", [])?;
                tx.execute("DELETE FROM feed_cache", [])?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        tracing::debug!("deleted cached feed");
        Ok(())
    }
}
