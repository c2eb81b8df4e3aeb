//! Decoding of the remote feed payload.
//!
//! Wire format:
//!
//! ```json
//! {"items": [{"id": "<uuid>", "description": null, "location": null, "image": "<url>"}]}
//! ```
//!
//! Only status 200 is accepted. Item order is preserved.

use feedkit_core::{Error, FeedImage};
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

const OK_200: u16 = 200;

#[derive(Debug, Deserialize)]
struct Root {
    items: Vec<RemoteFeedItem>,
}

#[derive(Debug, Deserialize)]
struct RemoteFeedItem {
    id: Uuid,
    description: Option<String>,
    location: Option<String>,
    image: Url,
}

impl From<RemoteFeedItem> for FeedImage {
    fn from(item: RemoteFeedItem) -> Self {
        FeedImage::new(item.id, item.description, item.location, item.image)
    }
}

/// Map a raw response into domain images.
pub fn map(data: &[u8], status: u16) -> Result<Vec<FeedImage>, Error> {
    if status != OK_200 {
        return Err(Error::InvalidData(format!("unexpected status {status}")));
    }

    let root: Root = serde_json::from_slice(data).map_err(|e| Error::InvalidData(e.to_string()))?;

    Ok(root.items.into_iter().map(FeedImage::from).collect())
}
