//! Local feed cache: the freshness policy and the use cases built on a
//! [`FeedStore`](crate::store::FeedStore).

pub mod local_loader;
pub mod policy;

pub use local_loader::{Clock, LocalFeedLoader};
pub use policy::FeedCachePolicy;
