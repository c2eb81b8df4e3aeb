//! Core types and shared functionality for feedkit.
//!
//! This crate provides:
//! - Domain feed model and loader abstractions
//! - Single-slot feed stores (SQLite, JSON file, memory)
//! - Cache freshness policy and the local save/load/validate use cases
//! - Loader composition and presentation
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod composite;
pub mod config;
pub mod error;
pub mod feed;
pub mod presentation;
pub mod store;
pub mod task;

pub use cache::{FeedCachePolicy, LocalFeedLoader};
pub use composite::{FeedLoaderCacheDecorator, FeedLoaderWithFallback};
pub use config::{AppConfig, ConfigError, StoreKind};
pub use error::Error;
pub use feed::{FeedCache, FeedImage, FeedLoader, LoadFeedResult};
pub use store::{FeedStore, FileFeedStore, InMemoryFeedStore, SqliteFeedStore};
pub use task::LoadTask;
