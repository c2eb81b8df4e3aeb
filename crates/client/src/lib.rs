//! Remote side of feedkit.
//!
//! This crate provides the HTTP transport seam with its reqwest adapter, the
//! feed payload codec, and the remote feed loader built on both.

pub mod api;
pub mod http;

pub use api::RemoteFeedLoader;
pub use http::{HttpClient, HttpClientConfig, HttpClientError, HttpResponse, ReqwestHttpClient, canonicalize};
