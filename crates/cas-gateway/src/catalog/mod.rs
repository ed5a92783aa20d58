//! Catalog (content manager) access.
//!
//! The engine only sees the `MediaCatalog` trait; `CatalogClient` is the
//! HTTP implementation.

pub mod client;

use async_trait::async_trait;

use cas_core::{FetchError, MediaDescriptor};

pub use client::CatalogClient;

#[async_trait]
pub trait MediaCatalog: Send + Sync {
    /// One lookup of `content_id` against `endpoint` (`host[:port]`).
    async fn fetch(
        &self,
        content_id: &str,
        endpoint: &str,
    ) -> std::result::Result<MediaDescriptor, FetchError>;
}
