//! Lightweight in-process metrics (dependency-free apart from `dashmap`).
//!
//! Counters and the latency histogram are atomics rendered in Prometheus text
//! format by `/metrics`. `MeteredCatalog` counts catalog failures by kind
//! without the engine knowing about metrics.

pub mod metrics;

use std::sync::Arc;

use async_trait::async_trait;

use cas_core::{FetchError, MediaDescriptor};

use crate::catalog::MediaCatalog;

pub use metrics::GatewayMetrics;

/// Catalog decorator that records failures in `cas_catalog_errors_total`.
pub struct MeteredCatalog {
    inner: Arc<dyn MediaCatalog>,
    metrics: Arc<GatewayMetrics>,
}

impl MeteredCatalog {
    pub fn new(inner: Arc<dyn MediaCatalog>, metrics: Arc<GatewayMetrics>) -> Self {
        Self { inner, metrics }
    }
}

#[async_trait]
impl MediaCatalog for MeteredCatalog {
    async fn fetch(
        &self,
        content_id: &str,
        endpoint: &str,
    ) -> std::result::Result<MediaDescriptor, FetchError> {
        let res = self.inner.fetch(content_id, endpoint).await;
        if let Err(e) = &res {
            self.metrics.catalog_errors.inc(e.kind());
        }
        res
    }
}
