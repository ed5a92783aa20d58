//! HTTP catalog client.
//!
//! `GET http://{endpoint}/media/{contentId}`; anything but 200 is an error.
//! Single attempt per call: no retry, no cache. The client carries an
//! explicit total and connect timeout, and the request future is owned by
//! the caller's task so dropping the inbound request drops this one too.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{StatusCode, Url};
use tracing::debug;

use cas_core::error::{CasError, Result};
use cas_core::{FetchError, MediaDescriptor};

use super::MediaCatalog;
use crate::config::GatewayConfig;

const USER_AGENT_VALUE: &str = concat!("cas-gateway/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
}

impl CatalogClient {
    pub fn new(timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| CasError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { http })
    }

    pub fn from_config(cfg: &GatewayConfig) -> Result<Self> {
        Self::new(cfg.catalog_timeout(), cfg.catalog_connect_timeout())
    }

    /// Lookup URL for `content_id`. The id becomes one percent-encoded path
    /// segment, so it can never escape `/media/`.
    pub fn media_url(endpoint: &str, content_id: &str) -> std::result::Result<Url, FetchError> {
        let endpoint = endpoint.trim();
        let base = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("http://{endpoint}")
        };

        let mut url = Url::parse(&base).map_err(|e| FetchError::Network {
            message: format!("invalid catalog endpoint {endpoint}: {e}"),
        })?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Network {
                message: format!("catalog endpoint cannot carry a path: {endpoint}"),
            })?
            .pop_if_empty()
            .push("media")
            .push(content_id);
        Ok(url)
    }
}

#[async_trait]
impl MediaCatalog for CatalogClient {
    async fn fetch(
        &self,
        content_id: &str,
        endpoint: &str,
    ) -> std::result::Result<MediaDescriptor, FetchError> {
        let url = Self::media_url(endpoint, content_id)?;
        debug!(url = %url, "fetch content from catalog");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Network {
            message: format!("reading body failed: {e}"),
        })?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_http_scheme() {
        let url = CatalogClient::media_url("cms:8080", "abc123").unwrap();
        assert_eq!(url.as_str(), "http://cms:8080/media/abc123");
    }

    #[test]
    fn explicit_scheme_and_base_path_are_kept() {
        let url = CatalogClient::media_url("https://cms.example/api/", "42").unwrap();
        assert_eq!(url.as_str(), "https://cms.example/api/media/42");
    }

    #[test]
    fn content_id_cannot_escape_media_path() {
        let url = CatalogClient::media_url("cms", "a/../b?x=1").unwrap();
        assert_eq!(url.path(), "/media/a%2F..%2Fb%3Fx=1");
        assert!(url.query().is_none());
    }

    #[test]
    fn unparseable_endpoint_is_network_error() {
        let err = CatalogClient::media_url("http://[::1", "x").unwrap_err();
        assert_eq!(err.kind(), "network");
    }
}
