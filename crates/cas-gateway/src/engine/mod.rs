//! Authorization decision engine.
//!
//! fetch descriptor -> read policy snapshot -> first admitted encoding.
//! The policy is read only after a descriptor is in hand, and exactly once
//! per decision, so one decision never mixes two policies.

use std::sync::Arc;

use cas_core::{Denial, Verdict};

use crate::catalog::MediaCatalog;
use crate::policy::PolicyView;

#[derive(Clone)]
pub struct AuthorizationEngine {
    catalog: Arc<dyn MediaCatalog>,
    policy: Arc<dyn PolicyView>,
}

impl AuthorizationEngine {
    pub fn new(catalog: Arc<dyn MediaCatalog>, policy: Arc<dyn PolicyView>) -> Self {
        Self { catalog, policy }
    }

    pub async fn authorize(&self, content_id: &str, endpoint: &str) -> Verdict {
        let media = match self.catalog.fetch(content_id, endpoint).await {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(%content_id, kind = e.kind(), error = %e, "catalog fetch failed");
                return Verdict::Denied(Denial::CatalogUnavailable);
            }
        };

        let policy = self.policy.current();
        match policy.select(&media.encodings) {
            Some(enc) => {
                tracing::debug!(
                    %content_id,
                    drm_id = %policy.required_drm_id(),
                    uri = %enc.uri,
                    "authorized"
                );
                Verdict::Authorized(enc.clone())
            }
            None => {
                tracing::debug!(
                    %content_id,
                    drm_id = %policy.required_drm_id(),
                    encodings = media.encodings.len(),
                    "no matching encodings"
                );
                Verdict::Denied(Denial::NoMatchingEncodings)
            }
        }
    }
}
