//! Shared application state for the gateway.
//!
//! Built once at startup and cloned into every request. The only value that
//! changes afterwards is the policy snapshot inside `PolicyStore`.

use std::sync::Arc;

use cas_core::error::Result;

use crate::auth::TokenVerifier;
use crate::catalog::{CatalogClient, MediaCatalog};
use crate::config::GatewayConfig;
use crate::engine::AuthorizationEngine;
use crate::obs::{GatewayMetrics, MeteredCatalog};
use crate::policy::{PolicySource, PolicyStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    policy: Arc<PolicyStore>,
    engine: AuthorizationEngine,
    verifier: TokenVerifier,
    metrics: Arc<GatewayMetrics>,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: GatewayConfig, source: &PolicySource) -> Result<Self> {
        let policy = Arc::new(PolicyStore::open(source));
        let catalog = Arc::new(CatalogClient::from_config(&cfg)?);
        Ok(Self::with_parts(cfg, policy, catalog))
    }

    /// Assemble from prebuilt parts (tests inject their own catalog).
    pub fn with_parts(
        cfg: GatewayConfig,
        policy: Arc<PolicyStore>,
        catalog: Arc<dyn MediaCatalog>,
    ) -> Self {
        let metrics = Arc::new(GatewayMetrics::default());
        let catalog = Arc::new(MeteredCatalog::new(catalog, Arc::clone(&metrics)));
        let engine = AuthorizationEngine::new(catalog, policy.clone());
        let verifier = TokenVerifier::new(cfg.jwt_secret.expose().as_bytes());

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                policy,
                engine,
                verifier,
                metrics,
            }),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn policy(&self) -> Arc<PolicyStore> {
        Arc::clone(&self.inner.policy)
    }

    pub fn engine(&self) -> &AuthorizationEngine {
        &self.inner.engine
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.inner.verifier
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.inner.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }
}
