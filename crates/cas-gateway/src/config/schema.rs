use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use cas_core::error::{CasError, Result};

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub listen: String,
    /// Protected path prefix, always `/segment`.
    pub resource: String,
    /// Catalog `host[:port]`; the content route fails without it.
    pub catalog_endpoint: Option<String>,
    pub jwt_secret: Secret,
    pub app_version: String,
    /// Extra directory searched for the policy file.
    pub config_path: Option<PathBuf>,
    pub catalog_timeout_ms: u64,
    pub catalog_connect_timeout_ms: u64,
    pub policy_reload_interval_ms: u64,
    pub denial_status: DenialStatus,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            resource: default_resource(),
            catalog_endpoint: None,
            jwt_secret: Secret::new(String::new()),
            app_version: String::new(),
            config_path: None,
            catalog_timeout_ms: default_catalog_timeout_ms(),
            catalog_connect_timeout_ms: default_catalog_connect_timeout_ms(),
            policy_reload_interval_ms: default_policy_reload_interval_ms(),
            denial_status: DenialStatus::Uniform,
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.expose().is_empty() {
            return Err(CasError::Config("JWT_SECRET must be set".into()));
        }
        if !(100..=60_000).contains(&self.catalog_timeout_ms) {
            return Err(CasError::Config(
                "CATALOG_TIMEOUT_MS must be between 100 and 60000".into(),
            ));
        }
        if self.catalog_connect_timeout_ms == 0
            || self.catalog_connect_timeout_ms > self.catalog_timeout_ms
        {
            return Err(CasError::Config(
                "CATALOG_CONNECT_TIMEOUT_MS must be positive and not exceed CATALOG_TIMEOUT_MS"
                    .into(),
            ));
        }
        if !(100..=60_000).contains(&self.policy_reload_interval_ms) {
            return Err(CasError::Config(
                "POLICY_RELOAD_INTERVAL_MS must be between 100 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_millis(self.catalog_timeout_ms)
    }

    pub fn catalog_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.catalog_connect_timeout_ms)
    }

    pub fn policy_reload_interval(&self) -> Duration {
        Duration::from_millis(self.policy_reload_interval_ms)
    }
}

/// HTTP status mapping for denials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DenialStatus {
    /// Every denial is a 500.
    #[default]
    Uniform,
    /// Catalog failures are 502, missing encodings are 404.
    Distinct,
}

impl FromStr for DenialStatus {
    type Err = CasError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(DenialStatus::Uniform),
            "distinct" => Ok(DenialStatus::Distinct),
            other => Err(CasError::Config(format!(
                "DENIAL_STATUS must be uniform or distinct, got {other}"
            ))),
        }
    }
}

/// Signing secret with a redacted `Debug`.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(s: String) -> Self {
        Self(s)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Path segments owned by the operational endpoints.
const RESERVED_SEGMENTS: [&str; 3] = ["healthz", "readyz", "metrics"];

/// `cas`, `/cas/` and `cas/` all become `/cas`. Nested prefixes are refused.
pub(crate) fn normalize_resource(raw: &str) -> Result<String> {
    let seg = raw.trim().trim_matches('/');
    if seg.is_empty() || seg.contains('/') || seg.starts_with(':') || seg.starts_with('*') {
        return Err(CasError::Config(format!(
            "RESOURCE must be a single path segment, got {raw}"
        )));
    }
    if RESERVED_SEGMENTS.contains(&seg) {
        return Err(CasError::Config(format!("RESOURCE must not be {seg}")));
    }
    Ok(format!("/{seg}"))
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_resource() -> String {
    "/cas".into()
}
fn default_catalog_timeout_ms() -> u64 {
    5000
}
fn default_catalog_connect_timeout_ms() -> u64 {
    2000
}
fn default_policy_reload_interval_ms() -> u64 {
    2000
}
