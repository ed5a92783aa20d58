//! Gateway config loader (environment, strict parsing).
//!
//! Every key is read through a lookup function so tests can feed a map
//! instead of mutating the process environment.

pub mod schema;

use cas_core::error::{CasError, Result};

pub use schema::{DenialStatus, GatewayConfig, Secret};

pub fn load_from_env() -> Result<GatewayConfig> {
    load_from_lookup(|key| std::env::var(key).ok())
}

pub fn load_from_lookup<F>(lookup: F) -> Result<GatewayConfig>
where
    F: Fn(&str) -> Option<String>,
{
    // An empty variable counts as unset.
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let mut cfg = GatewayConfig::default();

    if let Some(port) = get("PORT") {
        let port: u16 = parse(&port, "PORT")?;
        cfg.listen = format!("0.0.0.0:{port}");
    }
    if let Some(resource) = get("RESOURCE") {
        cfg.resource = schema::normalize_resource(&resource)?;
    }
    cfg.catalog_endpoint = get("CONTENT_MANAGER_ENDPOINT").map(|s| s.trim().to_string());
    cfg.jwt_secret = Secret::new(get("JWT_SECRET").unwrap_or_default());
    if let Some(v) = get("APP_VERSION") {
        cfg.app_version = v;
    }
    cfg.config_path = get("CONFIG_PATH").map(Into::into);
    if let Some(v) = get("CATALOG_TIMEOUT_MS") {
        cfg.catalog_timeout_ms = parse(&v, "CATALOG_TIMEOUT_MS")?;
    }
    if let Some(v) = get("CATALOG_CONNECT_TIMEOUT_MS") {
        cfg.catalog_connect_timeout_ms = parse(&v, "CATALOG_CONNECT_TIMEOUT_MS")?;
    }
    if let Some(v) = get("POLICY_RELOAD_INTERVAL_MS") {
        cfg.policy_reload_interval_ms = parse(&v, "POLICY_RELOAD_INTERVAL_MS")?;
    }
    if let Some(v) = get("DENIAL_STATUS") {
        cfg.denial_status = v.parse()?;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn parse<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| CasError::Config(format!("{key} has invalid value: {raw}")))
}
