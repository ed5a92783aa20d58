//! Policy file discovery and strict parsing.
//!
//! Schema (YAML):
//! ```yaml
//! config:
//!   app:
//!     DEFAULT_DRM_ID: "6"
//! ```
//! An absent file or an empty document yields the defaults. Unknown keys,
//! wrong types, or a blank DRM id are a `CasError::Config`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use cas_core::error::{CasError, Result};
use cas_core::Policy;

/// File stem searched in each candidate directory.
pub const POLICY_FILE_NAME: &str = "cas-app-config";
/// Environment overlay for the required DRM id.
pub const DRM_ID_ENV: &str = "CONFIG_APP_DEFAULT_DRM_ID";

const EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Where the policy comes from. Candidates are tried in order; the first
/// existing file wins.
#[derive(Debug, Clone)]
pub struct PolicySource {
    candidates: Vec<PathBuf>,
    env_overlay: bool,
}

/// Raw content read from the resolved file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSnapshot {
    pub path: PathBuf,
    pub content: String,
}

impl PolicySource {
    /// A single explicit file, no environment overlay.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            candidates: vec![path.into()],
            env_overlay: false,
        }
    }

    /// `{dir}/{name}.yaml` then `{dir}/{name}.yml` for each dir, in order.
    pub fn search<I, P>(name: &str, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let candidates = dirs
            .into_iter()
            .flat_map(|d| {
                let d = d.as_ref().to_path_buf();
                EXTENSIONS.map(|ext| d.join(format!("{name}.{ext}")))
            })
            .collect();
        Self {
            candidates,
            env_overlay: false,
        }
    }

    /// Working directory first, then `CONFIG_PATH` when set, with the
    /// environment overlay enabled.
    pub fn from_config(cfg: &crate::config::GatewayConfig) -> Self {
        let mut dirs = vec![PathBuf::from(".")];
        if let Some(p) = &cfg.config_path {
            dirs.push(p.clone());
        }
        Self::search(POLICY_FILE_NAME, dirs).with_env_overlay(true)
    }

    pub fn with_env_overlay(mut self, enabled: bool) -> Self {
        self.env_overlay = enabled;
        self
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Read the first existing candidate. `Ok(None)` when none exists.
    pub fn read(&self) -> Result<Option<SourceSnapshot>> {
        for path in &self.candidates {
            match fs::read_to_string(path) {
                Ok(content) => {
                    return Ok(Some(SourceSnapshot {
                        path: path.clone(),
                        content,
                    }))
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(CasError::Config(format!(
                        "read policy file {} failed: {e}",
                        path.display()
                    )))
                }
            }
        }
        Ok(None)
    }

    /// Build a policy from an already-read snapshot plus the overlay.
    pub fn load_snapshot(&self, snapshot: Option<&SourceSnapshot>) -> Result<Policy> {
        let overlay = if self.env_overlay {
            std::env::var(DRM_ID_ENV).ok()
        } else {
            None
        };
        resolve(snapshot.map(|s| s.content.as_str()), overlay)
    }

    /// Read and parse in one step.
    pub fn load(&self) -> Result<Policy> {
        let snapshot = self.read()?;
        if snapshot.is_none() {
            tracing::info!("no policy file found, using defaults");
        }
        self.load_snapshot(snapshot.as_ref())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyFile {
    #[serde(default)]
    config: ConfigSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigSection {
    #[serde(default)]
    app: AppSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AppSection {
    #[serde(default, rename = "DEFAULT_DRM_ID", alias = "default_drm_id")]
    default_drm_id: Option<DrmIdValue>,
}

/// Accepts `DEFAULT_DRM_ID: 6` as well as `DEFAULT_DRM_ID: "6"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DrmIdValue {
    Text(String),
    Number(u64),
}

impl DrmIdValue {
    fn into_string(self) -> String {
        match self {
            DrmIdValue::Text(s) => s,
            DrmIdValue::Number(n) => n.to_string(),
        }
    }
}

/// Parse file content; the overlay, when non-blank, wins over the file.
pub fn resolve(content: Option<&str>, overlay: Option<String>) -> Result<Policy> {
    let from_file = match content {
        Some(s) => parse_drm_id(s)?,
        None => None,
    };

    match overlay.filter(|v| !v.trim().is_empty()).or(from_file) {
        Some(id) => Policy::new(id),
        None => Ok(Policy::default()),
    }
}

/// Strict parse of the policy document.
pub fn load_from_str(s: &str) -> Result<Policy> {
    resolve(Some(s), None)
}

fn parse_drm_id(s: &str) -> Result<Option<String>> {
    if is_blank_document(s) {
        return Ok(None);
    }
    let file: Option<PolicyFile> = serde_yaml::from_str(s)
        .map_err(|e| CasError::Config(format!("invalid policy yaml: {e}")))?;
    Ok(file
        .unwrap_or_default()
        .config
        .app
        .default_drm_id
        .map(DrmIdValue::into_string))
}

fn is_blank_document(s: &str) -> bool {
    s.lines().all(|l| {
        let l = l.trim();
        l.is_empty() || l.starts_with('#') || l == "---"
    })
}
