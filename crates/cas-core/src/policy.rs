//! Authorization policy and encoding selection.
//!
//! A `Policy` is an immutable snapshot. Reloading builds a new value and the
//! gateway publishes it whole, so a decision never sees half of one policy and
//! half of another.

use crate::error::{CasError, Result};
use crate::media::Encoding;

/// DRM id required when the policy source does not name one.
pub const DEFAULT_DRM_ID: &str = "6";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    required_drm_id: String,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            required_drm_id: DEFAULT_DRM_ID.to_string(),
        }
    }
}

impl Policy {
    /// Build a policy; the DRM id must contain a non-whitespace character.
    pub fn new(required_drm_id: impl Into<String>) -> Result<Self> {
        let required_drm_id = required_drm_id.into().trim().to_string();
        if required_drm_id.is_empty() {
            return Err(CasError::Config("DEFAULT_DRM_ID must not be empty".into()));
        }
        Ok(Self { required_drm_id })
    }

    pub fn required_drm_id(&self) -> &str {
        &self.required_drm_id
    }

    /// Whether a single encoding satisfies this policy.
    pub fn admits(&self, enc: &Encoding) -> bool {
        enc.drm_id() == Some(self.required_drm_id.as_str())
    }

    /// Order-preserving subsequence of admitted encodings.
    pub fn filter(&self, encodings: &[Encoding]) -> Vec<Encoding> {
        encodings.iter().filter(|e| self.admits(e)).cloned().collect()
    }

    /// First admitted encoding in catalog order.
    ///
    /// No ranking by status, recency, or channel is applied.
    pub fn select<'a>(&self, encodings: &'a [Encoding]) -> Option<&'a Encoding> {
        let hit = encodings.iter().find(|e| self.admits(e));
        tracing::trace!(
            drm_id = %self.required_drm_id,
            candidates = encodings.len(),
            matched = hit.is_some(),
            "encoding selection"
        );
        hit
    }
}
