//! Bearer token claims.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claims the gateway reads from a verified token. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Legacy issuers put the caller in `user_id`, as a number or a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,
    /// Expiry, seconds since the epoch.
    pub exp: u64,
}

impl Claims {
    /// Caller identity: `sub` when present, otherwise `user_id`.
    pub fn subject(&self) -> Option<String> {
        if let Some(sub) = &self.sub {
            return Some(sub.clone());
        }
        match self.user_id.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn subject_prefers_sub() {
        let c = Claims {
            sub: Some("alice".into()),
            user_id: Some(json!(123)),
            exp: 0,
        };
        assert_eq!(c.subject().as_deref(), Some("alice"));
    }

    #[test]
    fn numeric_user_id_is_rendered() {
        let c = Claims {
            sub: None,
            user_id: Some(json!(123)),
            exp: 0,
        };
        assert_eq!(c.subject().as_deref(), Some("123"));
    }

    #[test]
    fn structured_user_id_has_no_subject() {
        let c = Claims {
            sub: None,
            user_id: Some(json!({"id": 1})),
            exp: 0,
        };
        assert_eq!(c.subject(), None);
    }
}
