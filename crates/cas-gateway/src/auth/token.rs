//! HS256 token verification.
//!
//! Signature, structure, and expiry failures all collapse to
//! `CasError::Unauthenticated`; callers cannot tell an expired token from a
//! forged one.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use cas_core::error::{CasError, Result};
use cas_core::Claims;

#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Process-wide verifier for `secret`.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_leeway(secret, 0)
    }

    /// Same as `new` with `leeway` seconds of clock skew allowed on `exp`.
    pub fn with_leeway(secret: &[u8], leeway: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn verify(&self, raw: &str) -> Result<Claims> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CasError::Unauthenticated);
        }
        decode::<Claims>(raw, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "token rejected");
                CasError::Unauthenticated
            })
    }
}
