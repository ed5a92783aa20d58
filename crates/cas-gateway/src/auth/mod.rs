//! Bearer authentication.
//!
//! `token` verifies HS256 tokens; `bearer` pulls the raw token from a request
//! and guards the protected routes.

pub mod bearer;
pub mod token;

pub use bearer::{require_bearer, token_from_headers};
pub use token::TokenVerifier;
