//! Bearer token extraction and the guard for protected routes.
//!
//! Lookup order: `Authorization: Bearer <token>` (scheme is
//! case-insensitive), then the `jwt` cookie.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;

const JWT_COOKIE: &str = "jwt";

pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    from_authorization(headers).or_else(|| from_cookie(headers))
}

fn from_authorization(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn from_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == JWT_COOKIE && !value.is_empty())
        .map(|(_, value)| value)
}

/// Rejects the request with 401 unless it carries a valid token. On success
/// the verified `Claims` are stored in the request extensions.
pub async fn require_bearer(State(app): State<AppState>, mut req: Request, next: Next) -> Response {
    let verified = token_from_headers(req.headers())
        .ok_or(cas_core::CasError::Unauthenticated)
        .and_then(|raw| app.verifier().verify(raw));

    match verified {
        Ok(claims) => {
            tracing::debug!(subject = ?claims.subject(), "bearer accepted");
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(_) => {
            app.metrics().token_rejected();
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}
