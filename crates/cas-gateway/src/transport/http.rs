//! Public and protected HTTP handlers.

use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use cas_core::{Denial, Verdict};

use crate::app_state::AppState;
use crate::config::DenialStatus;

pub const BANNER: &str = "Content Authorization Server!";

pub async fn index() -> impl IntoResponse {
    (StatusCode::OK, BANNER)
}

/// `/{resource}` without a content id.
pub async fn missing_content_id(State(app): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::BAD_REQUEST,
        format!(
            "Missing contentId, invoke {}/<contentId>",
            app.cfg().resource
        ),
    )
}

/// `/{resource}/{contentId}`: authorize and return the playback locator.
pub async fn authorize(State(app): State<AppState>, Path(content_id): Path<String>) -> Response {
    let Some(endpoint) = app.cfg().catalog_endpoint.as_deref() else {
        tracing::error!("catalog endpoint not configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "CONTENT_MANAGER_ENDPOINT is not defined in environment",
        )
            .into_response();
    };

    let started = Instant::now();
    let verdict = app.engine().authorize(&content_id, endpoint).await;
    app.metrics().observe_verdict(&verdict, started.elapsed());

    match verdict {
        Verdict::Authorized(enc) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("{} | {}", app.cfg().app_version, enc.uri),
        )
            .into_response(),
        Verdict::Denied(denial) => denial_response(denial, app.cfg().denial_status),
    }
}

pub fn denial_status(denial: Denial, mode: DenialStatus) -> StatusCode {
    match (mode, denial) {
        (DenialStatus::Uniform, _) => StatusCode::INTERNAL_SERVER_ERROR,
        (DenialStatus::Distinct, Denial::CatalogUnavailable) => StatusCode::BAD_GATEWAY,
        (DenialStatus::Distinct, Denial::NoMatchingEncodings) => StatusCode::NOT_FOUND,
    }
}

fn denial_response(denial: Denial, mode: DenialStatus) -> Response {
    (denial_status(denial, mode), Json(denial.body())).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_mode_is_always_500() {
        for d in [Denial::CatalogUnavailable, Denial::NoMatchingEncodings] {
            assert_eq!(denial_status(d, DenialStatus::Uniform), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn distinct_mode_separates_kinds() {
        assert_eq!(
            denial_status(Denial::CatalogUnavailable, DenialStatus::Distinct),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            denial_status(Denial::NoMatchingEncodings, DenialStatus::Distinct),
            StatusCode::NOT_FOUND
        );
    }
}
