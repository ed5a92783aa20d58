//! Operational endpoints, public and outside the resource prefix.
//!
//! `/metrics` appends the live policy to the gateway counters: an info row
//! labelled with the required DRM id and the reload outcomes, so a scrape
//! shows which policy answered the verdicts next to it.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;
use crate::obs::metrics::escape_label;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// 503 once shutdown has begun so balancers stop routing here.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_draining() {
        (StatusCode::SERVICE_UNAVAILABLE, "draining")
    } else {
        (StatusCode::OK, "ready")
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let rows = policy_rows(&state);
    let extra: Vec<(&str, u64)> = rows.iter().map(|(k, v)| (k.as_str(), *v)).collect();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.metrics().render(&extra),
    )
        .into_response()
}

fn policy_rows(state: &AppState) -> Vec<(String, u64)> {
    let store = state.policy();
    let current = store.current();
    let (ok, failed) = store.reload_counts();
    vec![
        (
            format!(
                "cas_policy_info{{drm_id=\"{}\"}}",
                escape_label(current.required_drm_id())
            ),
            1,
        ),
        ("cas_policy_reloads_total{result=\"ok\"}".to_string(), ok),
        ("cas_policy_reloads_total{result=\"error\"}".to_string(), failed),
    ]
}
