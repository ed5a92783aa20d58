//! Axum router wiring.
//!
//! Public: `/`, `/healthz`, `/readyz`, `/metrics`.
//! Protected (bearer): everything under the configured resource prefix.

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{app_state::AppState, auth, ops, transport::http};

pub fn build_router(state: AppState) -> Router {
    let resource = state.cfg().resource.clone();

    let protected = Router::new()
        .route(&resource, get(http::missing_content_id))
        .route(&format!("{resource}/"), get(http::missing_content_id))
        .route(&format!("{resource}/:content_id"), get(http::authorize))
        .route(&format!("{resource}/:content_id/"), get(http::authorize))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .route("/", get(http::index))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
