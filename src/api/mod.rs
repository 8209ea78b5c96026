use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;

mod claims;
pub mod common;

pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Claims proxy. Uploads can be arbitrarily large photo payloads, so
        // the default extractor body limit is lifted for this route.
        .route(
            "/api/claims/*path",
            get(claims::forward_get)
                .post(claims::forward_post)
                .layer(DefaultBodyLimit::disable()),
        )
        // Health
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}
