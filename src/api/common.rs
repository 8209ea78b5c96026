use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Body returned on proxy-level failures.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `{"error": <message>}` with status 500.
pub fn internal_error(message: impl Into<String>) -> Response {
    let message = message.into();
    let error = if message.is_empty() {
        "Internal server error".to_string()
    } else {
        message
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { error })).into_response()
}

pub async fn request_logger(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = std::time::Instant::now();
    let response = next.run(req).await;
    let duration = start.elapsed();
    tracing::info!(
        "{} {} - status: {}, latency: {}ms",
        method,
        uri,
        response.status(),
        duration.as_millis()
    );
    response
}
