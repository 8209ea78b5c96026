//! Single-hop forwarding for the claims backend.
//!
//! Relays `GET`/`POST /api/claims/*path` to the configured backend and echoes
//! the backend's JSON body and status code unchanged. No retry, no caching,
//! no body inspection.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use std::sync::Arc;

use super::common;
use crate::state::AppState;

pub async fn forward_get(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Response {
    let url = state.config.claims_url(&path);
    let mut req = state
        .upstream
        .get(&url)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = headers.get(header::AUTHORIZATION) {
        req = req.header(header::AUTHORIZATION, auth.clone());
    }
    relay(req).await
}

/// POST bodies are multipart uploads. The raw bytes and the inbound
/// Content-Type (which carries the multipart boundary) are forwarded
/// untouched so the backend sees exactly what the client sent.
pub async fn forward_post(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let url = state.config.claims_url(&path);
    let mut req = state.upstream.post(&url).body(body);
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        req = req.header(header::CONTENT_TYPE, content_type.clone());
    }
    if let Some(auth) = headers.get(header::AUTHORIZATION) {
        req = req.header(header::AUTHORIZATION, auth.clone());
    }
    relay(req).await
}

/// Sends the outbound request and mirrors the backend's JSON body and status
/// to the caller. Any send or decode failure becomes a 500 with a JSON error
/// body.
async fn relay(req: reqwest::RequestBuilder) -> Response {
    match exchange(req).await {
        Ok((status, body)) => (status, Json(body)).into_response(),
        Err(e) => {
            tracing::error!("Claims forwarding failed: {}", e);
            common::internal_error(e.to_string())
        }
    }
}

async fn exchange(
    req: reqwest::RequestBuilder,
) -> Result<(StatusCode, serde_json::Value), reqwest::Error> {
    let resp = req.send().await?;
    let status = StatusCode::from_u16(resp.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = resp.json::<serde_json::Value>().await?;
    Ok((status, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::routing::{get, post};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn gateway(origin: &str) -> Router {
        let config = GatewayConfig::new(origin).unwrap();
        let store = Box::new(crate::storage::MemoryStore::new());
        crate::api::build_routes(Arc::new(AppState::new(config, store)))
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn joins_wildcard_segments_into_backend_path() {
        let backend = Router::new().route(
            "/api/claims/*rest",
            get(|Path(rest): Path<String>| async move { Json(json!({ "path": rest })) }),
        );
        let origin = spawn_backend(backend).await;

        let resp = gateway(&origin)
            .oneshot(Request::get("/api/claims/a/b").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({ "path": "a/b" }));
    }

    #[tokio::test]
    async fn passes_authorization_header_through() {
        let backend = Router::new().route(
            "/api/claims/*rest",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get(header::AUTHORIZATION)
                    .map(|v| v.to_str().unwrap().to_string());
                Json(json!({ "auth": auth }))
            }),
        );
        let origin = spawn_backend(backend).await;

        let resp = gateway(&origin)
            .oneshot(
                Request::get("/api/claims/status")
                    .header(header::AUTHORIZATION, "Bearer X")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(resp).await, json!({ "auth": "Bearer X" }));

        // Without an inbound Authorization header none is forwarded.
        let resp = gateway(&origin)
            .oneshot(
                Request::get("/api/claims/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(resp).await, json!({ "auth": null }));
    }

    #[tokio::test]
    async fn get_is_forwarded_as_json_with_empty_body() {
        let backend = Router::new().route(
            "/api/claims/*rest",
            get(|headers: HeaderMap, body: Bytes| async move {
                Json(json!({
                    "content_type": headers
                        .get(header::CONTENT_TYPE)
                        .map(|v| v.to_str().unwrap().to_string()),
                    "body_len": body.len(),
                }))
            }),
        );
        let origin = spawn_backend(backend).await;

        let resp = gateway(&origin)
            .oneshot(Request::get("/api/claims/list").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(
            body_json(resp).await,
            json!({ "content_type": "application/json", "body_len": 0 })
        );
    }

    #[tokio::test]
    async fn post_forwards_multipart_body_verbatim() {
        let payload = "--boundary\r\nContent-Disposition: form-data; name=\"file\"; \
                       filename=\"crop.jpg\"\r\n\r\nJPEGDATA\r\n--boundary--\r\n";
        let backend = Router::new().route(
            "/api/claims/*rest",
            post(|headers: HeaderMap, body: Bytes| async move {
                Json(json!({
                    "content_type": headers
                        .get(header::CONTENT_TYPE)
                        .map(|v| v.to_str().unwrap().to_string()),
                    "body": String::from_utf8(body.to_vec()).unwrap(),
                }))
            }),
        );
        let origin = spawn_backend(backend).await;

        let resp = gateway(&origin)
            .oneshot(
                Request::post("/api/claims/upload")
                    .header(
                        header::CONTENT_TYPE,
                        "multipart/form-data; boundary=boundary",
                    )
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            json!({
                "content_type": "multipart/form-data; boundary=boundary",
                "body": payload,
            })
        );
    }

    #[tokio::test]
    async fn forwards_uploads_larger_than_the_default_body_limit() {
        let backend = Router::new().route(
            "/api/claims/*rest",
            post(|body: Bytes| async move { Json(json!({ "body_len": body.len() })) })
                .layer(axum::extract::DefaultBodyLimit::disable()),
        );
        let origin = spawn_backend(backend).await;

        // Well past the 2 MB extractor default.
        let payload = vec![b'x'; 3 * 1024 * 1024];
        let len = payload.len();
        let resp = gateway(&origin)
            .oneshot(
                Request::post("/api/claims/upload")
                    .header(header::CONTENT_TYPE, "multipart/form-data; boundary=big")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({ "body_len": len }));
    }

    #[tokio::test]
    async fn mirrors_backend_status_and_body() {
        let backend = Router::new().route(
            "/api/claims/*rest",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))) }),
        );
        let origin = spawn_backend(backend).await;

        let resp = gateway(&origin)
            .oneshot(
                Request::get("/api/claims/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await, json!({ "error": "not found" }));
    }

    #[tokio::test]
    async fn unreachable_backend_yields_500_with_error_body() {
        // Nothing listens on the discard port.
        let resp = gateway("http://127.0.0.1:9")
            .oneshot(
                Request::get("/api/claims/anything")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert!(body.get("error").and_then(Value::as_str).is_some());
    }

    #[tokio::test]
    async fn non_json_backend_response_yields_500() {
        let backend = Router::new().route("/api/claims/*rest", get(|| async { "plain text" }));
        let origin = spawn_backend(backend).await;

        let resp = gateway(&origin)
            .oneshot(Request::get("/api/claims/text").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_json(resp).await.get("error").is_some());
    }
}
