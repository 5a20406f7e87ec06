//! HTTP transport for the façade.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /health` returns `{ "ok": true, "resources": [...] }`.
//! - `POST /batch` runs a list of `BatchRequest`s.
//! - `POST /search` runs a `SearchRequest`.
//! - any method on `/*path` dispatches through [`Api::request`]. The body is
//!   JSON; an empty body means no body.
//!
//! The façade is synchronous. Configured latency and the collection locks
//! block the calling thread, so every dispatch runs on tokio's blocking pool.
//!
//! ## Example
//!
//! ```ignore
//! let api = Arc::new(foundation_backend::app::open(&config)?);
//! foundation_backend::api::serve(api, "127.0.0.1:3000").await?;
//! ```

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{OriginalUri, State};
use axum::http::{Method as HttpMethod, StatusCode};
use axum::response::{IntoResponse, Response as HttpResponse};
use axum::routing::{any, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::error::ApiError;
use super::service::{Api, BatchRequest, Method, SearchRequest};
use crate::store::Store;

/// Build an axum `Router` that dispatches requests through the given façade.
pub fn router<S: Store + 'static>(api: Arc<Api<S>>) -> Router {
    Router::new()
        .route("/health", get(health_handler::<S>))
        .route("/batch", post(batch_handler::<S>))
        .route("/search", post(search_handler::<S>))
        .route("/*path", any(request_handler::<S>))
        .with_state(api)
}

/// Serve the façade over HTTP at the given address (e.g. `"127.0.0.1:3000"`).
pub async fn serve<S: Store + 'static>(api: Arc<Api<S>>, addr: &str) -> Result<(), std::io::Error> {
    let app = router(api);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await
}

async fn health_handler<S: Store + 'static>(State(api): State<Arc<Api<S>>>) -> impl IntoResponse {
    Json(json!({ "ok": true, "resources": api.resources() }))
}

async fn batch_handler<S: Store + 'static>(
    State(api): State<Arc<Api<S>>>,
    Json(requests): Json<Vec<BatchRequest>>,
) -> HttpResponse {
    match blocking(move || Ok(api.batch(&requests))).await {
        Ok(results) => Json(results).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn search_handler<S: Store + 'static>(
    State(api): State<Arc<Api<S>>>,
    Json(request): Json<SearchRequest>,
) -> HttpResponse {
    match blocking(move || api.search(&request)).await {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn request_handler<S: Store + 'static>(
    State(api): State<Arc<Api<S>>>,
    method: HttpMethod,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> HttpResponse {
    let method = match method.as_str().parse::<Method>() {
        Ok(method) => method,
        Err(e) => return error_response(&e),
    };
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Some(value),
            Err(e) => return error_response(&ApiError::BadRequest(e.to_string())),
        }
    };
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path())
        .to_string();

    match blocking(move || api.request(method, &path, body)).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Run a façade call on the blocking pool so it never stalls the runtime.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "request task failed");
        Err(ApiError::Internal(e.to_string()))
    })
}

fn error_response(e: &ApiError) -> HttpResponse {
    let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = json!({ "error": e.kind(), "message": e.to_string() });
    (status, Json(body)).into_response()
}
