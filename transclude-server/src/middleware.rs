//! Response middleware: rewrites HTML bodies through the engine.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::router::AppState;

/// Buffer the downstream response and run it through the engine.
///
/// Passes through untouched: excluded URLs, non-HTML responses and bodies
/// that are not UTF-8. Any engine failure becomes a `500 text/plain`
/// carrying the error message; a partially rendered body is never sent.
pub async fn transclude_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let uri = request.uri().clone();
    let url = uri.path_and_query().map_or(uri.path(), |pq| pq.as_str());
    if state.engine.is_excluded(url) {
        return next.run(request).await;
    }
    let scope = state.engine.scope_for(uri.path(), uri.query());

    let response = next.run(request).await;
    if !is_html(&response) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let limit = state.engine.config().max_body_bytes;
    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(url = %url, error = %err, "failed to buffer response body");
            return failure(format!("failed to buffer response body: {err}"));
        }
    };
    let text = match String::from_utf8(bytes.to_vec()) {
        Ok(text) => text,
        Err(_) => return Response::from_parts(parts, Body::from(bytes)),
    };

    let engine = Arc::clone(&state.engine);
    let rendered = tokio::task::spawn_blocking(move || engine.process(&text, &scope)).await;
    match rendered {
        Ok(Ok(out)) => {
            parts
                .headers
                .insert(CONTENT_LENGTH, HeaderValue::from(out.len()));
            Response::from_parts(parts, Body::from(out))
        }
        Ok(Err(err)) => {
            tracing::error!(url = %url, error = %err, "transclusion failed");
            failure(err.to_string())
        }
        Err(err) => {
            tracing::error!(url = %url, error = %err, "render task aborted");
            failure(err.to_string())
        }
    }
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().to_ascii_lowercase().starts_with("text/html"))
}

fn failure(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        message,
    )
        .into_response()
}
