// src/logging_middleware.rs
//! Middleware for logging requests in debug mode
//!
//! Bodies and headers are not logged: they carry cookies and OAuth codes.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, info_span, Span};

/// Span for `TraceLayer`: records the path only, never the query string
/// (the OAuth callback carries `code` and `state` there).
pub fn make_request_span<B>(request: &axum::http::Request<B>) -> Span {
    info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// Log method, path, status and latency for every request
pub async fn log_request_response(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    debug!(method = %method, path = %path, "📥 Request");

    let response = next.run(request).await;

    debug!(
        method = %method,
        path = %path,
        status = %response.status(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "📤 Response"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_request_span_omits_query() {
        let request = axum::http::Request::builder()
            .uri("/login/google/callback?state=abc&code=secret")
            .body(Body::empty())
            .unwrap();

        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            let span = make_request_span(&request);
            let metadata = span.metadata().expect("span should be enabled");
            let fields = metadata.fields();

            assert!(fields.field("path").is_some());
            assert!(fields.field("method").is_some());
            assert!(fields.field("uri").is_none());
        });
    }
}
