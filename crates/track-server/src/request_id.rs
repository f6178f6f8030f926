//! Request ID middleware for correlating generation requests with their logs.
//!
//! Every request runs inside a tracing span carrying an ID, which is echoed
//! back in the X-Request-ID response header.

use std::time::Instant;

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for request ID.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest client-supplied ID that is kept as-is.
const MAX_CLIENT_ID_LEN: usize = 128;

/// Middleware that tags each request with an ID in its span and response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response<Body> {
    let request_id = resolve_request_id(request.headers());

    let span = tracing::info_span!(
        "request",
        request_id = request_id.to_str().unwrap_or("-"),
        method = %request.method(),
        uri = %request.uri(),
    );

    async move {
        tracing::info!("Request started");
        let started = Instant::now();

        let mut response = next.run(request).await;
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), request_id);

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info!(
            status = response.status().as_u16(),
            content_type,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );

        response
    }
    .instrument(span)
    .await
}

/// Reuses the client's ID when it is short printable ASCII, otherwise mints a
/// fresh UUID.
fn resolve_request_id(headers: &HeaderMap) -> HeaderValue {
    headers
        .get(&REQUEST_ID_HEADER)
        .filter(|v| !v.is_empty() && v.len() <= MAX_CLIENT_ID_LEN)
        .filter(|v| v.as_bytes().iter().all(|b| b.is_ascii_graphic()))
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER.clone(), HeaderValue::from_str(id).unwrap());
        headers
    }

    #[test]
    fn test_client_id_kept() {
        assert_eq!(resolve_request_id(&headers_with("run-42")), "run-42");
    }

    #[test]
    fn test_missing_id_is_uuid() {
        let id = resolve_request_id(&HeaderMap::new());
        assert!(Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_unusable_client_ids_replaced() {
        let too_long = "x".repeat(MAX_CLIENT_ID_LEN + 1);

        for id in ["", "has space", too_long.as_str()] {
            let resolved = resolve_request_id(&headers_with(id));
            assert!(
                Uuid::parse_str(resolved.to_str().unwrap()).is_ok(),
                "{id:?} was kept"
            );
        }
    }
}
