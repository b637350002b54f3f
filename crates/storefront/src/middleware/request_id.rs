//! Request ID middleware.
//!
//! Every request gets a correlation id: the upstream proxy's
//! `x-request-id` when it sent one, a fresh UUID v4 otherwise. The id is
//! recorded on the tracing span, tagged onto the Sentry scope, and echoed
//! in the response so shoppers can quote it in support tickets.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Attach a correlation id to the request's span, Sentry scope, and
/// response headers.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = match request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
    {
        Some(upstream) => upstream.to_string(),
        None => Uuid::new_v4().to_string(),
    };

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
