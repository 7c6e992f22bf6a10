//! Request instrumentation middleware.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::observability::metrics;

/// Count the request and time it, labelled by route template and method.
///
/// Requests that matched no route are passed through unobserved, which keeps
/// the path label bounded. The response is never modified.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let Some(path) = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
    else {
        return next.run(request).await;
    };
    let method = request.method().to_string();

    let response = next.run(request).await;

    metrics::record_request(&path, &method, started);
    response
}
