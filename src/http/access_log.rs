//! Access logging middleware.

use std::time::Instant;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};

use crate::http::request::RequestIdExt;

/// Logs one line per request once the inner chain has produced a response.
pub async fn access_log(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = req
        .request_id()
        .map(ToString::to_string)
        .unwrap_or_default();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default();

    let response = next.run(req).await;

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        user_agent = ?user_agent,
        status = response.status().as_u16(),
        elapsed = ?start.elapsed(),
        "request"
    );

    response
}
