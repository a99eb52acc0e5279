//! Per-request context and correlation IDs.
//!
//! # Design Decisions
//! - The ID is generated by grace, never taken from the client, because it
//!   ends up in file names
//! - Context travels in request extensions; nothing is looked up globally

use std::fmt;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Response header echoing the correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Opaque per-request correlation ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// A fresh UUID v4.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Request-scoped values shared by every stage after ID injection.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
}

impl RequestContext {
    pub fn new(request_id: RequestId) -> Self {
        Self { request_id }
    }
}

/// Access to the [`RequestContext`] of a request.
pub trait RequestIdExt {
    fn context(&self) -> Option<&RequestContext>;

    fn request_id(&self) -> Option<&RequestId> {
        self.context().map(|ctx| &ctx.request_id)
    }
}

impl<B> RequestIdExt for axum::http::Request<B> {
    fn context(&self) -> Option<&RequestContext> {
        self.extensions().get::<RequestContext>()
    }
}

/// Middleware attaching a fresh [`RequestContext`] to every request.
pub async fn inject_request_id(mut req: Request, next: Next) -> Response {
    let request_id = RequestId::generate();
    req.extensions_mut()
        .insert(RequestContext::new(request_id.clone()));

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware::from_fn, routing::get, Router};
    use tower::ServiceExt;

    #[test]
    fn generated_ids_are_unique_uuids() {
        let a = RequestId::generate();
        let b = RequestId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[tokio::test]
    async fn client_supplied_ids_are_ignored() {
        let app = Router::new()
            .route(
                "/",
                get(|req: Request| async move {
                    req.request_id().map(ToString::to_string).unwrap_or_default()
                }),
            )
            .layer(from_fn(inject_request_id));

        let response = app
            .oneshot(
                axum::http::Request::get("/")
                    .header("x-request-id", "../../etc/passwd")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let echoed = response.headers()[X_REQUEST_ID].to_str().unwrap().to_string();
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();

        assert_eq!(body, echoed.as_bytes());
        assert!(Uuid::parse_str(&echoed).is_ok());
    }
}
