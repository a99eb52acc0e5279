//! The receive handler: status, dump, sink.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    Extension,
};

use crate::dump::RequestFormatter;
use crate::http::request::RequestContext;
use crate::output::{Output, Sink};

/// Application state injected into the handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub formatter: RequestFormatter,
    pub output: Arc<Output>,
}

impl AppState {
    pub fn new(formatter: RequestFormatter, output: Output) -> Self {
        Self {
            formatter,
            output: Arc::new(output),
        }
    }
}

/// 201 for POST, 200 for everything else.
pub fn status_for(method: &Method) -> StatusCode {
    if *method == Method::POST {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    }
}

/// Dump the request to the configured output.
///
/// Sink failures are logged; the status is decided before the dump is
/// written and never changes afterwards.
pub async fn receive(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    request: Request,
) -> StatusCode {
    let status = status_for(request.method());

    let dump = state.formatter.render(&ctx.request_id, request).await;
    if let Err(e) = state.output.write(&ctx.request_id, dump.as_bytes()).await {
        tracing::error!(
            request_id = %ctx.request_id,
            error_kind = ?e.kind(),
            error = %e,
            "write error"
        );
    }

    status
}
