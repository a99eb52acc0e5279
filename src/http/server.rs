//! HTTP server setup.
//!
//! # Responsibilities
//! - Own the router (no process-wide routing state)
//! - Wire the middleware chain around the receive handler
//! - Serve a listener until a shutdown signal arrives

use std::future::Future;

use axum::{middleware::from_fn, routing::any, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;

use crate::config::GraceConfig;
use crate::dump::RequestFormatter;
use crate::http::access_log::access_log;
use crate::http::handler::{receive, AppState};
use crate::http::panic;
use crate::http::request::inject_request_id;
use crate::lifecycle::signals::shutdown_signal;
use crate::output::Output;

/// HTTP server dumping every request it receives.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server writing dumps to `output`.
    pub fn new(config: &GraceConfig, output: Output) -> Self {
        let state = AppState::new(RequestFormatter::new(config.limits.max_body_bytes), output);
        Self {
            router: Self::build_router(state),
        }
    }

    /// Catch-all route for every method and path, wrapped in the middleware
    /// chain.
    pub fn build_router(state: AppState) -> Router {
        let routes = Router::new()
            .route("/", any(receive))
            .route("/{*path}", any(receive))
            .with_state(state);
        with_middleware(routes)
    }

    /// Serve until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Serve until `signal` completes, then drain in-flight requests.
    pub async fn run_until<F>(self, listener: TcpListener, signal: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signal)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wrap `router` in the request chain, outermost first: panic isolation,
/// correlation ID, access log.
pub fn with_middleware(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(panic::layer())
            .layer(from_fn(inject_request_id))
            .layer(from_fn(access_log)),
    )
}
