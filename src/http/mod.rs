//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (axum::serve)
//!     → panic.rs       (catch_panic boundary, 500 on panic)
//!     → request.rs     (fresh RequestContext in extensions)
//!     → access_log.rs  (timing, one log line per request)
//!     → handler.rs     (status, dump, sink)
//! ```

pub mod access_log;
pub mod handler;
pub mod panic;
pub mod request;
pub mod server;

pub use handler::AppState;
pub use request::{RequestContext, RequestId, RequestIdExt, X_REQUEST_ID};
pub use server::{with_middleware, HttpServer};
