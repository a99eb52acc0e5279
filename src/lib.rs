//! grace: a diagnostic HTTP server that dumps every request it receives.

pub mod config;
pub mod dump;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod output;

pub use config::GraceConfig;
pub use http::HttpServer;
pub use output::{Output, Sink};
