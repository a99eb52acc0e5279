//! Startup orchestration.
//!
//! Order matters: the output is resolved before the listener is bound, so a
//! bad output directory stops the process before it accepts a connection.

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, GraceConfig};
use crate::http::HttpServer;
use crate::output::Output;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Resolve the output and bind the listener without serving yet.
pub async fn prepare(config: &GraceConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    let output = Output::from_config(&config.output)?;

    let address = config.listener.address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    Ok((HttpServer::new(config, output), listener))
}

/// Run grace with a validated configuration until Ctrl+C.
pub async fn start(config: GraceConfig) -> Result<(), StartupError> {
    let (server, listener) = prepare(&config).await?;
    let local_addr = listener.local_addr().map_err(StartupError::Serve)?;

    tracing::info!(
        address = %local_addr,
        output = ?config.output.mode,
        dir = %config.output.dir.display(),
        "grace server start"
    );

    server.run(listener).await.map_err(StartupError::Serve)
}
