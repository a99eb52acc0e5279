//! grace (v0.1)
//!
//! A diagnostic HTTP server. Every request, whatever its method or path, is
//! answered with an empty 201 (POST) or 200 and rendered into a readable
//! dump on stdout or into one file per request.
//!
//! ```text
//!   Client ──▶ panic isolation ──▶ request id ──▶ access log ──▶ receive
//!                                                                  │
//!                                        RequestFormatter ◀────────┘
//!                                               │
//!                                               ▼
//!                                  Output (stdout | <dir>/<ts>_<id>.log)
//! ```

use std::process::ExitCode;

use clap::Parser;

use grace::config::Cli;
use grace::lifecycle;
use grace::observability::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("grace: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.logging);

    if let Err(e) = lifecycle::start(config).await {
        tracing::error!(error = %e, "grace stopped");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
