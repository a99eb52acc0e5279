//! Structured logging.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::observability::SharedWriter;

/// Install the global subscriber: `fmt` to the shared stdout handle, filtered
/// by `config.filter`.
///
/// Calling this twice is harmless; the second subscriber is dropped.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(&config.filter)
        .unwrap_or_else(|_| EnvFilter::new(LoggingConfig::default().filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(SharedWriter::stdout()))
        .try_init();
}
