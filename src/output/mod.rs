//! Output sinks for rendered dumps.
//!
//! # Data Flow
//! ```text
//! OutputConfig (startup)
//!     → Output::from_config (directory checked here, fail fast)
//!     → Arc<Output> shared by every request
//!     → Sink::write(request id, dump bytes), once per request
//!         → stream.rs: one locked write to the shared stream
//!         → file.rs:   <YYYYMMDDHHMMSS>_<id>.log, mode 0600
//! ```

pub mod file;
pub mod stream;

use std::future::Future;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::{ConfigError, OutputConfig, OutputMode};
use crate::http::request::RequestId;

pub use file::FileSink;
pub use stream::StreamSink;

/// Error writing a dump.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("write to output stream failed: {0}")]
    Stream(#[source] io::Error),

    #[error("write to {} failed: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SinkError {
    /// Kind of the underlying I/O failure.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            SinkError::Stream(e) => e.kind(),
            SinkError::File { source, .. } => source.kind(),
        }
    }
}

/// Somewhere a complete dump can be written.
pub trait Sink: Send + Sync {
    /// Write one fully rendered dump.
    fn write(
        &self,
        request_id: &RequestId,
        dump: &[u8],
    ) -> impl Future<Output = Result<(), SinkError>> + Send;
}

/// The sink selected at startup.
#[derive(Debug, Clone)]
pub enum Output {
    Stream(StreamSink),
    File(FileSink),
}

impl Output {
    /// Resolve the configured output. In file mode the directory must exist.
    pub fn from_config(config: &OutputConfig) -> Result<Self, ConfigError> {
        match config.mode {
            OutputMode::Stdout => Ok(Output::Stream(StreamSink::stdout())),
            OutputMode::File => FileSink::open(&config.dir)
                .map(Output::File)
                .map_err(|source| ConfigError::OutputDir {
                    path: config.dir.clone(),
                    source,
                }),
        }
    }
}

impl From<StreamSink> for Output {
    fn from(sink: StreamSink) -> Self {
        Output::Stream(sink)
    }
}

impl From<FileSink> for Output {
    fn from(sink: FileSink) -> Self {
        Output::File(sink)
    }
}

impl Sink for Output {
    async fn write(&self, request_id: &RequestId, dump: &[u8]) -> Result<(), SinkError> {
        match self {
            Output::Stream(sink) => sink.write(request_id, dump).await,
            Output::File(sink) => sink.write(request_id, dump).await,
        }
    }
}
