//! Shared-stream sink.

use std::io::{self, Write};

use crate::http::request::RequestId;
use crate::observability::SharedWriter;
use crate::output::{Sink, SinkError};

/// Writes dumps to one shared stream.
///
/// Each dump is written and flushed while holding the writer's lock, so
/// concurrent requests never interleave inside a dump. The stdout sink shares
/// that lock with the log subscriber.
#[derive(Clone, Debug)]
pub struct StreamSink {
    out: SharedWriter,
}

impl StreamSink {
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self::from(SharedWriter::new(writer))
    }

    /// Sink for the process's standard output.
    pub fn stdout() -> Self {
        Self::from(SharedWriter::stdout())
    }
}

impl From<SharedWriter> for StreamSink {
    fn from(out: SharedWriter) -> Self {
        Self { out }
    }
}

impl Sink for StreamSink {
    async fn write(&self, _request_id: &RequestId, dump: &[u8]) -> Result<(), SinkError> {
        let out = self.out.clone();
        let dump = dump.to_vec();
        tokio::task::spawn_blocking(move || out.write_block(&dump))
            .await
            .map_err(|e| SinkError::Stream(io::Error::other(e)))?
            .map_err(SinkError::Stream)
    }
}
