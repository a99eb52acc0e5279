//! One-file-per-request sink.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::http::request::RequestId;
use crate::output::{Sink, SinkError};

/// `strftime` pattern for the file name prefix (second resolution).
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Writes each dump to `<dir>/<timestamp>_<request id>.log`.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Use `dir`, which must already exist and be a directory.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        let meta = std::fs::metadata(&dir)?;
        if !meta.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", dir.display()),
            ));
        }
        Ok(Self { dir })
    }

    /// File name for a dump of `request_id` taken at `at`.
    pub fn file_name<Tz: TimeZone>(request_id: &RequestId, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!("{}_{}.log", at.format(TIMESTAMP_FORMAT), request_id)
    }

    pub fn path_for<Tz: TimeZone>(&self, request_id: &RequestId, at: &DateTime<Tz>) -> PathBuf
    where
        Tz::Offset: std::fmt::Display,
    {
        self.dir.join(Self::file_name(request_id, at))
    }

    async fn write_at(&self, path: &Path, dump: &[u8]) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(path).await?;
        file.write_all(dump).await?;
        file.flush().await
    }
}

impl Sink for FileSink {
    async fn write(&self, request_id: &RequestId, dump: &[u8]) -> Result<(), SinkError> {
        let path = self.path_for(request_id, &Local::now());
        match self.write_at(&path, dump).await {
            Ok(()) => Ok(()),
            Err(source) => Err(SinkError::File { path, source }),
        }
    }
}
