//! A stdout handle shared by log lines and stream dumps.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

/// Cloneable handle to one mutex-guarded writer.
///
/// The `tracing` fmt layer writes each formatted event with a single
/// `write_all` through [`MakeWriter`], and dumps go through
/// [`SharedWriter::write_block`]. Both hold the same lock, so a log line can
/// never land inside a dump.
#[derive(Clone)]
pub struct SharedWriter {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl SharedWriter {
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// The process-wide handle for standard output.
    pub fn stdout() -> Self {
        static STDOUT: OnceLock<SharedWriter> = OnceLock::new();
        STDOUT.get_or_init(|| SharedWriter::new(io::stdout())).clone()
    }

    pub fn lock(&self) -> SharedWriterGuard<'_> {
        // A panic mid-write leaves at worst a partial block behind.
        SharedWriterGuard(self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Write and flush `block` without letting any other writer in between.
    pub fn write_block(&self, block: &[u8]) -> io::Result<()> {
        let mut out = self.lock();
        out.write_all(block)?;
        out.flush()
    }
}

impl fmt::Debug for SharedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedWriter").finish_non_exhaustive()
    }
}

/// Exclusive access to a [`SharedWriter`] until dropped.
pub struct SharedWriterGuard<'a>(MutexGuard<'a, Box<dyn Write + Send>>);

impl Write for SharedWriterGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedWriter {
    type Writer = SharedWriterGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        self.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdout_handles_share_one_lock() {
        let a = SharedWriter::stdout();
        let b = SharedWriter::stdout();
        assert!(Arc::ptr_eq(&a.inner, &b.inner));
    }

    #[test]
    fn write_block_reaches_the_inner_writer() {
        #[derive(Clone, Default)]
        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl Write for Capture {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let capture = Capture::default();
        let shared = SharedWriter::new(capture.clone());
        shared.write_block(b"first\n").unwrap();
        shared.lock().write_all(b"second\n").unwrap();
        assert_eq!(capture.0.lock().unwrap().as_slice(), b"first\nsecond\n");
    }
}
