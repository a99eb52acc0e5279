//! Line-oriented text accumulator.

use std::fmt::{self, Write as _};

/// Accumulates newline-terminated lines into one buffer.
///
/// Each request renders into its own buffer; the type takes `&mut self`
/// for every append and is not meant to be shared.
#[derive(Debug, Default, Clone)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a formatted line, e.g. `buf.line(format_args!("Method: {}", m))`.
    pub fn line(&mut self, args: fmt::Arguments<'_>) {
        // Writing into a Vec-backed adapter cannot fail.
        let _ = Adapter(&mut self.buf).write_fmt(args);
        self.buf.push(b'\n');
    }

    /// Append a literal line.
    pub fn push_str(&mut self, line: &str) {
        self.buf.extend_from_slice(line.as_bytes());
        self.buf.push(b'\n');
    }

    /// Append an empty line.
    pub fn blank(&mut self) {
        self.buf.push(b'\n');
    }

    /// Append a raw byte block followed by a newline.
    pub fn raw(&mut self, block: &[u8]) {
        self.buf.extend_from_slice(block);
        self.buf.push(b'\n');
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// The accumulated content as text; raw blocks that are not UTF-8 are
    /// rendered lossily.
    pub fn into_text(self) -> String {
        match String::from_utf8(self.buf) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }
}

struct Adapter<'a>(&'a mut Vec<u8>);

impl fmt::Write for Adapter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}
