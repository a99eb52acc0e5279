//! Observability subsystem.
//!
//! Access log lines and panic traces are `tracing` events. Request dumps are
//! not; they go through the output sink. When both end up on stdout they
//! share one [`writer::SharedWriter`], so neither splits the other.

pub mod logging;
pub mod writer;

pub use writer::SharedWriter;
