//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Resolve output (fail fast) → Bind → Serve
//!
//! Signals (signals.rs):
//!     SIGINT → stop accepting → drain in-flight requests → exit
//! ```

pub mod signals;
pub mod startup;

pub use startup::{start, StartupError};
