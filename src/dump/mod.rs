//! Request dump rendering.
//!
//! # Data Flow
//! ```text
//! Request<Body> + RequestId
//!     → format.rs (header/form/body sections, content-type aware)
//!     → json.rs (whitespace-only re-indent of JSON bodies)
//!     → lines.rs (line accumulation)
//!     → Dump (fully materialised bytes)
//!     → output sink
//! ```
//!
//! # Design Decisions
//! - Rendering never fails; malformed input degrades into the dump itself
//! - Only text and JSON bodies are read; everything else is left untouched

pub mod format;
pub mod json;
pub mod lines;

pub use format::{media_type, Dump, FormFields, RequestFormatter, SEPARATOR};
pub use lines::LineBuffer;
