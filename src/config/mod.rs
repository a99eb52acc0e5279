//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! grace.toml (optional)          command line / env
//!     → loader.rs (parse)            → cli.rs (clap)
//!                 \                 /
//!                  GraceConfig (flags override file values)
//!     → validation.rs (semantic checks, all errors at once)
//!     → immutable for the life of the process
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so grace runs with no arguments at all
//! - The output directory is checked before anything binds a socket

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use loader::{read_config, ConfigError};
pub use schema::{GraceConfig, LimitsConfig, ListenerConfig, LoggingConfig, OutputConfig, OutputMode};
pub use validation::{validate_config, ValidationError};
