//! Configuration validation.
//!
//! Serde handles syntax; this module checks what serde cannot: the output
//! directory actually exists and the log filter parses. Every problem is
//! reported, not just the first.

use std::path::PathBuf;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::{GraceConfig, OutputMode};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.host must not be empty")]
    EmptyHost,

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("output.dir {} does not exist or is not accessible", .0.display())]
    MissingDir(PathBuf),

    #[error("output.dir {} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("logging.filter {0:?} is not a valid filter")]
    InvalidLogFilter(String),
}

pub fn validate_config(config: &GraceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.output.mode == OutputMode::File {
        match std::fs::metadata(&config.output.dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => errors.push(ValidationError::NotADirectory(config.output.dir.clone())),
            Err(_) => errors.push(ValidationError::MissingDir(config.output.dir.clone())),
        }
    }

    if EnvFilter::try_new(&config.logging.filter).is_err() {
        errors.push(ValidationError::InvalidLogFilter(config.logging.filter.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
