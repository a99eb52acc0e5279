//! Configuration schema definitions.
//!
//! All types derive Serde traits so the same structure can be read from a
//! TOML file and then overridden from the command line.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dump::format::DEFAULT_MAX_BODY_BYTES;

/// Root configuration for grace.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GraceConfig {
    /// Where to listen.
    pub listener: ListenerConfig,

    /// Where dumps go.
    pub output: OutputConfig,

    /// Request body limits.
    pub limits: LimitsConfig,

    /// Log filter for access and panic logs.
    pub logging: LoggingConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Listen address (host name or IP).
    pub host: String,

    /// Listen port. `0` picks an ephemeral port.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port`, bracketing bare IPv6 hosts.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Output destination for request dumps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// All dumps on standard output.
    #[default]
    Stdout,
    /// One file per request in `output.dir`.
    File,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub mode: OutputMode,

    /// Directory for `file` mode. Must already exist.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::Stdout,
            dir: PathBuf::from("./"),
        }
    }
}

/// Body read limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Bodies larger than this are reported as a read error in the dump.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "grace=info".to_string(),
        }
    }
}
