//! Command-line interface.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::loader::{read_config, ConfigError};
use crate::config::schema::{GraceConfig, OutputMode};
use crate::config::validation::validate_config;

/// Diagnostic HTTP server that dumps every request it receives.
///
/// `-h` selects the listen host, so help is only available as `--help`.
#[derive(Debug, Default, Parser)]
#[command(name = "grace", version, disable_help_flag = true)]
pub struct Cli {
    /// Listen port [default: 8080]
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Listen address [default: 127.0.0.1]
    #[arg(short = 'h', long)]
    pub host: Option<String>,

    /// Where request dumps are written [default: stdout]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputMode>,

    /// Directory for file output [default: current directory]
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log filter directive [default: grace=info]
    #[arg(long, env = "GRACE_LOG")]
    pub log_filter: Option<String>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    /// Build the effective configuration: file (if any), then flags, then
    /// validation.
    pub fn into_config(self) -> Result<GraceConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => GraceConfig::default(),
        };
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Override `config` with every flag that was given.
    pub fn apply(&self, config: &mut GraceConfig) {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(host) = &self.host {
            config.listener.host = host.clone();
        }
        if let Some(mode) = self.output {
            config.output.mode = mode;
        }
        if let Some(dir) = &self.dir {
            config.output.dir = dir.clone();
        }
        if let Some(filter) = &self.log_filter {
            config.logging.filter = filter.clone();
        }
    }
}
