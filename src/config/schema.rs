//! Configuration schema definitions.
//!
//! The complete runtime configuration for the server. Constructed once in
//! `main` from parsed CLI arguments, validated, and never mutated afterward.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::config::validation::{validate, ConfigError};
use crate::routing::ProxyTable;

/// Root configuration for the development server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listener configuration (bind address and port).
    pub listener: ListenerConfig,

    /// Root directory for static file serving.
    pub static_dir: PathBuf,

    /// Prefix-name to upstream base URL mapping.
    pub proxy: ProxyTable,

    /// Optional timeout for upstream relay requests. `None` reproduces the
    /// historical behavior: a hung upstream stalls only its own connection.
    pub upstream_timeout: Option<Duration>,

    /// Run as a CGI server instead of proxy + static.
    pub cgi: bool,

    /// Open the served URL in the default browser after binding.
    pub open_browser: bool,
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Bind address. `None` means all interfaces, dual-stack where the
    /// platform supports it.
    pub bind: Option<String>,

    /// TCP port to listen on.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind: None,
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Build and validate a configuration from parsed CLI arguments.
    ///
    /// The static root defaults to the current working directory. Duplicate
    /// `--proxy` names keep the last registration.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let static_dir = match &cli.directory {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(ConfigError::CurrentDir)?,
        };

        let config = Self {
            listener: ListenerConfig {
                bind: cli.bind.clone(),
                port: cli.port,
            },
            static_dir,
            proxy: ProxyTable::from_pairs(cli.proxy_pairs()),
            upstream_timeout: cli.timeout.map(Duration::from_secs),
            cgi: cli.cgi,
            open_browser: cli.open,
        };

        validate(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}
