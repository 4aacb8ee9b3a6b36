//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (clap handles syntactic)
//! - Check proxy URLs parse and use a supported scheme
//! - Check proxy names are usable as a single path segment
//! - Check the served directory exists
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before any socket is bound

use thiserror::Error;
use url::Url;

use crate::config::schema::ServerConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("proxy {name:?}: invalid upstream URL {url:?} ({reason})")]
    InvalidProxyUrl {
        name: String,
        url: String,
        reason: String,
    },

    #[error("proxy {name:?}: unsupported scheme {scheme:?} (expected http or https)")]
    UnsupportedScheme { name: String, scheme: String },

    #[error("proxy name {name:?} must be a single non-empty path segment")]
    InvalidProxyName { name: String },

    #[error("directory {} does not exist or is not a directory", .path)]
    MissingDirectory { path: String },
}

/// Error type for configuration construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("cannot determine current directory: {0}")]
    CurrentDir(std::io::Error),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate a configuration, collecting every problem found.
pub fn validate(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (name, url) in config.proxy.iter() {
        if name.is_empty() || name.contains('/') {
            errors.push(ValidationError::InvalidProxyName {
                name: name.to_string(),
            });
        }

        match Url::parse(url) {
            Ok(parsed) => {
                let scheme = parsed.scheme();
                if scheme != "http" && scheme != "https" {
                    errors.push(ValidationError::UnsupportedScheme {
                        name: name.to_string(),
                        scheme: scheme.to_string(),
                    });
                }
            }
            Err(e) => errors.push(ValidationError::InvalidProxyUrl {
                name: name.to_string(),
                url: url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    if !config.static_dir.is_dir() {
        errors.push(ValidationError::MissingDirectory {
            path: config.static_dir.display().to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
