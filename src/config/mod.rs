//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! Command-line arguments (cli.rs)
//!     → schema.rs (ServerConfig::from_cli)
//!     → validation.rs (semantic checks: URLs parse, directory exists)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc to all request handlers
//! ```
//!
//! # Design Decisions
//! - Configuration is immutable once constructed; no reload mechanism
//! - Validation separates syntactic (clap) from semantic checks
//! - All validation errors are reported at once, not just the first

pub mod schema;
pub mod validation;

pub use schema::{ListenerConfig, ServerConfig};
pub use validation::{ConfigError, ValidationError};
