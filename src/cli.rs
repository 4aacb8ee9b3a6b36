//! Command-line argument surface.
//!
//! # Responsibilities
//! - Define the clap argument parser
//! - Collect repeated `--proxy URL NAME` pairs in order (last name wins)
//!
//! # Design Decisions
//! - `--proxy` takes two values per occurrence; clap flattens them into one
//!   vector, so pairing happens in [`Cli::proxy_pairs`]
//! - Invalid arguments fail fast with clap's usage message and nonzero exit

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// A local development HTTP server with optional path-prefix proxying.
#[derive(Parser, Debug)]
#[command(name = "devserve")]
#[command(about = "Serve a directory over HTTP, forwarding configured path prefixes to upstream servers", long_about = None)]
pub struct Cli {
    /// Alternate port
    #[arg(default_value_t = 8000)]
    pub port: u16,

    /// Alternate bind address [default: all interfaces]
    #[arg(short, long, value_name = "ADDRESS")]
    pub bind: Option<String>,

    /// Alternate directory to serve [default: current directory]
    #[arg(short, long, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Register a proxy: requests to /PROXY_NAME/rest are forwarded to
    /// PROXY_URL/rest. May be given multiple times.
    #[arg(
        short,
        long,
        num_args = 2,
        value_names = ["PROXY_URL", "PROXY_NAME"],
        action = ArgAction::Append
    )]
    pub proxy: Vec<String>,

    /// Run as a CGI server (disables proxying)
    #[arg(long)]
    pub cgi: bool,

    /// Open the served URL in the default browser after binding
    #[arg(long)]
    pub open: bool,

    /// Upstream request timeout in seconds [default: no timeout]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Pair up the flattened `--proxy` values as `(url, name)` tuples,
    /// preserving command-line order.
    pub fn proxy_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.proxy
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}
