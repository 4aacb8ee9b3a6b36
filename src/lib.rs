//! Development HTTP server with path-prefix proxying.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                  DEVSERVE                    │
//!                    │                                              │
//!   Client Request   │  ┌──────────┐      ┌─────────────────┐      │
//!   ─────────────────┼─▶│   net    │─────▶│      http       │      │
//!                    │  │ listener │      │     server      │      │
//!                    │  └──────────┘      └────────┬────────┘      │
//!                    │                             │               │
//!                    │                 ┌───────────┴──────────┐    │
//!                    │                 ▼                      ▼    │
//!                    │        ┌───────────────┐      ┌──────────┐  │
//!                    │        │    routing    │      │  static  │  │
//!                    │        │  ProxyTable   │      │ fallback │  │
//!                    │        └───────┬───────┘      │ ServeDir │  │
//!                    │                │              └──────────┘  │
//!                    │         [prefix match]                      │
//!                    │                ▼                            │
//!   Client Response  │        ┌───────────────┐                    │
//!   ◀────────────────┼────────│     relay     │◀───────────────────┼──── Upstream
//!                    │        │ (status,      │                    │     Server
//!                    │        │  headers,     │                    │
//!                    │        │  body verbatim)│                   │
//!                    │        └───────────────┘                    │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! A request either matches a configured proxy prefix (first path segment)
//! and is relayed to the upstream with the remaining path, or falls through
//! to the static file handler rooted at the configured directory.

pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod routing;

pub use cli::Cli;
pub use config::ServerConfig;
pub use http::HttpServer;
pub use routing::ProxyTable;
