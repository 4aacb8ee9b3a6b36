//! HTTP handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum app, one task per connection)
//!     → routing::ProxyTable (first path segment lookup)
//!     → [match]    relay.rs (outbound GET, verbatim status/headers/body copy)
//!     → [no match] tower-http ServeDir (static file collaborator)
//!
//! In --cgi mode:
//!     /cgi-bin/* → cgi.rs (child process, CGI/1.1 environment)
//!     otherwise  → ServeDir
//! ```

pub mod cgi;
pub mod relay;
pub mod server;

pub use relay::{relay, RelayError, UpstreamResponse};
pub use server::HttpServer;
