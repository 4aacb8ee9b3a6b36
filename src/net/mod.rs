//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! --bind ADDRESS / port
//!     → listener.rs (resolve candidates, dual-stack socket setup)
//!     → tokio TcpListener
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Default bind is all interfaces: IPv6 unspecified with V6ONLY cleared,
//!   falling back to IPv4 where the platform has no IPv6
//! - Bind failures are fatal at startup; no partial listener is left open

pub mod listener;

pub use listener::{bind, reachable_url, ListenerError};
