//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → table.rs (split into segments, look up first segment)
//!     → Return: rewritten upstream URL or no match
//!
//! Table construction (at startup):
//!     --proxy URL NAME pairs
//!     → Insert in command-line order (duplicate names overwrite)
//!     → Freeze as immutable ProxyTable
//! ```
//!
//! # Design Decisions
//! - Table built once at startup, immutable at runtime; shared across
//!   handlers without locks
//! - First path segment is the only routing key; no regex, no wildcards
//! - A prefix name shadows a same-named file in the served directory.
//!   Deliberate: routing never consults the filesystem

pub mod table;

pub use table::ProxyTable;
