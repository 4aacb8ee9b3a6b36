//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse CLI → Validate config → Bind listener → Serve
//!
//! Shutdown (signals.rs):
//!     SIGINT/ctrl-c → stop accepting → finish in-flight requests → exit 0
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and exits nonzero
//! - Interrupt is the one graceful shutdown path; exit code is 0

pub mod signals;

pub use signals::shutdown_signal;
