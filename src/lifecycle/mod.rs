//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Settings → scanner + store → bootstrap load → arm scheduler
//!
//! Shutdown (shutdown.rs):
//!     stop() → broadcast → loop leaves its wait → in-flight pass drains
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → stop the scheduler, exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: settings first, bootstrap load, then the loop
//! - No statics: every scheduler owns its own shutdown channel

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
