//! Reload subsystem.
//!
//! # Data Flow
//! ```text
//! ReloadScheduler::start
//!     → bootstrap pass (synchronous, seeds control keys)
//!     → control.rs reads base.updateType / config.updateTime
//!     → loop: sleep(interval) → scanner.rs → store reload_pass → decide
//! ```
//!
//! # Design Decisions
//! - Schedule parameters live in the data being reloaded, so the first
//!   decision can only be made after the bootstrap pass
//! - One loop task, one writer

pub mod control;
pub mod scanner;
pub mod scheduler;

pub use control::{ScheduleDecision, DEFAULT_INTERVAL};
pub use scanner::{ConfigDirectoryScanner, ScanError, ScannedFile};
pub use scheduler::{PassError, ReloadHandle, ReloadScheduler, SchedulerState};
