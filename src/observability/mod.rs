//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! store / scheduler produce:
//!     → logging.rs (structured tracing events: set, path, pass, error)
//!     → metrics.rs (pass counters, parse failures, interval gauge)
//!
//! Consumers:
//!     → stderr (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Library code only emits events; the binary installs subscribers
//! - Metric updates go through the `metrics` facade and are no-ops until
//!   an exporter is installed

pub mod logging;
pub mod metrics;
