//! Daemon settings.
//!
//! # Data Flow
//! ```text
//! propsd.toml
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → Settings (immutable for the process lifetime)
//!     → startup builds scanner + scheduler from it
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; no settings file is required at all
//! - Not hot-reloaded: only the `.properties` sets are

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_or_default, load_settings, SettingsError};
pub use schema::{LogFormat, ObservabilitySettings, ReloadSettings, Settings};
