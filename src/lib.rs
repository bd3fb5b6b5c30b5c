//! Dynamic reload of `.properties` configuration sets.
//!
//! A [`ConfigStore`] holds named sets parsed from one directory. A
//! [`ReloadScheduler`] keeps it fresh by polling file modification times,
//! and reads its own polling parameters (`base.updateType`,
//! `config.updateTime`) back out of the store after every pass.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod properties;
pub mod reload;
pub mod store;

pub use properties::ConfigSet;
pub use reload::{ConfigDirectoryScanner, ReloadHandle, ReloadScheduler, SchedulerState};
pub use store::{ConfigStore, TypeCoercionError};
