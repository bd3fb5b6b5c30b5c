//! Settings schema for the `propsd` daemon.
//!
//! These are the daemon's own settings (where to look, how to log), read
//! once at startup. The managed `.properties` sets live in the store.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::reload::control::DEFAULT_INTERVAL;
use crate::reload::scanner::DEFAULT_EXTENSION;

/// Root settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Reload loop settings.
    pub reload: ReloadSettings,

    /// Logging and metrics.
    pub observability: ObservabilitySettings,
}

/// Where configuration sets come from and how often to poll by default.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ReloadSettings {
    /// Directory holding one file per set.
    pub directory: PathBuf,

    /// File extension of set files, without the dot.
    pub extension: String,

    /// Polling interval until `config.updateTime` overrides it.
    pub default_interval_secs: u64,
}

impl Default for ReloadSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("config"),
            extension: DEFAULT_EXTENSION.to_string(),
            default_interval_secs: DEFAULT_INTERVAL.as_secs(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilitySettings {
    /// Log filter (trace, debug, info, warn, error or a directive list).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
