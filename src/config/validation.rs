//! Settings validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: &Settings → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::Settings;

/// A single semantic problem in the settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("reload.directory must not be empty")]
    EmptyDirectory,

    #[error("reload.extension {0:?} must be a non-empty name without path separators")]
    InvalidExtension(String),

    #[error("reload.default_interval_secs must be positive")]
    ZeroInterval,

    #[error("observability.log_level {0:?} is not a valid filter")]
    InvalidLogLevel(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check settings beyond what deserialization enforces.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let reload = &settings.reload;
    let obs = &settings.observability;

    if reload.directory.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyDirectory);
    }

    let ext = reload.extension.trim_start_matches('.');
    if ext.is_empty() || ext.contains('/') || ext.contains('\\') {
        errors.push(ValidationError::InvalidExtension(reload.extension.clone()));
    }

    if reload.default_interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }

    if EnvFilter::try_new(&obs.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(obs.log_level.clone()));
    }

    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(obs.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
