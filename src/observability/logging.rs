//! Structured logging.
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - JSON format for production, pretty format for development
//! - Events go to stderr so `propsd get` output stays clean

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::schema::{LogFormat, ObservabilitySettings};

/// Install the global tracing subscriber.
pub fn init(settings: &ObservabilitySettings) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match settings.log_format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    }
}
