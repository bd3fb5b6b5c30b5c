//! Control keys that govern the scheduler.
//!
//! # Decision Table
//! ```text
//! base.updateType    config.updateTime     → decision
//! absent | "auto"    positive integer n    → Continue(n seconds)
//! absent | "auto"    absent | invalid      → Continue(previous interval)
//! anything else      (not read)            → Stop (terminal)
//! ```

use std::time::Duration;

use crate::store::ConfigStore;

/// Set holding the update mode.
pub const BASE_SET: &str = "base";
/// Update mode key; absent or `auto` keeps polling.
pub const UPDATE_TYPE_KEY: &str = "updateType";
/// Update mode that keeps polling.
pub const AUTO_UPDATE: &str = "auto";
/// Set holding the polling interval.
pub const CONFIG_SET: &str = "config";
/// Polling interval key, in seconds.
pub const UPDATE_TIME_KEY: &str = "updateTime";

/// Interval used until `config.updateTime` says otherwise.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60 * 10);

/// What the scheduler does after a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleDecision {
    /// Arm the next pass after this interval.
    Continue(Duration),
    /// Stop polling for good.
    Stop { update_type: String },
}

/// Decide the next step from the control keys currently in `store`.
pub fn decide(store: &ConfigStore, current: Duration) -> ScheduleDecision {
    if let Some(update_type) = store.get_value(BASE_SET, UPDATE_TYPE_KEY) {
        if update_type != AUTO_UPDATE {
            return ScheduleDecision::Stop { update_type };
        }
    }

    let interval = match store.get_integer_value(CONFIG_SET, UPDATE_TIME_KEY) {
        Ok(Some(secs)) if secs > 0 => Duration::from_secs(secs as u64),
        Ok(Some(secs)) => {
            tracing::warn!(
                update_time = secs,
                interval_secs = current.as_secs(),
                "Non-positive updateTime, keeping current interval"
            );
            current
        }
        Ok(None) => current,
        Err(e) => {
            tracing::warn!(
                error = %e,
                interval_secs = current.as_secs(),
                "Invalid updateTime, keeping current interval"
            );
            current
        }
    };
    ScheduleDecision::Continue(interval)
}
