//! Startup orchestration.
//!
//! Builds the store and scheduler from settings and runs the bootstrap load.
//! Must be called from within a Tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use crate::config::schema::ReloadSettings;
use crate::reload::{ConfigDirectoryScanner, ReloadHandle, ReloadScheduler};
use crate::store::ConfigStore;

/// Create a store for `settings.directory` and start keeping it fresh.
pub fn start_reloading(settings: &ReloadSettings) -> ReloadHandle {
    let scanner = ConfigDirectoryScanner::new(&settings.directory, &settings.extension);
    let store = Arc::new(ConfigStore::new());

    let handle = ReloadScheduler::new(store, scanner)
        .with_default_interval(Duration::from_secs(settings.default_interval_secs))
        .start();

    tracing::info!(
        dir = %settings.directory.display(),
        sets = handle.store().len(),
        state = ?handle.state(),
        "Config reload started"
    );
    handle
}

/// Bootstrap-only load with no background loop.
pub fn load_once(settings: &ReloadSettings) -> Arc<ConfigStore> {
    let scanner = ConfigDirectoryScanner::new(&settings.directory, &settings.extension);
    let store = Arc::new(ConfigStore::new());
    if let Err(e) = store.reload_pass(&scanner) {
        tracing::error!(error = %e, "Config load failed");
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_reloading_loads_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("shop.properties"), "app_id=42\n").unwrap();
        let settings = ReloadSettings {
            directory: dir.path().to_path_buf(),
            ..ReloadSettings::default()
        };

        let mut handle = start_reloading(&settings);
        assert_eq!(handle.store().get_value("shop", "app_id").as_deref(), Some("42"));
        handle.stop().await;
    }

    #[test]
    fn test_load_once_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ReloadSettings {
            directory: dir.path().join("absent"),
            ..ReloadSettings::default()
        };
        assert!(load_once(&settings).is_empty());
    }
}
