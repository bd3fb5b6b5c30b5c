//! Shared utilities for reload integration tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use props_reload::{ConfigDirectoryScanner, ConfigStore, ReloadHandle, ReloadScheduler};

/// Each write gets a distinct, strictly increasing mtime so change detection
/// does not depend on filesystem timestamp resolution.
static NEXT_MTIME: AtomicU64 = AtomicU64::new(1_000_000);

fn next_mtime() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(NEXT_MTIME.fetch_add(1, Ordering::SeqCst))
}

/// A temporary configuration directory.
pub struct ConfigDir {
    _root: tempfile::TempDir,
    path: PathBuf,
}

#[allow(dead_code)]
impl ConfigDir {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("config");
        std::fs::create_dir(&path).unwrap();
        Self { _root: root, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `<name>.properties` and give it a fresh mtime.
    pub fn write(&self, name: &str, content: &str) {
        let path = self.path.join(format!("{name}.properties"));
        std::fs::write(&path, content).unwrap();
        let file = std::fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(next_mtime()).unwrap();
    }

    pub fn scanner(&self) -> ConfigDirectoryScanner {
        ConfigDirectoryScanner::properties(&self.path)
    }

    /// Start a scheduler over this directory.
    pub fn start(&self) -> (Arc<ConfigStore>, ReloadHandle) {
        let store = Arc::new(ConfigStore::new());
        let handle = ReloadScheduler::new(store.clone(), self.scanner()).start();
        (store, handle)
    }
}

/// Poll until `handle` has completed `passes` passes; returns when it happened.
#[allow(dead_code)]
pub async fn wait_for_passes(handle: &ReloadHandle, passes: u64, timeout: Duration) -> Option<Instant> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if handle.passes() >= passes {
            return Some(Instant::now());
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    None
}

/// Poll `check` until it returns true or `timeout` elapses.
#[allow(dead_code)]
pub async fn eventually<F: Fn() -> bool>(check: F, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
