//! In-memory registry of configuration sets.
//!
//! # Data Flow
//! ```text
//! reload pass (sole writer, serialized)
//!     → scanner lists <name>.properties + mtime
//!     → needs_reload? (mtime differs or first sighting)
//!     → ConfigSet::from_file
//!     → copy-on-write swap of the whole name → Arc<ConfigSet> map
//!
//! readers (any thread, never blocked)
//!     → sets.load() → Arc<ConfigSet> → get_value / typed accessors
//! ```
//!
//! # Design Decisions
//! - Readers see a whole old or whole new set, never a mix
//! - A failed parse keeps the previous set and the previous mtime, so the
//!   next pass retries the file
//! - Sets whose file disappears are kept

pub mod accessor;

pub use accessor::{TypeCoercionError, ValueType};

use arc_swap::ArcSwap;
use dashmap::DashMap;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Instant, SystemTime};

use crate::observability::metrics;
use crate::properties::ConfigSet;
use crate::reload::scanner::{ConfigDirectoryScanner, ScanError, ScannedFile};

/// Result of reloading one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// File parsed and the set replaced.
    Reloaded,
    /// Modification time unchanged, file not parsed.
    Unchanged,
    /// File could not be read or parsed; previous set kept.
    Failed,
}

/// Counts produced by one reload pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub scanned: usize,
    pub reloaded: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl PassReport {
    fn record(&mut self, outcome: ReloadOutcome) {
        self.scanned += 1;
        match outcome {
            ReloadOutcome::Reloaded => self.reloaded += 1,
            ReloadOutcome::Unchanged => self.unchanged += 1,
            ReloadOutcome::Failed => self.failed += 1,
        }
    }
}

type SetMap = HashMap<String, Arc<ConfigSet>>;

/// Thread-safe store of named configuration sets.
pub struct ConfigStore {
    sets: ArcSwap<SetMap>,
    timestamps: DashMap<String, SystemTime>,
    writer: Mutex<()>,
    parse_count: AtomicU64,
}

impl ConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            sets: ArcSwap::from_pointee(HashMap::new()),
            timestamps: DashMap::new(),
            writer: Mutex::new(()),
            parse_count: AtomicU64::new(0),
        }
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        // The guarded data is (), so a poisoned lock carries no broken state.
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Point lookup of a whole set.
    pub fn get(&self, name: &str) -> Option<Arc<ConfigSet>> {
        self.sets.load().get(name).cloned()
    }

    /// Names of all loaded sets, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sets.load().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.sets.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.load().is_empty()
    }

    /// Number of parse attempts made so far.
    pub fn parse_count(&self) -> u64 {
        self.parse_count.load(Ordering::Relaxed)
    }

    /// Modification time recorded at the last successful parse of `name`.
    pub fn last_modified(&self, name: &str) -> Option<SystemTime> {
        self.timestamps.get(name).map(|r| *r.value())
    }

    /// True when `name` was never loaded or its file's mtime changed.
    pub fn needs_reload(&self, name: &str, last_modified: SystemTime) -> bool {
        match self.timestamps.get(name) {
            Some(recorded) => *recorded.value() != last_modified,
            None => true,
        }
    }

    /// Parse `path` and replace the set `name` on success.
    ///
    /// Failures are logged and leave the previous set untouched.
    pub fn reload(&self, name: &str, path: &Path, last_modified: SystemTime) -> ReloadOutcome {
        let _guard = self.lock_writer();
        self.reload_locked(name, path, last_modified)
    }

    fn reload_locked(&self, name: &str, path: &Path, last_modified: SystemTime) -> ReloadOutcome {
        self.parse_count.fetch_add(1, Ordering::Relaxed);

        let set = match ConfigSet::from_file(name, path, last_modified) {
            Ok(set) => set,
            Err(e) => {
                tracing::error!(
                    set = %name,
                    path = %path.display(),
                    error = %e,
                    "Failed to reload config set, keeping previous version"
                );
                metrics::record_parse_failure(name);
                return ReloadOutcome::Failed;
            }
        };

        let keys = set.len();
        let mut next = SetMap::clone(&self.sets.load());
        next.insert(name.to_string(), Arc::new(set));
        let total = next.len();
        self.sets.store(Arc::new(next));
        self.timestamps.insert(name.to_string(), last_modified);

        tracing::info!(set = %name, keys, "Config set loaded");
        metrics::record_file_reloaded(name);
        metrics::record_set_count(total);
        ReloadOutcome::Reloaded
    }

    /// Reload `file` only if its mtime differs from the recorded one.
    pub fn refresh(&self, file: &ScannedFile) -> ReloadOutcome {
        let _guard = self.lock_writer();
        self.refresh_locked(file)
    }

    fn refresh_locked(&self, file: &ScannedFile) -> ReloadOutcome {
        if !self.needs_reload(&file.name, file.last_modified) {
            return ReloadOutcome::Unchanged;
        }
        self.reload_locked(&file.name, &file.path, file.last_modified)
    }

    /// Run one reload pass over everything `scanner` reports.
    ///
    /// Passes are serialized; a concurrent caller waits for the running one.
    pub fn reload_pass(&self, scanner: &ConfigDirectoryScanner) -> Result<PassReport, ScanError> {
        let _guard = self.lock_writer();
        let start = Instant::now();

        let files = scanner.scan()?;
        let mut report = PassReport::default();
        for file in &files {
            report.record(self.refresh_locked(file));
        }

        tracing::debug!(
            dir = %scanner.dir().display(),
            scanned = report.scanned,
            reloaded = report.reloaded,
            failed = report.failed,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Reload pass complete"
        );
        Ok(report)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("sets", &self.names())
            .field("parse_count", &self.parse_count())
            .finish()
    }
}
