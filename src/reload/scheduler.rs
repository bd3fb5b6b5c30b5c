//! Self-governing reload scheduler.
//!
//! # States
//! - Scheduled: next pass armed `interval` from now
//! - Running: a pass is scanning/reparsing
//! - Stopped: terminal, no further pass ever runs
//!
//! # State Transitions
//! ```text
//! start:      bootstrap pass (synchronous) → decide
//! decide:     Continue(interval) → Scheduled
//!             Stop               → Stopped
//! Scheduled → Running: interval elapsed
//! Running   → decide:  pass finished (ok, failed or panicked)
//! any       → Stopped: ReloadHandle::stop / handle dropped
//! ```
//!
//! # Design Decisions
//! - The loop task is the only timer, so there is never a second armed pass
//! - Passes run on the blocking pool; an error or panic is logged and the
//!   loop carries on to the next decision
//! - Once stopped nothing re-arms the loop, even if `base.updateType` is
//!   later edited back to `auto`

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::runtime::RuntimeFlavor;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::reload::control::{self, ScheduleDecision, DEFAULT_INTERVAL};
use crate::reload::scanner::{ConfigDirectoryScanner, ScanError};
use crate::store::{ConfigStore, PassReport};

/// Scheduler lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Scheduled { interval: Duration },
    Running,
    Stopped,
}

/// Failure of a whole reload pass.
#[derive(Debug, Error)]
pub enum PassError {
    /// Config directory could not be listed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The pass panicked on the blocking pool.
    #[error("reload pass panicked: {0}")]
    Panicked(String),

    /// The blocking task was cancelled before finishing.
    #[error("reload pass cancelled")]
    Cancelled,
}

/// Builder for the background reload loop.
pub struct ReloadScheduler {
    store: Arc<ConfigStore>,
    scanner: ConfigDirectoryScanner,
    default_interval: Duration,
}

impl ReloadScheduler {
    pub fn new(store: Arc<ConfigStore>, scanner: ConfigDirectoryScanner) -> Self {
        Self {
            store,
            scanner,
            default_interval: DEFAULT_INTERVAL,
        }
    }

    /// Interval used while `config.updateTime` is absent or invalid.
    pub fn with_default_interval(mut self, interval: Duration) -> Self {
        self.default_interval = interval;
        self
    }

    /// Run the bootstrap pass, then arm the loop if the control keys allow it.
    ///
    /// The bootstrap pass is synchronous: the store is seeded before this
    /// returns. Must be called from within a Tokio runtime.
    pub fn start(self) -> ReloadHandle {
        let shutdown = Shutdown::new();
        let (state_tx, state_rx) = watch::channel(SchedulerState::Running);
        let ctx = LoopContext {
            store: self.store,
            scanner: self.scanner,
            passes: Arc::new(AtomicU64::new(0)),
            state: state_tx,
        };

        tracing::info!(dir = %ctx.scanner.dir().display(), "Bootstrap config load");
        let started = Instant::now();
        let result = bootstrap_pass(&ctx.store, &ctx.scanner);
        ctx.finish_pass(result, started);

        let decision = control::decide(&ctx.store, self.default_interval);
        let passes = ctx.passes.clone();
        let store = ctx.store.clone();
        let task = match decision {
            ScheduleDecision::Continue(interval) => {
                Some(tokio::spawn(ctx.run(interval, shutdown.subscribe())))
            }
            ScheduleDecision::Stop { update_type } => {
                tracing::info!(update_type = %update_type, "Automatic reload disabled");
                ctx.state.send_replace(SchedulerState::Stopped);
                None
            }
        };

        ReloadHandle {
            shutdown,
            task,
            state: state_rx,
            passes,
            store,
        }
    }
}

struct LoopContext {
    store: Arc<ConfigStore>,
    scanner: ConfigDirectoryScanner,
    passes: Arc<AtomicU64>,
    state: watch::Sender<SchedulerState>,
}

impl LoopContext {
    async fn run(self, mut interval: Duration, mut shutdown: broadcast::Receiver<()>) {
        loop {
            self.state.send_replace(SchedulerState::Scheduled { interval });
            metrics::record_interval(interval);

            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("Reload scheduler received shutdown signal, exiting loop");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }

            self.state.send_replace(SchedulerState::Running);
            let started = Instant::now();
            let store = self.store.clone();
            let scanner = self.scanner.clone();
            let result = match tokio::task::spawn_blocking(move || store.reload_pass(&scanner)).await {
                Ok(result) => result.map_err(PassError::from),
                Err(e) if e.is_panic() => Err(PassError::Panicked(panic_message(e.into_panic()))),
                Err(_) => Err(PassError::Cancelled),
            };
            self.finish_pass(result, started);

            match control::decide(&self.store, interval) {
                ScheduleDecision::Continue(next) => {
                    if next != interval {
                        tracing::info!(
                            interval_secs = next.as_secs(),
                            previous_secs = interval.as_secs(),
                            "Reload interval changed"
                        );
                    }
                    interval = next;
                }
                ScheduleDecision::Stop { update_type } => {
                    tracing::info!(update_type = %update_type, "Automatic reload disabled, scheduler stopping");
                    break;
                }
            }
        }

        self.state.send_replace(SchedulerState::Stopped);
    }

    fn finish_pass(&self, result: Result<PassReport, PassError>, started: Instant) {
        let pass = self.passes.fetch_add(1, Ordering::SeqCst) + 1;
        match result {
            Ok(report) => {
                if report.reloaded > 0 || report.failed > 0 {
                    tracing::info!(
                        pass,
                        reloaded = report.reloaded,
                        failed = report.failed,
                        scanned = report.scanned,
                        "Reload pass finished"
                    );
                }
                metrics::record_pass(started.elapsed());
            }
            Err(e) => {
                tracing::error!(pass, error = %e, "Reload pass failed, next pass still scheduled");
                metrics::record_pass_failure();
            }
        }
    }
}

/// Runs inline on the caller's thread. On a multi-thread runtime the worker
/// is handed off first so other tasks keep running; a current-thread runtime
/// blocks for the duration of the pass.
fn bootstrap_pass(
    store: &ConfigStore,
    scanner: &ConfigDirectoryScanner,
) -> Result<PassReport, PassError> {
    let multi_thread = tokio::runtime::Handle::try_current()
        .map(|h| h.runtime_flavor() == RuntimeFlavor::MultiThread)
        .unwrap_or(false);
    let result = if multi_thread {
        tokio::task::block_in_place(|| store.reload_pass(scanner))
    } else {
        store.reload_pass(scanner)
    };
    result.map_err(PassError::from)
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Handle to a started scheduler.
///
/// Dropping the handle also ends the loop at its next wait point.
pub struct ReloadHandle {
    shutdown: Shutdown,
    task: Option<JoinHandle<()>>,
    state: watch::Receiver<SchedulerState>,
    passes: Arc<AtomicU64>,
    store: Arc<ConfigStore>,
}

impl ReloadHandle {
    /// Current scheduler state.
    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    pub fn is_stopped(&self) -> bool {
        self.state() == SchedulerState::Stopped
    }

    /// Completed passes, bootstrap included.
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::SeqCst)
    }

    /// Watch state transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<SchedulerState> {
        self.state.clone()
    }

    /// The store this scheduler keeps fresh.
    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// Cancel the pending pass and wait for an in-flight one to finish.
    pub async fn stop(&mut self) {
        self.shutdown.trigger();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Reload scheduler task ended abnormally");
            }
        }
        tracing::info!(passes = self.passes(), "Reload scheduler stopped");
    }
}

impl std::fmt::Debug for ReloadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadHandle")
            .field("state", &self.state())
            .field("passes", &self.passes())
            .finish()
    }
}
