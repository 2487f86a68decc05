//! Background load orchestrator.
//!
//! Runs [`DataManager`] load cycles in tokio tasks and forwards finished
//! datasets through an `mpsc` channel, so the TUI event loop never shares
//! mutable state with the loader. Cycles are triggered at startup, on
//! [`LoadHandle::reload`], and optionally on a fixed refresh interval.
//!
//! Every cycle is tagged with a generation from a [`GenerationGuard`]. When
//! a cycle finishes after a newer one has started, its result is dropped:
//! only the latest trigger's outcome ever reaches the consumer.

use std::future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use exposure_core::error::{ExposureError, Result};
use exposure_data::merger::AggregatedDataset;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::data_manager::DataManager;

// ── Public types ──────────────────────────────────────────────────────────────

/// Outcome of one load cycle, forwarded to the presentation layer.
#[derive(Debug)]
pub struct DatasetUpdate {
    pub generation: u64,
    /// `Err` only for a total failure; per-category failures live inside the
    /// dataset.
    pub result: Result<AggregatedDataset>,
}

// ── GenerationGuard ───────────────────────────────────────────────────────────

/// Monotonic load-cycle counter shared between the trigger and the result
/// path.
#[derive(Debug, Clone, Default)]
pub struct GenerationGuard {
    current: Arc<AtomicU64>,
}

impl GenerationGuard {
    /// Start a new generation and return its number. Every earlier
    /// generation becomes stale.
    pub fn advance(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}

// ── LoadOrchestrator ──────────────────────────────────────────────────────────

/// Background reload coordinator.
pub struct LoadOrchestrator {
    manager: Arc<DataManager>,
    refresh_interval: Option<Duration>,
}

impl LoadOrchestrator {
    /// `refresh_interval` of `None` (or zero) loads only at startup and on
    /// explicit reloads.
    pub fn new(manager: Arc<DataManager>, refresh_interval: Option<Duration>) -> Self {
        Self {
            manager,
            refresh_interval: refresh_interval.filter(|d| !d.is_zero()),
        }
    }

    /// Spawn the orchestration loop. The first load cycle starts
    /// immediately.
    pub fn start(self) -> (mpsc::Receiver<DatasetUpdate>, LoadHandle) {
        let (tx, rx) = mpsc::channel(8);
        let (reload_tx, reload_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            self.run(tx, reload_rx).await;
        });

        (rx, LoadHandle { reload_tx, handle })
    }

    // ── Private implementation ────────────────────────────────────────────────

    /// Exits when the update receiver or every [`LoadHandle`] is dropped.
    async fn run(self, tx: mpsc::Sender<DatasetUpdate>, mut reload_rx: mpsc::UnboundedReceiver<()>) {
        let guard = GenerationGuard::default();
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(u64, Result<AggregatedDataset>)>();

        self.spawn_cycle(&guard, &done_tx);

        let mut ticker = self.refresh_interval.map(|period| {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });

        loop {
            tokio::select! {
                command = reload_rx.recv() => match command {
                    Some(()) => self.spawn_cycle(&guard, &done_tx),
                    None => {
                        tracing::debug!("load handle dropped; exiting loop");
                        break;
                    }
                },
                _ = next_tick(&mut ticker) => self.spawn_cycle(&guard, &done_tx),
                Some((generation, result)) = done_rx.recv() => {
                    if !guard.is_current(generation) {
                        tracing::debug!(
                            generation,
                            current = guard.current(),
                            "discarding stale load result"
                        );
                        continue;
                    }
                    if tx.send(DatasetUpdate { generation, result }).await.is_err() {
                        tracing::debug!("update channel closed; exiting loop");
                        break;
                    }
                }
            }
        }
    }

    /// Start a load cycle under a fresh generation.
    fn spawn_cycle(
        &self,
        guard: &GenerationGuard,
        done_tx: &mpsc::UnboundedSender<(u64, Result<AggregatedDataset>)>,
    ) {
        let generation = guard.advance();
        tracing::debug!(generation, "starting load cycle");

        let manager = Arc::clone(&self.manager);
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let load = tokio::spawn(async move { manager.load().await });
            let result = match load.await {
                Ok(result) => result,
                Err(e) => Err(ExposureError::Other(anyhow::anyhow!("load task failed: {e}"))),
            };
            // The loop may already have exited.
            let _ = done_tx.send((generation, result));
        });
    }
}

/// Resolves on the next tick, or never when no interval is configured.
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending::<()>().await,
    }
}

// ── LoadHandle ────────────────────────────────────────────────────────────────

/// Control endpoint for the background loop.
///
/// Dropping the handle stops the loop after its current iteration.
pub struct LoadHandle {
    reload_tx: mpsc::UnboundedSender<()>,
    handle: tokio::task::JoinHandle<()>,
}

impl LoadHandle {
    /// Request a new load cycle. Returns `false` when the loop has exited.
    pub fn reload(&self) -> bool {
        self.reload_tx.send(()).is_ok()
    }

    /// Immediately abort the loop.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
