//! Fixed-interval driver for the triage pipeline.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::config::PollerConfig;
use super::pipeline::TriagePipeline;
use super::types::PassReport;

/// Scheduler state, observable from outside the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the next tick.
    Idle,
    /// A pass is in progress.
    Running,
}

/// Runs a pass at startup, then again `interval` after each pass ends.
///
/// Passes never overlap: the next sleep only starts once the current pass has
/// returned. Shutdown is honoured between passes only.
pub struct Scheduler {
    pipeline: Arc<TriagePipeline>,
    config: PollerConfig,
    running: AtomicBool,
    passes: AtomicU64,
}

impl Scheduler {
    pub fn new(pipeline: Arc<TriagePipeline>, config: PollerConfig) -> Self {
        Self {
            pipeline,
            config,
            running: AtomicBool::new(false),
            passes: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.running.load(Ordering::SeqCst) {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        }
    }

    /// Number of completed passes.
    pub fn passes_completed(&self) -> u64 {
        self.passes.load(Ordering::SeqCst)
    }

    /// Run a single pass (Idle → Running → Idle).
    ///
    /// Returns `None` without touching any service if a pass is already
    /// running.
    pub async fn tick(&self) -> Option<PassReport> {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Poll pass already running, skipping tick");
            return None;
        }

        let report = self.pipeline.run_pass().await;
        self.passes.fetch_add(1, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
        Some(report)
    }

    /// Loop until `shutdown` resolves. Returns the number of passes run.
    pub async fn run<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(
            interval_secs = self.config.interval_secs,
            jitter_secs = self.config.jitter_secs,
            "Poll loop started"
        );

        loop {
            self.tick().await;

            let delay = self.config.next_delay();
            debug!(delay_ms = delay.as_millis() as u64, "Waiting for next poll");

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Poll loop received shutdown signal");
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        let passes = self.passes_completed();
        info!(passes = passes, "Poll loop stopped");
        passes
    }
}
