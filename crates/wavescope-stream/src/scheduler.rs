//! Dual-rate periodic scheduling: an ingest task pulling chunks into the
//! window buffer and a refresh task rendering the current window.
//!
//! The two tasks run independently on the tokio runtime and may land on
//! different worker threads, so the shared buffer sits behind a mutex
//! (single writer, single reader). A long tick delays that task's next
//! tick rather than bursting to catch up. No ordering is guaranteed
//! between the two tasks when both are due; the refresh path tolerates a
//! window that has not yet seen the very latest chunk.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use wavescope_dsp::FilterSpec;
use wavescope_telemetry::PipelineMetrics;

use crate::pipeline::{render, RenderFrame, RenderOutcome};
use crate::provider::StreamInlet;
use crate::session::StreamSession;
use crate::window::WindowBuffer;

#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub ingest_interval: Duration,
    pub refresh_interval: Duration,
}

/// Handle to one periodic task. Stopping is immediate for future ticks
/// but does not interrupt a tick already in progress.
pub struct TaskHandle {
    name: &'static str,
    handle: JoinHandle<()>,
    running: Arc<AtomicBool>,
}

impl TaskHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        tracing::debug!(task = self.name, "stop requested");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub async fn join(self) {
        let _ = self.handle.await;
    }
}

/// Both periodic tasks of one session.
pub struct Scheduler {
    ingest: TaskHandle,
    refresh: TaskHandle,
}

impl Scheduler {
    /// Spawn the ingest and refresh tasks. The session (and its inlet)
    /// moves into the ingest task, which is the buffer's only writer.
    pub fn spawn<I: StreamInlet>(
        session: StreamSession<I>,
        buffer: Arc<Mutex<WindowBuffer>>,
        spec: FilterSpec,
        frame_tx: broadcast::Sender<RenderFrame>,
        config: SchedulerConfig,
        metrics: PipelineMetrics,
    ) -> Self {
        let ingest_running = Arc::new(AtomicBool::new(true));
        let ingest_handle = {
            let running = ingest_running.clone();
            let mut worker = IngestWorker {
                session,
                buffer: buffer.clone(),
                interval: config.ingest_interval,
                metrics: metrics.clone(),
            };
            tokio::spawn(async move {
                worker.run(running).await;
            })
        };

        let refresh_running = Arc::new(AtomicBool::new(true));
        let refresh_handle = {
            let running = refresh_running.clone();
            let worker = RefreshWorker {
                buffer,
                spec,
                frame_tx,
                interval: config.refresh_interval,
                metrics,
            };
            tokio::spawn(async move {
                worker.run(running).await;
            })
        };

        Self {
            ingest: TaskHandle {
                name: "ingest",
                handle: ingest_handle,
                running: ingest_running,
            },
            refresh: TaskHandle {
                name: "refresh",
                handle: refresh_handle,
                running: refresh_running,
            },
        }
    }

    pub fn ingest(&self) -> &TaskHandle {
        &self.ingest
    }

    pub fn refresh(&self) -> &TaskHandle {
        &self.refresh
    }

    /// Halt both tasks. In-flight tick work completes; no new ticks are
    /// scheduled afterward.
    pub fn stop(&self) {
        self.ingest.stop();
        self.refresh.stop();
    }

    /// Stop and wait for both tasks to finish.
    pub async fn shutdown(self) {
        self.stop();
        self.ingest.join().await;
        self.refresh.join().await;
    }
}

struct IngestWorker<I: StreamInlet> {
    session: StreamSession<I>,
    buffer: Arc<Mutex<WindowBuffer>>,
    interval: Duration,
    metrics: PipelineMetrics,
}

impl<I: StreamInlet> IngestWorker<I> {
    async fn run(&mut self, running: Arc<AtomicBool>) {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "ingest task started");
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while running.load(Ordering::SeqCst) {
            ticker.tick().await;
            if !running.load(Ordering::SeqCst) {
                break;
            }

            match self.session.pull_chunk() {
                Ok(chunk) if chunk.is_empty() => {}
                Ok(chunk) => {
                    let rows = chunk.len();
                    match self.buffer.lock().append(&chunk) {
                        Ok(_) => self.metrics.record_chunk(rows),
                        Err(e) => {
                            // Transient provider glitch: drop the chunk,
                            // keep the session alive.
                            tracing::warn!("dropping malformed chunk: {e}");
                            self.metrics.record_dropped_chunk();
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("pull failed: {e}");
                    self.metrics.record_pull_error();
                }
            }
        }

        tracing::info!("ingest task stopped");
    }
}

struct RefreshWorker {
    buffer: Arc<Mutex<WindowBuffer>>,
    spec: FilterSpec,
    frame_tx: broadcast::Sender<RenderFrame>,
    interval: Duration,
    metrics: PipelineMetrics,
}

impl RefreshWorker {
    async fn run(&self, running: Arc<AtomicBool>) {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            "refresh task started"
        );
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while running.load(Ordering::SeqCst) {
            ticker.tick().await;
            if !running.load(Ordering::SeqCst) {
                break;
            }

            // Snapshot under the lock, filter outside it
            let snapshot = self.buffer.lock().window_snapshot();
            match render(&snapshot, &self.spec) {
                RenderOutcome::Rendered(frame) => {
                    self.metrics.record_render();
                    // Send fails only when no one is subscribed; the
                    // display simply isn't attached yet.
                    if self.frame_tx.send(frame).is_err() {
                        tracing::trace!("no active listeners for rendered frames");
                    }
                }
                RenderOutcome::Skipped => {
                    self.metrics.record_skip();
                }
                RenderOutcome::Failed(e) if e.is_warmup() => {
                    tracing::trace!("waiting for window to fill: {e}");
                    self.metrics.record_skip();
                }
                RenderOutcome::Failed(e) => {
                    // A single bad tick never terminates the scheduler.
                    tracing::warn!("refresh tick failed: {e}");
                    self.metrics.record_render_error();
                }
            }
        }

        tracing::info!("refresh task stopped");
    }
}
