use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared metrics for cross-task pipeline monitoring
#[derive(Clone, Default)]
pub struct PipelineMetrics {
    // Ingest side
    pub chunks_pulled: Arc<AtomicU64>,
    pub samples_ingested: Arc<AtomicU64>,
    pub chunks_dropped: Arc<AtomicU64>,
    pub pull_errors: Arc<AtomicU64>,

    // Refresh side
    pub frames_rendered: Arc<AtomicU64>,
    pub ticks_skipped: Arc<AtomicU64>,
    pub render_errors: Arc<AtomicU64>,

    pub last_chunk_time: Arc<RwLock<Option<Instant>>>,
    pub last_render_time: Arc<RwLock<Option<Instant>>>,
}

impl PipelineMetrics {
    pub fn record_chunk(&self, rows: usize) {
        self.chunks_pulled.fetch_add(1, Ordering::Relaxed);
        self.samples_ingested
            .fetch_add(rows as u64, Ordering::Relaxed);
        *self.last_chunk_time.write() = Some(Instant::now());
    }

    pub fn record_dropped_chunk(&self) {
        self.chunks_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pull_error(&self) {
        self.pull_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_render(&self) {
        self.frames_rendered.fetch_add(1, Ordering::Relaxed);
        *self.last_render_time.write() = Some(Instant::now());
    }

    pub fn record_skip(&self) {
        self.ticks_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_render_error(&self) {
        self.render_errors.fetch_add(1, Ordering::Relaxed);
    }
}
