//! Facade tying discovery, filter design, buffering, and scheduling
//! together: the setup sequence an embedding display runs once.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use wavescope_dsp::{design_bandpass, FilterSpec};
use wavescope_foundation::{ViewerConfig, ViewerError};
use wavescope_telemetry::PipelineMetrics;

use crate::pipeline::RenderFrame;
use crate::provider::{StreamCandidate, StreamInlet, StreamProvider};
use crate::scheduler::{Scheduler, SchedulerConfig};
use crate::session::StreamSession;
use crate::window::WindowBuffer;

/// A discovered session plus its designed filter, ready to start. Channel
/// metadata is available here for one-time renderer setup (labels, count)
/// before the tasks begin.
pub struct Viewer<I: StreamInlet> {
    session: StreamSession<I>,
    config: ViewerConfig,
    spec: FilterSpec,
    metrics: PipelineMetrics,
}

impl<I: StreamInlet> Viewer<I> {
    /// Discover a device and design the display filter for its sample
    /// rate. Discovery failure is reported once, loudly, and nothing
    /// starts.
    pub fn discover<P>(provider: &P, config: ViewerConfig) -> Result<Self, ViewerError>
    where
        P: StreamProvider,
        P::Candidate: StreamCandidate<Inlet = I>,
    {
        config.validate()?;
        let session = StreamSession::discover(provider, &config)?;
        let spec = design_bandpass(
            session.sample_rate(),
            config.filter.low_cut_hz,
            config.filter.high_cut_hz,
            config.filter.order,
        )?;
        Ok(Self {
            session,
            config,
            spec,
            metrics: PipelineMetrics::default(),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.session.sample_rate()
    }

    pub fn channel_count(&self) -> usize {
        self.session.channel_count()
    }

    pub fn channel_names(&self) -> &[String] {
        self.session.channel_names()
    }

    pub fn filter_spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// Shared handle to the pipeline counters (clones share state).
    pub fn metrics(&self) -> PipelineMetrics {
        self.metrics.clone()
    }

    pub fn window_capacity(&self) -> usize {
        self.config.window_capacity(self.session.sample_rate())
    }

    /// Allocate the window buffer and spawn both periodic tasks. Returns
    /// the scheduler, a receiver of rendered frames for the display, and
    /// the shared buffer (history access, further subscribers).
    pub fn start(
        self,
    ) -> (
        Scheduler,
        broadcast::Receiver<RenderFrame>,
        Arc<Mutex<WindowBuffer>>,
    ) {
        let capacity = self.window_capacity();
        let buffer = Arc::new(Mutex::new(WindowBuffer::new(
            self.session.channel_count(),
            capacity,
        )));
        let (frame_tx, frame_rx) = broadcast::channel(16);

        tracing::info!(
            capacity,
            channels = self.session.channel_count(),
            "starting viewer pipeline"
        );
        let scheduler = Scheduler::spawn(
            self.session,
            buffer.clone(),
            self.spec,
            frame_tx,
            SchedulerConfig {
                ingest_interval: self.config.ingest_interval(),
                refresh_interval: self.config.refresh_interval(),
            },
            self.metrics,
        );
        (scheduler, frame_rx, buffer)
    }
}
