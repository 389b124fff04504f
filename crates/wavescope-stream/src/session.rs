//! Device discovery and session binding.

use wavescope_foundation::{Clock, RealClock, StreamError, ViewerConfig};

use crate::provider::{
    Chunk, InletOptions, StreamCandidate, StreamInlet, StreamMetadata, StreamProvider,
};

/// A bound stream: negotiated metadata plus the live inlet. Immutable
/// after discovery except for the inlet's internal read position.
pub struct StreamSession<I: StreamInlet> {
    type_tag: String,
    sample_rate: u32,
    channel_count: usize,
    channel_names: Vec<String>,
    inlet: I,
}

impl<I: StreamInlet> StreamSession<I> {
    /// Resolve a stream matching `config.type_tag` and bind to the first
    /// candidate. Retries up to `config.resolve_attempts` times, each
    /// attempt blocking up to `config.resolve_timeout()`. Exhausting every
    /// attempt yields `StreamError::DeviceNotFound` and no partial session.
    pub fn discover<P>(provider: &P, config: &ViewerConfig) -> Result<Self, StreamError>
    where
        P: StreamProvider,
        P::Candidate: StreamCandidate<Inlet = I>,
    {
        Self::discover_with_clock(provider, config, &RealClock::new())
    }

    pub fn discover_with_clock<P>(
        provider: &P,
        config: &ViewerConfig,
        clock: &dyn Clock,
    ) -> Result<Self, StreamError>
    where
        P: StreamProvider,
        P::Candidate: StreamCandidate<Inlet = I>,
    {
        // Brief settle so a device announced at startup has a chance to
        // register before the first resolve.
        clock.sleep(std::time::Duration::from_millis(100));

        for attempt in 1..=config.resolve_attempts {
            let mut candidates = provider.resolve(&config.type_tag, config.resolve_timeout());
            tracing::debug!(
                attempt,
                found = candidates.len(),
                type_tag = %config.type_tag,
                "resolve pass finished"
            );
            if candidates.is_empty() {
                continue;
            }

            // Bind to the first reported candidate
            let candidate = candidates.remove(0);
            let inlet = candidate.open(InletOptions {
                buffer_secs: config.plot_duration_secs,
                dejitter: true,
                clock_sync: true,
            })?;
            return Self::from_inlet(inlet, &config.type_tag);
        }

        tracing::error!(
            type_tag = %config.type_tag,
            attempts = config.resolve_attempts,
            "no devices found"
        );
        Err(StreamError::DeviceNotFound {
            type_tag: config.type_tag.clone(),
            attempts: config.resolve_attempts,
        })
    }

    fn from_inlet(inlet: I, type_tag: &str) -> Result<Self, StreamError> {
        let meta = inlet.metadata();
        let sample_rate = meta.nominal_sample_rate.round();
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(StreamError::BadMetadata(format!(
                "nominal sample rate {} is not positive",
                meta.nominal_sample_rate
            )));
        }
        if meta.channel_count == 0 {
            return Err(StreamError::BadMetadata("zero channels reported".into()));
        }

        let channel_names = extract_channel_names(&meta);
        tracing::info!(
            device = %meta.name,
            sample_rate,
            channels = meta.channel_count,
            "device found"
        );

        Ok(Self {
            type_tag: type_tag.to_string(),
            sample_rate: sample_rate as u32,
            channel_count: meta.channel_count,
            channel_names,
            inlet,
        })
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// One label per channel, device-reported order.
    pub fn channel_names(&self) -> &[String] {
        &self.channel_names
    }

    pub fn pull_chunk(&mut self) -> Result<Chunk, StreamError> {
        self.inlet.pull_chunk()
    }
}

/// Walk the channel descriptors in reported order, taking one label per
/// channel. Missing or blank labels fall back to a positional name so the
/// display always has `channel_count` entries.
fn extract_channel_names(meta: &StreamMetadata) -> Vec<String> {
    (0..meta.channel_count)
        .map(|i| {
            meta.channels
                .get(i)
                .and_then(|ch| ch.label.clone())
                .filter(|label| !label.is_empty())
                .unwrap_or_else(|| format!("Ch{}", i + 1))
        })
        .collect()
}
