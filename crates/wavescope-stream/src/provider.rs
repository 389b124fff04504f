//! Capability interface to the external stream transport.
//!
//! The underlying discovery/transport protocol is a trusted collaborator;
//! the core only needs resolution by type tag, a buffered inlet, metadata,
//! and chunked pulls.

use std::time::Duration;

use wavescope_foundation::StreamError;

/// Static stream description reported by the device.
#[derive(Debug, Clone)]
pub struct StreamMetadata {
    /// Device name, used for logging only
    pub name: String,
    /// Nominal sample rate in Hz as reported (not yet rounded)
    pub nominal_sample_rate: f64,
    pub channel_count: usize,
    /// Channel descriptors in the device-reported order
    pub channels: Vec<ChannelInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct ChannelInfo {
    pub label: Option<String>,
    pub unit: Option<String>,
}

/// One pull's worth of samples: sample-major rows, each row one value per
/// channel, plus a timestamp per row. May be empty.
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    pub rows: Vec<Vec<f64>>,
    pub timestamps: Vec<f64>,
}

impl Chunk {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Inlet configuration applied when binding to a resolved stream.
#[derive(Debug, Clone, Copy)]
pub struct InletOptions {
    /// Buffer depth in seconds, sized to the display duration
    pub buffer_secs: u32,
    /// Smooth out network jitter
    pub dejitter: bool,
    /// Align device timestamps to the local clock
    pub clock_sync: bool,
}

/// Resolves streams matching a type tag. Each call blocks up to `timeout`.
pub trait StreamProvider {
    type Candidate: StreamCandidate;

    fn resolve(&self, type_tag: &str, timeout: Duration) -> Vec<Self::Candidate>;
}

/// A resolved-but-unopened stream.
pub trait StreamCandidate {
    type Inlet: StreamInlet;

    fn open(self, options: InletOptions) -> Result<Self::Inlet, StreamError>;
}

/// A live buffered connection. Not reentrant-safe for concurrent pulls;
/// single-owner use is assumed (the ingest task owns it).
pub trait StreamInlet: Send + 'static {
    fn metadata(&self) -> StreamMetadata;

    fn pull_chunk(&mut self) -> Result<Chunk, StreamError>;
}
