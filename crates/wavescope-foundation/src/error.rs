use thiserror::Error;

/// Top-level error for viewer construction and teardown.
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Error, Debug)]
pub enum StreamError {
    /// Discovery exhausted every attempt without a matching stream.
    /// Reported once, loudly; ingestion never starts.
    #[error("no device found for stream type {type_tag:?} after {attempts} attempts")]
    DeviceNotFound { type_tag: String, attempts: u32 },

    #[error("failed to open inlet: {0}")]
    InletOpen(String),

    #[error("device reported unusable metadata: {0}")]
    BadMetadata(String),

    #[error("pull failed: {0}")]
    Pull(String),
}

#[derive(Error, Debug)]
pub enum FilterError {
    /// Cutoff ordering or Nyquist violation. Fatal at design time;
    /// misconfiguration, not recoverable at runtime.
    #[error("invalid filter spec: {reason}")]
    InvalidSpec { reason: String },
}

#[derive(Error, Debug)]
pub enum IngestError {
    /// Chunk row width disagrees with the session's channel count.
    /// Policy: log, drop the chunk, keep ingesting.
    #[error("chunk shape mismatch: expected {expected} channels, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Zero-phase filtering needs more samples than the window holds yet.
    /// Expected during warm-up; the caller skips the tick.
    #[error("window of {got} samples is below the {needed} required for zero-phase filtering")]
    InsufficientSamples { needed: usize, got: usize },

    #[error("numeric failure in refresh pipeline: {0}")]
    Numeric(String),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl PipelineError {
    /// Warm-up conditions are swallowed by the scheduler rather than logged
    /// as errors.
    pub fn is_warmup(&self) -> bool {
        matches!(self, PipelineError::InsufficientSamples { .. })
    }
}
