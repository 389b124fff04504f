use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Filter design parameters for the display bandpass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Low cutoff frequency (Hz)
    #[serde(default = "default_low_cut")]
    pub low_cut_hz: f64,
    /// High cutoff frequency (Hz)
    #[serde(default = "default_high_cut")]
    pub high_cut_hz: f64,
    /// Butterworth prototype order
    #[serde(default = "default_order")]
    pub order: usize,
}

fn default_low_cut() -> f64 {
    0.5
}
fn default_high_cut() -> f64 {
    40.0
}
fn default_order() -> usize {
    5
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            low_cut_hz: default_low_cut(),
            high_cut_hz: default_high_cut(),
            order: default_order(),
        }
    }
}

/// Viewer configuration. All defaults are overridable at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Stream category tag to resolve (e.g. "EEG")
    #[serde(default = "default_type_tag")]
    pub type_tag: String,

    /// Duration of signal kept on screen, in seconds
    #[serde(default = "default_plot_duration")]
    pub plot_duration_secs: u32,

    /// Interval between refresh (render) ticks, in milliseconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,

    /// Interval between ingest (pull) ticks, in milliseconds
    #[serde(default = "default_ingest_interval")]
    pub ingest_interval_ms: u64,

    /// How many times discovery retries before giving up
    #[serde(default = "default_resolve_attempts")]
    pub resolve_attempts: u32,

    /// How long each discovery attempt blocks, in seconds
    #[serde(default = "default_resolve_timeout")]
    pub resolve_timeout_secs: f64,

    #[serde(default)]
    pub filter: FilterConfig,
}

fn default_type_tag() -> String {
    "EEG".to_string()
}
fn default_plot_duration() -> u32 {
    10
}
fn default_refresh_interval() -> u64 {
    60
}
fn default_ingest_interval() -> u64 {
    200
}
fn default_resolve_attempts() -> u32 {
    3
}
fn default_resolve_timeout() -> f64 {
    1.0
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            type_tag: default_type_tag(),
            plot_duration_secs: default_plot_duration(),
            refresh_interval_ms: default_refresh_interval(),
            ingest_interval_ms: default_ingest_interval(),
            resolve_attempts: default_resolve_attempts(),
            resolve_timeout_secs: default_resolve_timeout(),
            filter: FilterConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Number of samples kept in the sliding window for a given sample rate.
    pub fn window_capacity(&self, sample_rate: u32) -> usize {
        self.plot_duration_secs as usize * sample_rate as usize
    }

    pub fn ingest_interval(&self) -> Duration {
        Duration::from_millis(self.ingest_interval_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.resolve_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ViewerError> {
        if self.type_tag.is_empty() {
            return Err(ViewerError::Config("type_tag must not be empty".into()));
        }
        if self.plot_duration_secs == 0 {
            return Err(ViewerError::Config(
                "plot_duration_secs must be positive".into(),
            ));
        }
        if self.refresh_interval_ms == 0 || self.ingest_interval_ms == 0 {
            return Err(ViewerError::Config(
                "tick intervals must be positive".into(),
            ));
        }
        if self.resolve_attempts == 0 {
            return Err(ViewerError::Config(
                "resolve_attempts must be positive".into(),
            ));
        }
        Ok(())
    }
}
