//! Per-tick transform of the current window: detrend, then zero-phase
//! bandpass. The outcome is a tagged result the scheduler pattern-matches
//! on; there is no catch-all around the tick body.

use wavescope_dsp::{detrend, filtfilt, has_minimum_samples, is_all_zero, FilterSpec};
use wavescope_foundation::PipelineError;

/// One rendered window, ready for the external display: `channel_count`
/// equal-length arrays, same length as the input window.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub channels: Vec<Vec<f64>>,
}

#[derive(Debug)]
pub enum RenderOutcome {
    Rendered(RenderFrame),
    /// Nothing to draw yet (initial all-zero state)
    Skipped,
    Failed(PipelineError),
}

/// Transform the window snapshot into display-ready data.
///
/// All-zero windows (including the empty pre-discovery state) are skipped;
/// windows still too short for zero-phase filtering fail with
/// `InsufficientSamples`, which the caller treats as a silent skip.
pub fn render(window: &[Vec<f64>], spec: &FilterSpec) -> RenderOutcome {
    if is_all_zero(window) {
        return RenderOutcome::Skipped;
    }

    let window_len = window.first().map(Vec::len).unwrap_or(0);
    if !has_minimum_samples(window_len, spec) {
        return RenderOutcome::Failed(PipelineError::InsufficientSamples {
            needed: spec.min_window_len(),
            got: window_len,
        });
    }

    let mut channels = Vec::with_capacity(window.len());
    for samples in window {
        match filtfilt(spec, &detrend(samples)) {
            Ok(filtered) => channels.push(filtered),
            Err(e) => return RenderOutcome::Failed(e),
        }
    }
    RenderOutcome::Rendered(RenderFrame { channels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use wavescope_dsp::design_bandpass;

    #[test]
    fn all_zero_window_is_skipped() {
        let spec = design_bandpass(100, 0.5, 40.0, 5).unwrap();
        let window = vec![vec![0.0; 200], vec![0.0; 200]];
        assert!(matches!(render(&window, &spec), RenderOutcome::Skipped));
    }

    #[test]
    fn empty_window_is_skipped() {
        let spec = design_bandpass(100, 0.5, 40.0, 5).unwrap();
        assert!(matches!(
            render(&[Vec::new(), Vec::new()], &spec),
            RenderOutcome::Skipped
        ));
    }

    #[test]
    fn short_window_fails_with_insufficient_samples() {
        let spec = design_bandpass(100, 0.5, 40.0, 5).unwrap();
        // Non-zero so the all-zero skip does not hide the length check
        let window = vec![vec![1.0; 20]];
        match render(&window, &spec) {
            RenderOutcome::Failed(PipelineError::InsufficientSamples { needed, got }) => {
                assert_eq!(needed, 34);
                assert_eq!(got, 20);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn rendered_output_preserves_shape() {
        let spec = design_bandpass(100, 0.5, 40.0, 5).unwrap();
        let window: Vec<Vec<f64>> = (0..2)
            .map(|ch| {
                (0..200)
                    .map(|i| (2.0 * PI * 5.0 * i as f64 / 100.0).sin() * (ch + 1) as f64)
                    .collect()
            })
            .collect();
        match render(&window, &spec) {
            RenderOutcome::Rendered(frame) => {
                assert_eq!(frame.channels.len(), 2);
                assert!(frame.channels.iter().all(|ch| ch.len() == 200));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
