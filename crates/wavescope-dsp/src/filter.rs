//! Butterworth bandpass design in transfer-function form.
//!
//! The design path is the classic analog-prototype route: place the
//! prototype poles on the left half of the unit circle, transform lowpass
//! to bandpass around the prewarped band edges, then map into the z-domain
//! with the bilinear transform. The result is a numerator/denominator pair
//! of length `2 * order + 1` with the denominator normalized to `a[0] = 1`.

use std::f64::consts::PI;

use num_complex::Complex64;
use wavescope_foundation::FilterError;

/// IIR transfer function coefficients. Immutable once designed; a new
/// session (new sample rate) designs a fresh spec.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    /// Numerator coefficients
    pub b: Vec<f64>,
    /// Denominator coefficients, `a[0] == 1`
    pub a: Vec<f64>,
}

impl FilterSpec {
    /// Samples of edge padding used by the forward-backward pass.
    pub fn edge_len(&self) -> usize {
        3 * self.b.len().max(self.a.len())
    }

    /// Smallest window length accepted by zero-phase filtering.
    pub fn min_window_len(&self) -> usize {
        self.edge_len() + 1
    }

    /// Complex frequency response at a normalized angular frequency
    /// (radians/sample).
    pub fn response_at(&self, omega: f64) -> Complex64 {
        let z_inv = Complex64::from_polar(1.0, -omega);
        let eval = |coeffs: &[f64]| {
            coeffs
                .iter()
                .rev()
                .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * z_inv + c)
        };
        eval(&self.b) / eval(&self.a)
    }
}

/// Design a stable Butterworth bandpass filter for the given sample rate.
///
/// Cutoffs are in Hz and must satisfy `0 < low < high < sample_rate / 2`.
/// The computation is pure; identical inputs yield identical coefficients.
pub fn design_bandpass(
    sample_rate: u32,
    low_cut_hz: f64,
    high_cut_hz: f64,
    order: usize,
) -> Result<FilterSpec, FilterError> {
    if sample_rate == 0 {
        return Err(FilterError::InvalidSpec {
            reason: "sample rate must be positive".into(),
        });
    }
    if order == 0 {
        return Err(FilterError::InvalidSpec {
            reason: "filter order must be at least 1".into(),
        });
    }
    let nyquist = sample_rate as f64 / 2.0;
    if low_cut_hz <= 0.0 || high_cut_hz <= 0.0 {
        return Err(FilterError::InvalidSpec {
            reason: format!(
                "cutoffs must be positive, got {low_cut_hz} Hz / {high_cut_hz} Hz"
            ),
        });
    }
    if low_cut_hz >= high_cut_hz {
        return Err(FilterError::InvalidSpec {
            reason: format!(
                "low cutoff ({low_cut_hz} Hz) must be below high cutoff ({high_cut_hz} Hz)"
            ),
        });
    }
    if high_cut_hz >= nyquist {
        return Err(FilterError::InvalidSpec {
            reason: format!(
                "high cutoff ({high_cut_hz} Hz) must be below Nyquist ({nyquist} Hz)"
            ),
        });
    }

    // Normalized cutoffs in (0, 1), then prewarped analog band edges for a
    // bilinear design at the conventional fs = 2.
    let low = low_cut_hz / nyquist;
    let high = high_cut_hz / nyquist;
    let fs = 2.0;
    let warped_low = 2.0 * fs * (PI * low / 2.0).tan();
    let warped_high = 2.0 * fs * (PI * high / 2.0).tan();
    let bw = warped_high - warped_low;
    let wo = (warped_low * warped_high).sqrt();

    // Analog lowpass prototype: unit-circle poles in the left half-plane,
    // no finite zeros, unit gain.
    let prototype: Vec<Complex64> = (0..order)
        .map(|k| {
            let theta = PI * (2 * k + 1) as f64 / (2 * order) as f64 + PI / 2.0;
            Complex64::from_polar(1.0, theta)
        })
        .collect();

    // Lowpass -> bandpass: each prototype pole splits into a pair around
    // the center frequency; the numerator gains `order` zeros at s = 0.
    let mut poles = Vec::with_capacity(2 * order);
    for p in &prototype {
        let s = *p * (bw / 2.0);
        let d = (s * s - Complex64::new(wo * wo, 0.0)).sqrt();
        poles.push(s + d);
        poles.push(s - d);
    }
    let zeros = vec![Complex64::new(0.0, 0.0); order];
    let gain = bw.powi(order as i32);

    // Bilinear transform into the z-domain. Analog zeros at infinity land
    // at z = -1.
    let fs2 = Complex64::new(2.0 * fs, 0.0);
    let z_poles: Vec<Complex64> = poles.iter().map(|p| (fs2 + *p) / (fs2 - *p)).collect();
    let mut z_zeros: Vec<Complex64> = zeros.iter().map(|z| (fs2 + *z) / (fs2 - *z)).collect();
    z_zeros.resize(z_poles.len(), Complex64::new(-1.0, 0.0));

    let num: Complex64 = zeros.iter().map(|z| fs2 - *z).product();
    let den: Complex64 = poles.iter().map(|p| fs2 - *p).product();
    let k = gain * (num / den).re;

    let b: Vec<f64> = poly(&z_zeros).iter().map(|c| (*c * k).re).collect();
    let a: Vec<f64> = poly(&z_poles).iter().map(|c| c.re).collect();

    Ok(FilterSpec { b, a })
}

/// Expand a set of roots into monic polynomial coefficients, highest
/// degree first. Conjugate root pairs keep the imaginary parts of the
/// coefficients at rounding-noise level; callers take the real part.
fn poly(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for r in roots {
        coeffs.push(Complex64::new(0.0, 0.0));
        for i in (1..coeffs.len()).rev() {
            let prev = coeffs[i - 1];
            coeffs[i] -= *r * prev;
        }
    }
    coeffs
}
