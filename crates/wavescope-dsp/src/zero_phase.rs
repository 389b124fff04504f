//! Zero-phase (forward-backward) IIR filtering.
//!
//! A causal pass delays every feature by the filter's group delay, which is
//! visible on a live display. Running the filter forward and then backward
//! cancels the phase response. Edge transients are suppressed by extending
//! the signal with odd reflections and starting each pass from the
//! steady-state initial conditions scaled to the first sample.

use nalgebra::{DMatrix, DVector};
use wavescope_foundation::PipelineError;

use crate::filter::FilterSpec;

/// Explicit precondition for zero-phase filtering: the window must be
/// longer than the edge padding taken from each end.
pub fn has_minimum_samples(window_len: usize, spec: &FilterSpec) -> bool {
    window_len >= spec.min_window_len()
}

/// Single causal IIR pass (direct form II transposed) with optional
/// initial conditions of length `max(b.len(), a.len()) - 1`.
///
/// # Panics
///
/// The denominator must be non-empty with a nonzero leading coefficient;
/// the recursion normalizes by `a[0]`.
pub fn lfilter(b: &[f64], a: &[f64], x: &[f64], zi: Option<&[f64]>) -> Vec<f64> {
    assert!(
        !a.is_empty() && a[0] != 0.0,
        "denominator must have a nonzero leading coefficient"
    );
    let n = b.len().max(a.len());
    let a0 = a[0];
    let mut bn = vec![0.0; n];
    let mut an = vec![0.0; n];
    for (dst, &src) in bn.iter_mut().zip(b) {
        *dst = src / a0;
    }
    for (dst, &src) in an.iter_mut().zip(a) {
        *dst = src / a0;
    }

    let mut z = match zi {
        Some(zi) => zi.to_vec(),
        None => vec![0.0; n - 1],
    };

    let mut y = Vec::with_capacity(x.len());
    for &xk in x {
        let yk = bn[0] * xk + z.first().copied().unwrap_or(0.0);
        for i in 0..z.len() {
            let carry = if i + 1 < z.len() { z[i + 1] } else { 0.0 };
            z[i] = bn[i + 1] * xk + carry - an[i + 1] * yk;
        }
        y.push(yk);
    }
    y
}

/// Steady-state initial conditions for `lfilter`: the state vector for
/// which a unit step input produces the filter's steady-state output from
/// the very first sample. Solves `(I - A^T) zi = B` over the companion
/// form of the denominator.
pub fn lfilter_zi(b: &[f64], a: &[f64]) -> Result<Vec<f64>, PipelineError> {
    let n = b.len().max(a.len());
    if n == 1 {
        return Ok(Vec::new());
    }
    let a0 = a.first().copied().unwrap_or(0.0);
    if a0 == 0.0 {
        return Err(PipelineError::Numeric(
            "denominator leading coefficient is zero".into(),
        ));
    }
    let mut bn = vec![0.0; n];
    let mut an = vec![0.0; n];
    for (dst, &src) in bn.iter_mut().zip(b) {
        *dst = src / a0;
    }
    for (dst, &src) in an.iter_mut().zip(a) {
        *dst = src / a0;
    }

    let m = n - 1;
    let mut mat = DMatrix::<f64>::identity(m, m);
    for i in 0..m {
        mat[(i, 0)] += an[i + 1];
    }
    for j in 1..m {
        mat[(j - 1, j)] -= 1.0;
    }
    let rhs = DVector::from_iterator(m, (0..m).map(|i| bn[i + 1] - an[i + 1] * bn[0]));

    let zi = mat.lu().solve(&rhs).ok_or_else(|| {
        PipelineError::Numeric("singular system while solving initial filter conditions".into())
    })?;
    Ok(zi.iter().copied().collect())
}

/// Zero-phase application of `spec` to one channel.
///
/// Fails with `InsufficientSamples` while the window is still shorter than
/// the edge padding; the caller skips the tick and retries once more data
/// has accumulated.
pub fn filtfilt(spec: &FilterSpec, x: &[f64]) -> Result<Vec<f64>, PipelineError> {
    let edge = spec.edge_len();
    if x.len() <= edge {
        return Err(PipelineError::InsufficientSamples {
            needed: spec.min_window_len(),
            got: x.len(),
        });
    }

    let n = x.len();
    let first = x[0];
    let last = x[n - 1];

    // Odd extension at both ends
    let mut ext = Vec::with_capacity(n + 2 * edge);
    for i in (1..=edge).rev() {
        ext.push(2.0 * first - x[i]);
    }
    ext.extend_from_slice(x);
    for k in 1..=edge {
        ext.push(2.0 * last - x[n - 1 - k]);
    }

    let zi = lfilter_zi(&spec.b, &spec.a)?;

    let zi_fwd: Vec<f64> = zi.iter().map(|&v| v * ext[0]).collect();
    let fwd = lfilter(&spec.b, &spec.a, &ext, Some(&zi_fwd));

    let rev: Vec<f64> = fwd.into_iter().rev().collect();
    let zi_bwd: Vec<f64> = zi.iter().map(|&v| v * rev[0]).collect();
    let bwd = lfilter(&spec.b, &spec.a, &rev, Some(&zi_bwd));

    let mut out: Vec<f64> = bwd.into_iter().rev().collect();
    out.drain(..edge);
    out.truncate(n);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Exponential smoother y[k] = 0.25 x[k] + 0.75 y[k-1], DC gain 1
    fn smoother() -> FilterSpec {
        FilterSpec {
            b: vec![0.25],
            a: vec![1.0, -0.75],
        }
    }

    #[test]
    fn zi_of_first_order_smoother() {
        // Steady state for unit input: y = 1, so z = a * y = 0.75
        let zi = lfilter_zi(&[0.25], &[1.0, -0.75]).unwrap();
        assert_eq!(zi.len(), 1);
        assert!((zi[0] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn lfilter_with_zi_tracks_constant_immediately() {
        let zi = lfilter_zi(&[0.25], &[1.0, -0.75]).unwrap();
        let scaled: Vec<f64> = zi.iter().map(|v| v * 4.0).collect();
        let y = lfilter(&[0.25], &[1.0, -0.75], &[4.0; 32], Some(&scaled));
        assert!(y.iter().all(|v| (v - 4.0).abs() < 1e-12));
    }

    #[test]
    fn lfilter_pure_gain() {
        let y = lfilter(&[2.0], &[1.0], &[1.0, -1.0, 0.5], None);
        assert_eq!(y, vec![2.0, -2.0, 1.0]);
    }

    #[test]
    #[should_panic(expected = "nonzero leading coefficient")]
    fn lfilter_rejects_zero_leading_denominator() {
        lfilter(&[1.0], &[0.0, 0.5], &[1.0, 2.0], None);
    }

    #[test]
    #[should_panic(expected = "nonzero leading coefficient")]
    fn lfilter_rejects_empty_denominator() {
        lfilter(&[1.0], &[], &[1.0, 2.0], None);
    }

    #[test]
    fn filtfilt_is_identity_for_dc_gain_one() {
        let spec = smoother();
        let x = vec![3.0; 40];
        let y = filtfilt(&spec, &x).unwrap();
        assert_eq!(y.len(), 40);
        assert!(y.iter().all(|v| (v - 3.0).abs() < 1e-9));
    }

    #[test]
    fn filtfilt_rejects_short_windows() {
        let spec = smoother();
        // edge_len = 3 * 2 = 6, so 6 samples are not enough
        let err = filtfilt(&spec, &[1.0; 6]).unwrap_err();
        match err {
            PipelineError::InsufficientSamples { needed, got } => {
                assert_eq!(needed, 7);
                assert_eq!(got, 6);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(filtfilt(&spec, &[1.0; 7]).is_ok());
    }

    #[test]
    fn minimum_samples_predicate_matches_filtfilt() {
        let spec = smoother();
        assert!(!has_minimum_samples(6, &spec));
        assert!(has_minimum_samples(7, &spec));
    }
}
