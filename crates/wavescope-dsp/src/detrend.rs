//! Linear detrend and the all-zero precondition.

/// Subtract the least-squares best-fit line from a channel's window.
/// Removes slow DC drift so it cannot dominate the display scale.
pub fn detrend(x: &[f64]) -> Vec<f64> {
    let n = x.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![0.0];
    }

    let n_f = n as f64;
    let t_mean = (n_f - 1.0) / 2.0;
    let x_mean = x.iter().sum::<f64>() / n_f;

    let mut cov = 0.0;
    let mut var = 0.0;
    for (i, &v) in x.iter().enumerate() {
        let dt = i as f64 - t_mean;
        cov += dt * (v - x_mean);
        var += dt * dt;
    }
    let slope = cov / var;

    x.iter()
        .enumerate()
        .map(|(i, &v)| v - (x_mean + slope * (i as f64 - t_mean)))
        .collect()
}

/// True when every sample of every channel is exactly zero: the
/// initial/no-data state in which nothing is drawn yet. A flatlined but
/// live device also satisfies this; callers wanting to distinguish the two
/// can track chunk arrival instead.
pub fn is_all_zero(channels: &[Vec<f64>]) -> bool {
    channels.iter().all(|ch| ch.iter().all(|&v| v == 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_constant_offset() {
        let out = detrend(&[3.0; 64]);
        assert!(out.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn removes_linear_ramp() {
        let x: Vec<f64> = (0..100).map(|i| 2.5 * i as f64 - 7.0).collect();
        let out = detrend(&x);
        assert_eq!(out.len(), 100);
        assert!(out.iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn oscillation_survives_detrend() {
        let x: Vec<f64> = (0..128)
            .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 16.0).sin())
            .collect();
        let out = detrend(&x);
        // Even over whole periods the least-squares line through a
        // sampled sinusoid has a small nonzero slope, so samples shift
        // slightly; the removed trend must stay far below the unit
        // amplitude and the oscillation's energy must survive.
        let max_change = x
            .iter()
            .zip(&out)
            .map(|(orig, kept)| (orig - kept).abs())
            .fold(0.0f64, f64::max);
        assert!(max_change < 0.15, "trend too large: {max_change}");

        let rms = |s: &[f64]| (s.iter().map(|v| v * v).sum::<f64>() / s.len() as f64).sqrt();
        let ratio = rms(&out) / rms(&x);
        assert!((ratio - 1.0).abs() < 0.02, "amplitude changed by {ratio}");
    }

    #[test]
    fn degenerate_lengths() {
        assert!(detrend(&[]).is_empty());
        assert_eq!(detrend(&[5.0]), vec![0.0]);
    }

    #[test]
    fn all_zero_detection() {
        assert!(is_all_zero(&[]));
        assert!(is_all_zero(&[vec![0.0; 8], vec![0.0; 8]]));
        assert!(!is_all_zero(&[vec![0.0; 8], vec![0.0, 1e-30, 0.0]]));
    }
}
