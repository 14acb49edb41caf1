//! Windowed smoothing and the synthetic noise used by the lowess
//! approximation.

use rand_distr::{Distribution, Normal};

/// Simple moving average, valid range only: output length is
/// `len - window + 1`, with `out[i]` covering `values[i..i + window]`.
/// The result aligns to the trailing domain points (`out[0]` belongs at
/// `x[window - 1]`). Returns an empty vector when the series is shorter
/// than the window.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() < window {
        return Vec::new();
    }
    values
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}

/// Add zero-mean Gaussian noise with per-point standard deviation
/// `frac * |value|` (a value of 0 stays exactly 0).
pub fn add_gaussian_noise(values: &[f64], frac: f64) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    values
        .iter()
        .map(|&v| {
            let sd = (frac * v).abs();
            match Normal::new(0.0, sd) {
                Ok(dist) => v + dist.sample(&mut rng),
                Err(_) => v,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_average_window_three() {
        let out = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(out, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn moving_average_window_five() {
        let out = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 5);
        assert_eq!(out, vec![3.0]);
    }

    #[test]
    fn short_series_yields_nothing() {
        assert!(moving_average(&[1.0, 2.0], 3).is_empty());
    }

    #[test]
    fn noise_scales_with_magnitude() {
        let values = vec![100.0; 2000];
        let noisy = add_gaussian_noise(&values, 0.1);
        assert_eq!(noisy.len(), values.len());
        // σ = 10, so essentially every sample stays within 6σ.
        assert!(noisy.iter().all(|v| (v - 100.0).abs() < 60.0));
        // And the noise is actually present.
        assert!(noisy.iter().any(|v| (v - 100.0).abs() > 0.01));
    }

    #[test]
    fn zero_values_stay_zero() {
        let noisy = add_gaussian_noise(&[0.0, 0.0], 0.1);
        assert_eq!(noisy, vec![0.0, 0.0]);
    }
}
