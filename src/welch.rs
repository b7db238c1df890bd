//! Single-channel Welch PSD estimator.
//!
//! Matches `matplotlib.mlab.psd(x, NFFT=n_fft, Fs=sfreq, noverlap=n_overlap)`
//! as called by MNE's `compute_raw_psd` / `compute_epochs_psd`:
//!
//! ```text
//! 1. zero-pad x to n_fft if shorter
//! 2. segments of n_fft samples, hop = n_fft − n_overlap
//! 3. each segment × symmetric Hann window (numpy.hanning)
//! 4. |rfft|² averaged over segments
//! 5. scale by 1 / (sfreq · Σw²), double every bin except DC (and Nyquist)
//! ```
//!
//! No detrending is applied. Frequencies are `k · sfreq / n_fft`.
use std::f64::consts::PI;

use ndarray::{Array1, ArrayView1};
use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::PsdError;

/// Symmetric Hann window of length `n` (`numpy.hanning(n)`).
///
/// `w[i] = 0.5 − 0.5 cos(2πi / (n − 1))`; endpoints are zero. `n == 1` gives
/// `[1.0]`.
pub fn hanning(n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![1.0],
        _ => {
            let denom = (n - 1) as f64;
            (0..n).map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / denom).cos()).collect()
        }
    }
}

/// Number of one-sided frequency bins for an `n_fft`-point FFT.
#[inline]
pub fn n_freqs(n_fft: usize) -> usize {
    n_fft / 2 + 1
}

/// One-sided frequency vector `[0, sfreq/n_fft, …]` of length [`n_freqs`].
pub fn rfft_freqs(n_fft: usize, sfreq: f64) -> Array1<f64> {
    let df = sfreq / n_fft as f64;
    Array1::from_shape_fn(n_freqs(n_fft), |k| k as f64 * df)
}

/// Number of segments Welch averages for a signal of `n_samples` samples
/// (after zero-padding to `n_fft`).
pub fn n_segments(n_samples: usize, n_fft: usize, n_overlap: usize) -> usize {
    let n = n_samples.max(n_fft);
    (n - n_overlap) / (n_fft - n_overlap)
}

/// Welch PSD of one channel.
///
/// Returns `(psd, freqs)`, both of length `n_fft / 2 + 1`, with `psd` in
/// units² / Hz.
///
/// # Errors
///
/// [`PsdError::EmptySignal`], [`PsdError::InvalidNfft`],
/// [`PsdError::InvalidOverlap`] or [`PsdError::InvalidSamplingRate`] for
/// unusable arguments.
pub fn psd_welch_1d(
    x: ArrayView1<f64>,
    sfreq: f64,
    n_fft: usize,
    n_overlap: usize,
) -> Result<(Array1<f64>, Array1<f64>), PsdError> {
    if x.is_empty() {
        return Err(PsdError::EmptySignal);
    }
    check_welch_params(sfreq, n_fft, n_overlap)?;

    // 1. Zero-pad short signals to one full segment.
    let mut signal: Vec<f64> = x.to_vec();
    if signal.len() < n_fft {
        signal.resize(n_fft, 0.0);
    }

    let window = hanning(n_fft);
    let win_pow: f64 = window.iter().map(|w| w * w).sum();

    let n_seg = n_segments(signal.len(), n_fft, n_overlap);
    let hop = n_fft - n_overlap;
    let n_bins = n_freqs(n_fft);

    let mut planner: FftPlanner<f64> = FftPlanner::new();
    let fft = planner.plan_fft_forward(n_fft);
    let mut buf = vec![Complex::<f64>::default(); n_fft];
    let mut acc = vec![0.0_f64; n_bins];

    // 2–4. Windowed periodograms, accumulated.
    for seg in 0..n_seg {
        let start = seg * hop;
        for ((b, &s), &w) in buf.iter_mut().zip(&signal[start..start + n_fft]).zip(&window) {
            *b = Complex { re: s * w, im: 0.0 };
        }
        fft.process(&mut buf);
        for (a, c) in acc.iter_mut().zip(&buf[..n_bins]) {
            *a += c.norm_sqr();
        }
    }

    // 5. Average + density scaling + one-sided doubling.
    let scale = 1.0 / (n_seg as f64 * sfreq * win_pow);
    // Nyquist has no mirror image only when n_fft is even.
    let last_doubled = if n_fft % 2 == 0 { n_bins - 1 } else { n_bins };
    let psd = Array1::from_shape_fn(n_bins, |k| {
        let one_sided = if k > 0 && k < last_doubled { 2.0 } else { 1.0 };
        acc[k] * scale * one_sided
    });

    Ok((psd, rfft_freqs(n_fft, sfreq)))
}

fn check_welch_params(sfreq: f64, n_fft: usize, n_overlap: usize) -> Result<(), PsdError> {
    if !(sfreq.is_finite() && sfreq > 0.0) {
        return Err(PsdError::InvalidSamplingRate { sfreq });
    }
    // A 1-point Hann window is [1]; anything shorter is meaningless.
    if n_fft == 0 {
        return Err(PsdError::InvalidNfft { n_fft });
    }
    if n_overlap >= n_fft {
        return Err(PsdError::InvalidOverlap { n_overlap, n_fft });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sine(freq: f64, sfreq: f64, n: usize, amp: f64) -> Array1<f64> {
        Array1::from_shape_fn(n, |i| amp * (2.0 * PI * freq * i as f64 / sfreq).sin())
    }

    #[test]
    fn hanning_matches_numpy() {
        // numpy.hanning(5) = [0, 0.5, 1, 0.5, 0]
        let w = hanning(5);
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
        for (a, b) in w.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
        assert_eq!(hanning(1), vec![1.0]);
        assert!(hanning(0).is_empty());
    }

    #[test]
    fn output_lengths_even_and_odd() {
        let x = Array1::<f64>::zeros(300);
        let (p, f) = psd_welch_1d(x.view(), 100.0, 64, 0).unwrap();
        assert_eq!(p.len(), 33);
        assert_eq!(f.len(), 33);
        assert_abs_diff_eq!(f[32], 50.0, epsilon = 1e-12);

        let (p, f) = psd_welch_1d(x.view(), 100.0, 63, 0).unwrap();
        assert_eq!(p.len(), 32);
        assert_eq!(f.len(), 32);
    }

    #[test]
    fn segment_count() {
        assert_eq!(n_segments(256, 64, 0), 4);
        assert_eq!(n_segments(300, 64, 0), 4);
        assert_eq!(n_segments(256, 64, 32), 7);
        // Zero-padded short signal yields a single segment.
        assert_eq!(n_segments(10, 64, 0), 1);
    }

    #[test]
    fn sinusoid_peak_at_bin() {
        // 100 Hz / 64-point → 1.5625 Hz bins; 12.5 Hz is exactly bin 8.
        let x = sine(12.5, 100.0, 1024, 1.0);
        let (p, f) = psd_welch_1d(x.view(), 100.0, 64, 0).unwrap();
        let peak = p
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 8);
        assert_abs_diff_eq!(f[peak], 12.5, epsilon = 1e-12);
    }

    #[test]
    fn integrated_power_matches_variance() {
        // Parseval: Σ psd · df ≈ mean(x²) for a bin-centred sinusoid,
        // A²/2 = 2.0 for amplitude 2.
        let sfreq = 256.0;
        let x = sine(16.0, sfreq, 4096, 2.0);
        let (p, _) = psd_welch_1d(x.view(), sfreq, 256, 128).unwrap();
        let df = sfreq / 256.0;
        let total: f64 = p.iter().sum::<f64>() * df;
        assert_abs_diff_eq!(total, 2.0, epsilon = 0.05);
    }

    #[test]
    fn constant_signal_peaks_at_dc() {
        let x = Array1::from_elem(512, 3.0);
        let (p, _) = psd_welch_1d(x.view(), 128.0, 128, 0).unwrap();
        let dc = p[0];
        assert!(dc > 0.0);
        for &v in p.iter().skip(1) {
            assert!(v < dc, "bin power {v} exceeds dc {dc}");
        }
    }

    #[test]
    fn short_signal_is_zero_padded() {
        let x = sine(10.0, 100.0, 40, 1.0);
        let (p, f) = psd_welch_1d(x.view(), 100.0, 64, 0).unwrap();
        assert_eq!(p.len(), 33);
        assert_eq!(f.len(), 33);
        assert!(p.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn invalid_parameters_rejected() {
        let x = Array1::<f64>::zeros(16);
        assert_eq!(
            psd_welch_1d(x.view(), 100.0, 0, 0),
            Err(PsdError::InvalidNfft { n_fft: 0 })
        );
        assert_eq!(
            psd_welch_1d(x.view(), 100.0, 8, 8),
            Err(PsdError::InvalidOverlap { n_overlap: 8, n_fft: 8 })
        );
        assert!(matches!(
            psd_welch_1d(x.view(), 0.0, 8, 0),
            Err(PsdError::InvalidSamplingRate { .. })
        ));
        let empty = Array1::<f64>::zeros(0);
        assert_eq!(psd_welch_1d(empty.view(), 100.0, 8, 0), Err(PsdError::EmptySignal));
    }
}
