//! PSD estimation configuration.
//!
//! [`PsdConfig`] holds the parameters shared by [`crate::compute_raw_psd`] and
//! [`crate::compute_epochs_psd`]. All fields have defaults matching
//! `mne.time_frequency.compute_epochs_psd`.

/// Configuration for Welch PSD estimation.
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use exg_psd::PsdConfig;
///
/// let cfg = PsdConfig {
///     fmin:   1.0,
///     fmax:  40.0,
///     n_jobs: 4,
///     ..PsdConfig::default()
/// };
/// assert_eq!(cfg.n_fft, 256);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PsdConfig {
    /// Lowest frequency kept in the output, in Hz (inclusive).
    ///
    /// Default: `0.0` Hz.
    pub fmin: f64,

    /// Highest frequency kept in the output, in Hz (inclusive).
    ///
    /// Default: `f64::INFINITY` (up to Nyquist).
    pub fmax: f64,

    /// Number of samples per FFT segment (`NFFT`).
    ///
    /// Larger values give finer frequency resolution (`sfreq / n_fft` Hz per
    /// bin) and less averaging. Signals shorter than `n_fft` are zero-padded.
    ///
    /// Default: `256`.
    pub n_fft: usize,

    /// Overlap between consecutive segments, in samples. Must be `< n_fft`.
    ///
    /// Default: `0` (matplotlib's `psd` default).
    pub n_overlap: usize,

    /// Number of workers.
    ///
    /// `1` runs sequentially. Negative values count back from the number of
    /// CPUs (`-1` = all cores). See [`crate::parallel::check_n_jobs`].
    ///
    /// Default: `1`.
    pub n_jobs: i32,
}

impl Default for PsdConfig {
    /// Epochs defaults: 0 Hz – ∞ · 256-point segments · no overlap · 1 job.
    fn default() -> Self {
        Self {
            fmin: 0.0,
            fmax: f64::INFINITY,
            n_fft: 256,
            n_overlap: 0,
            n_jobs: 1,
        }
    }
}

impl PsdConfig {
    /// Defaults used for continuous recordings: as [`Default`] but with
    /// 2048-point segments.
    pub fn raw_default() -> Self {
        Self { n_fft: 2048, ..Self::default() }
    }

    /// Effective window duration in seconds: `n_fft / sfreq`.
    ///
    /// ```
    /// use exg_psd::PsdConfig;
    /// let cfg = PsdConfig::default();
    /// assert_eq!(cfg.window_secs(256.0), 1.0);
    /// ```
    pub fn window_secs(&self, sfreq: f64) -> f64 {
        self.n_fft as f64 / sfreq
    }
}
