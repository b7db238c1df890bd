//! Error taxonomy for PSD estimation.
//!
//! Public entry points return [`anyhow::Result`]; every error raised by this
//! crate is a [`PsdError`] inside it, so callers that care about the kind can
//! `err.downcast_ref::<PsdError>()`.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PsdError {
    /// Time range resolves to no samples (or is not a valid time at all).
    #[error("invalid time range: tmin={tmin} s, tmax={tmax} s ({reason})")]
    InvalidTimeRange {
        tmin: f64,
        tmax: f64,
        reason: &'static str,
    },

    /// `fmin > fmax`, or a NaN bound.
    #[error("invalid frequency range: fmin={fmin} Hz > fmax={fmax} Hz")]
    InvalidFrequencyRange { fmin: f64, fmax: f64 },

    /// No frequency bin falls inside `[fmin, fmax]`.
    #[error("no frequencies in [{fmin}, {fmax}] Hz (available: {lo}..={hi} Hz)")]
    EmptyFrequencyMask { fmin: f64, fmax: f64, lo: f64, hi: f64 },

    #[error("channel index {index} out of range for {n_chan} channels")]
    ChannelOutOfRange { index: usize, n_chan: usize },

    #[error("channel selection is empty")]
    NoChannels,

    #[error("epoch collection is empty")]
    NoEpochs,

    /// Per-unit arrays that must agree in shape do not.
    #[error("shape mismatch in {what}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// Unit `unit` produced a frequency vector different from unit 0.
    #[error("frequency vector of unit {unit} differs from unit 0")]
    FrequencyMismatch { unit: usize },

    #[error("n_fft must be at least 1, got {n_fft}")]
    InvalidNfft { n_fft: usize },

    #[error("n_overlap ({n_overlap}) must be smaller than n_fft ({n_fft})")]
    InvalidOverlap { n_overlap: usize, n_fft: usize },

    #[error("sampling rate must be positive and finite, got {sfreq}")]
    InvalidSamplingRate { sfreq: f64 },

    #[error("cannot estimate a PSD from an empty signal")]
    EmptySignal,

    #[error("n_jobs={n_jobs} leaves no workers on a {n_cores}-core machine")]
    InvalidJobs { n_jobs: i32, n_cores: usize },

    #[error("projector is {rows}x{cols} but data has {n_chan} channels")]
    ProjectorShape { rows: usize, cols: usize, n_chan: usize },
}
