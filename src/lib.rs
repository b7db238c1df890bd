//! # exg-psd — Welch power spectral density for EEG/MEG in pure Rust
//!
//! `exg-psd` estimates power spectral density of continuous and epoched
//! neurophysiological recordings. Every step is ported from
//! [MNE-Python](https://mne.tools)'s `mne.time_frequency.psd` module, with
//! matplotlib's `psd()` as the single-channel estimator.
//!
//! ## Data flow
//!
//! ```text
//! RawSource / EpochSource
//!   │
//!   ├─ picks                 channel selection (default: MEG + EEG, no bads)
//!   ├─ proj (raw only)       SSP projector, restricted to picks on both axes
//!   ├─ Parallel::map         one unit per channel (raw) / per epoch (epochs)
//!   │    └─ psd_welch_1d     Hann-windowed averaged periodogram (RustFFT)
//!   ├─ common_freqs          every unit must agree on the frequency vector
//!   └─ mask_freqs            keep fmin ≤ f ≤ fmax
//!        │
//!        └─→ ([C, F] | [E, C, F] f64, [F] f64)
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use exg_psd::{compute_raw_psd, MeasInfo, PsdConfig, RawArray, FIFFV_EEG_CH};
//! use ndarray::Array2;
//!
//! // 2 EEG channels, 10 s at 256 Hz
//! let info = MeasInfo::new(&["Fz", "Cz"], 256.0, FIFFV_EEG_CH);
//! let raw  = RawArray::new(Array2::zeros((2, 2560)), info).unwrap();
//!
//! let cfg = PsdConfig { fmax: 40.0, n_jobs: 2, ..PsdConfig::default() };
//! let (psd, freqs) = compute_raw_psd(&raw, 0.0, f64::INFINITY, None, false, &cfg).unwrap();
//! assert_eq!(psd.nrows(), 2);
//! assert_eq!(psd.ncols(), freqs.len());
//! ```
//!
//! ## Epochs
//!
//! ```no_run
//! use exg_psd::{compute_epochs_psd, make_fixed_length_epochs, MeasInfo, PsdConfig, RawArray, FIFFV_EEG_CH};
//! use ndarray::Array2;
//!
//! let info   = MeasInfo::new(&["Fz", "Cz", "Pz"], 256.0, FIFFV_EEG_CH);
//! let raw    = RawArray::new(Array2::zeros((3, 3840)), info).unwrap();
//! let epochs = make_fixed_length_epochs(&raw, 5.0).unwrap();    // [3, 3, 1280]
//!
//! let (psds, freqs) = compute_epochs_psd(&epochs, None, &PsdConfig::default()).unwrap();
//! assert_eq!(psds.shape(), &[3, 3, freqs.len()]);
//! ```
//!
//! ## Errors
//!
//! Entry points return [`anyhow::Result`]; the underlying cause is always a
//! [`PsdError`] and can be recovered with `err.downcast_ref::<PsdError>()`.
//!
//! ## Parallelism
//!
//! `n_jobs > 1` runs units on a rayon pool (feature `parallel`, on by
//! default). Results are identical for any worker count.

pub mod config;
pub mod epoch;
pub mod error;
pub mod info;
pub mod mask;
pub mod parallel;
pub mod proj;
pub mod psd;
pub mod raw;
pub mod welch;

// ── Crate-root re-exports ─────────────────────────────────────────────────

// config
pub use config::PsdConfig;

// error
pub use error::PsdError;

// info — channel metadata, picking
pub use info::{
    default_picks, pick_types, ChannelInfo, MeasInfo, Projection,
    FIFFV_ECG_CH, FIFFV_ECOG_CH, FIFFV_EEG_CH, FIFFV_EMG_CH, FIFFV_EOG_CH,
    FIFFV_MEG_CH, FIFFV_MISC_CH, FIFFV_SEEG_CH, FIFFV_STIM_CH,
};

// data sources
pub use epoch::{make_fixed_length_epochs, EpochSource, EpochsArray};
pub use raw::{RawArray, RawSource};

// SSP
pub use proj::{apply_projector, make_projector, make_projector_info, restrict_projector};

// dispatch
pub use parallel::{check_n_jobs, Parallel};

// spectral
pub use mask::{common_freqs, freq_mask, mask_freqs, stack_rows};
pub use psd::{compute_epochs_psd, compute_psd_matrix, compute_raw_psd};
pub use welch::{hanning, psd_welch_1d, rfft_freqs};
