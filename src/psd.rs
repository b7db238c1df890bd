//! Power spectral density of raw and epoched data.
//!
//! The Rust equivalent of `mne/time_frequency/psd.py`:
//!
//! - [`compute_raw_psd`]    — one Welch PSD per channel of a continuous
//!   recording, channels fanned out over the dispatcher.
//! - [`compute_epochs_psd`] — one task per epoch, each looping over its
//!   channels.
//!
//! Both finish by checking that every unit produced the same frequency
//! vector, stacking, and masking to `[fmin, fmax]`.
use anyhow::Result;
use ndarray::{s, Array1, Array2, Array3, ArrayView1, Axis};
use tracing::{debug, info};

use crate::config::PsdConfig;
use crate::epoch::EpochSource;
use crate::error::PsdError;
use crate::info::{default_picks, MeasInfo};
use crate::mask::{common_freqs, mask_freqs, stack_rows};
use crate::parallel::Parallel;
use crate::proj::{apply_projector, make_projector_info, restrict_projector};
use crate::raw::RawSource;
use crate::welch::psd_welch_1d;

/// PSD of every selected channel of a continuous recording.
///
/// Mirrors `mne.time_frequency.compute_raw_psd`.
///
/// # Arguments
///
/// * `raw`   – the recording.
/// * `tmin`, `tmax` – time range in seconds from the first sample; both ends
///   inclusive. `tmax` past the end (e.g. `f64::INFINITY`) reads to the end;
///   `tmin` past the end is an error.
/// * `picks` – channel indices, or `None` for every channel.
/// * `proj`  – apply the SSP projector built from `raw.info().projs` first,
///   restricted to `picks` on both axes.
/// * `cfg`   – frequency range, window length, overlap and worker count.
///
/// # Returns
///
/// `(psd, freqs)` with `psd` of shape `[n_picks, n_freqs]` and `freqs` of
/// length `n_freqs`, restricted to `cfg.fmin ..= cfg.fmax`.
///
/// # Errors
///
/// Any [`PsdError`]: an empty or invalid time range, bad picks, no frequency
/// bin in range, inconsistent per-channel results, or a failing worker. No
/// partial result is ever returned.
pub fn compute_raw_psd<R: RawSource>(
    raw: &R,
    tmin: f64,
    tmax: f64,
    picks: Option<&[usize]>,
    proj: bool,
    cfg: &PsdConfig,
) -> Result<(Array2<f64>, Array1<f64>)> {
    if tmin.is_nan() || tmax.is_nan() || tmin < 0.0 || tmin > tmax {
        return Err(PsdError::InvalidTimeRange { tmin, tmax, reason: "need 0 <= tmin <= tmax" }.into());
    }
    if let Some(p) = picks {
        check_picks(raw.info(), p)?;
    }

    // Only the stop saturates; a start past the last sample selects nothing.
    if tmin * raw.info().sfreq >= raw.n_times() as f64 {
        return Err(PsdError::InvalidTimeRange { tmin, tmax, reason: "tmin is past the end of the data" }.into());
    }
    let start = raw.time_as_index(tmin);
    let stop = raw.time_as_index(tmax);
    let mut data = raw.get_data(picks, start, stop + 1)?;

    if proj {
        let (full, rank) = make_projector_info(raw.info())?;
        let p = match picks {
            Some(sel) => restrict_projector(&full, sel),
            None => full,
        };
        data = apply_projector(&p, &data)?;
        debug!(rank, "applied SSP projector");
    }

    let sfreq = raw.info().sfreq;
    info!("Effective window size : {:.3} (s)", cfg.window_secs(sfreq));

    let parallel = Parallel::new(cfg.n_jobs)?;
    let rows: Vec<ArrayView1<f64>> = data.rows().into_iter().collect();
    let per_channel = parallel.map(&rows, |row| {
        psd_welch_1d(row.view(), sfreq, cfg.n_fft, cfg.n_overlap)
    })?;

    let (psd, freqs) = stack_psds(per_channel)?;
    let (psd, freqs) = mask_freqs(&psd, &freqs, cfg.fmin, cfg.fmax)?;
    debug!(shape = ?psd.dim(), n_jobs = parallel.n_jobs(), "raw psd done");
    Ok((psd, freqs))
}

/// PSD of every epoch and selected channel.
///
/// Mirrors `mne.time_frequency.compute_epochs_psd`. With `picks = None` the
/// MEG and EEG channels not marked bad are used ([`default_picks`]).
///
/// # Returns
///
/// `(psds, freqs)` with `psds` of shape `[n_epochs, n_picks, n_freqs]`.
///
/// # Errors
///
/// [`PsdError::NoEpochs`], [`PsdError::NoChannels`], any per-epoch failure
/// (including the epoch source's own errors), [`PsdError::ShapeMismatch`]
/// if an epoch's channel count disagrees with the source's info, or
/// [`PsdError::FrequencyMismatch`] if epochs disagree on frequencies.
pub fn compute_epochs_psd<E: EpochSource + Sync>(
    epochs: &E,
    picks: Option<&[usize]>,
    cfg: &PsdConfig,
) -> Result<(Array3<f64>, Array1<f64>)> {
    let info = epochs.info();
    let picks: Vec<usize> = match picks {
        Some(p) => {
            check_picks(info, p)?;
            p.to_vec()
        }
        None => default_picks(info),
    };
    if picks.is_empty() {
        return Err(PsdError::NoChannels.into());
    }
    let n_epochs = epochs.n_epochs();
    if n_epochs == 0 {
        return Err(PsdError::NoEpochs.into());
    }

    let sfreq = info.sfreq;
    info!("Effective window size : {:.3} (s)", cfg.window_secs(sfreq));

    let parallel = Parallel::new(cfg.n_jobs)?;
    let indices: Vec<usize> = (0..n_epochs).collect();
    let per_epoch = parallel.map(&indices, |&i| -> Result<(Array2<f64>, Array1<f64>)> {
        let epoch = epochs.get_epoch(i)?;
        if epoch.nrows() != info.n_chan() {
            return Err(PsdError::ShapeMismatch {
                what: "epoch channels",
                expected: vec![info.n_chan()],
                got: vec![epoch.nrows()],
            }
            .into());
        }
        let data = epoch.select(Axis(0), &picks);
        Ok(compute_psd_matrix(&data, sfreq, cfg)?)
    })?;

    let (psds, freqs): (Vec<_>, Vec<_>) = per_epoch.into_iter().unzip();
    let freqs = common_freqs(&freqs)?;
    let psds = stack_matrices(&psds)?;
    debug!(shape = ?psds.dim(), n_jobs = parallel.n_jobs(), "epochs psd done");
    Ok((psds, freqs))
}

/// Sequential per-channel PSD of one `[n_chan, n_times]` matrix, stacked and
/// masked to `[cfg.fmin, cfg.fmax]`. This is the unit of work of
/// [`compute_epochs_psd`].
pub fn compute_psd_matrix(
    data: &Array2<f64>,
    sfreq: f64,
    cfg: &PsdConfig,
) -> Result<(Array2<f64>, Array1<f64>), PsdError> {
    let per_channel = data
        .rows()
        .into_iter()
        .map(|row| psd_welch_1d(row, sfreq, cfg.n_fft, cfg.n_overlap))
        .collect::<Result<Vec<_>, _>>()?;
    let (psd, freqs) = stack_psds(per_channel)?;
    mask_freqs(&psd, &freqs, cfg.fmin, cfg.fmax)
}

/// Stack per-channel `(psd, freqs)` pairs into `[n_chan, n_freqs]`, keeping
/// the (verified) common frequency vector.
fn stack_psds(units: Vec<(Array1<f64>, Array1<f64>)>) -> Result<(Array2<f64>, Array1<f64>), PsdError> {
    if units.is_empty() {
        return Err(PsdError::NoChannels);
    }
    let (psds, freqs): (Vec<_>, Vec<_>) = units.into_iter().unzip();
    let freqs = common_freqs(&freqs)?;
    Ok((stack_rows(&psds)?, freqs))
}

/// Stack per-epoch `[n_chan, n_freqs]` matrices along a new leading axis.
fn stack_matrices(mats: &[Array2<f64>]) -> Result<Array3<f64>, PsdError> {
    let (n_ch, n_f) = mats.first().map_or((0, 0), |m| m.dim());
    if let Some(bad) = mats.iter().find(|m| m.dim() != (n_ch, n_f)) {
        return Err(PsdError::ShapeMismatch {
            what: "per-epoch psd",
            expected: vec![n_ch, n_f],
            got: bad.shape().to_vec(),
        });
    }
    let mut out = Array3::<f64>::zeros((mats.len(), n_ch, n_f));
    for (e, m) in mats.iter().enumerate() {
        out.slice_mut(s![e, .., ..]).assign(m);
    }
    Ok(out)
}

fn check_picks(info: &MeasInfo, picks: &[usize]) -> Result<(), PsdError> {
    if picks.is_empty() {
        return Err(PsdError::NoChannels);
    }
    info.check_picks(picks)
}
