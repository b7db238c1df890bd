//! Epoched recordings.
//!
//! [`EpochSource`] yields one `[n_chan, n_times]` matrix per epoch, all sharing
//! one [`MeasInfo`]. [`EpochsArray`] keeps them in a single `[E, C, T]` array;
//! other implementations may produce epochs lazily.
use anyhow::Result;
use ndarray::{s, Array2, Array3};

use crate::error::PsdError;
use crate::info::MeasInfo;
use crate::raw::RawSource;

pub trait EpochSource {
    fn info(&self) -> &MeasInfo;

    fn n_epochs(&self) -> usize;

    /// Epoch `idx` as `[n_chan, n_times]`.
    fn get_epoch(&self, idx: usize) -> Result<Array2<f64>>;
}

/// Epochs held in memory as `[n_epochs, n_chan, n_times]`.
#[derive(Debug, Clone)]
pub struct EpochsArray {
    pub info: MeasInfo,
    pub data: Array3<f64>,
}

impl EpochsArray {
    /// Wrap `data` (`[E, C, T]`); the channel axis must match `info`.
    pub fn new(data: Array3<f64>, info: MeasInfo) -> Result<Self, PsdError> {
        let (_, n_ch, _) = data.dim();
        if n_ch != info.n_chan() {
            return Err(PsdError::ShapeMismatch {
                what: "epochs channels",
                expected: vec![info.n_chan()],
                got: vec![n_ch],
            });
        }
        Ok(Self { info, data })
    }

    /// Samples per epoch.
    pub fn n_times(&self) -> usize {
        self.data.dim().2
    }
}

impl EpochSource for EpochsArray {
    fn info(&self) -> &MeasInfo {
        &self.info
    }

    fn n_epochs(&self) -> usize {
        self.data.dim().0
    }

    fn get_epoch(&self, idx: usize) -> Result<Array2<f64>> {
        let n_epochs = self.n_epochs();
        anyhow::ensure!(idx < n_epochs, "epoch {idx} out of range for {n_epochs} epochs");
        Ok(self.data.slice(s![idx, .., ..]).to_owned())
    }
}

/// Cut `raw` into non-overlapping epochs of `duration` seconds.
///
/// Mirrors `mne.make_fixed_length_epochs(raw, duration)` without baseline
/// correction. Trailing samples that do not fill a complete epoch are
/// discarded; a recording shorter than one epoch gives zero epochs.
pub fn make_fixed_length_epochs<R: RawSource>(raw: &R, duration: f64) -> Result<EpochsArray> {
    let info = raw.info().clone();
    let epoch_samples = (duration * info.sfreq) as usize;
    anyhow::ensure!(
        epoch_samples > 0,
        "epoch duration {duration} s is shorter than one sample at {} Hz",
        info.sfreq
    );

    let n_ch = info.n_chan();
    let n_epochs = raw.n_times() / epoch_samples;

    let mut out = Array3::<f64>::zeros((n_epochs, n_ch, epoch_samples));
    for e in 0..n_epochs {
        let start = e * epoch_samples;
        let data = raw.get_data(None, start, start + epoch_samples)?;
        if data.dim() != (n_ch, epoch_samples) {
            return Err(PsdError::ShapeMismatch {
                what: "raw window",
                expected: vec![n_ch, epoch_samples],
                got: data.shape().to_vec(),
            }
            .into());
        }
        out.slice_mut(s![e, .., ..]).assign(&data);
    }
    Ok(EpochsArray::new(out, info)?)
}
