//! Measurement info (MNE's `Info`): channel metadata, bad channels and SSP
//! projection vectors.
//!
//! Only the fields PSD estimation needs are modelled; positions, filters and
//! acquisition details are left to whatever reader produced the data.
use ndarray::Array2;

use crate::error::PsdError;

// ── Channel kinds ─────────────────────────────────────────────────────────
//
// Values mirror `mne/_fiff/constants.py` so kinds read from a FIF file can be
// passed through unchanged.

/// MEG channel.
pub const FIFFV_MEG_CH:  i32 = 1;
/// EEG channel.
pub const FIFFV_EEG_CH:  i32 = 2;
/// Stimulus / trigger channel.
pub const FIFFV_STIM_CH: i32 = 3;
/// Electro-oculogram.
pub const FIFFV_EOG_CH:  i32 = 202;
/// Electromyogram.
pub const FIFFV_EMG_CH:  i32 = 302;
/// Electrocardiogram.
pub const FIFFV_ECG_CH:  i32 = 402;
/// Miscellaneous analog channel.
pub const FIFFV_MISC_CH: i32 = 502;
/// Stereo-EEG depth electrode.
pub const FIFFV_SEEG_CH: i32 = 802;
/// Electrocorticography.
pub const FIFFV_ECOG_CH: i32 = 902;

// ── Channel info ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelInfo {
    pub name: String,
    /// One of the `FIFFV_*_CH` constants.
    pub kind: i32,
}

impl ChannelInfo {
    pub fn new(name: impl Into<String>, kind: i32) -> Self {
        Self { name: name.into(), kind }
    }
}

// ── SSP projection ────────────────────────────────────────────────────────

/// One SSP projection item (`info['projs'][i]` in MNE).
///
/// `vectors` is `[n_vec, ch_names.len()]`: each row is a spatial pattern to be
/// projected out, expressed over the channels named in `ch_names`. Items
/// carry no active flag; [`crate::make_projector_info`] applies all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub desc:     String,
    pub ch_names: Vec<String>,
    pub vectors:  Array2<f64>,
}

impl Projection {
    /// Build a projection item, checking that `vectors` has one column per
    /// channel name.
    pub fn new(
        desc: impl Into<String>,
        ch_names: Vec<String>,
        vectors: Array2<f64>,
    ) -> Result<Self, PsdError> {
        if vectors.ncols() != ch_names.len() {
            return Err(PsdError::ShapeMismatch {
                what: "projection vectors",
                expected: vec![vectors.nrows(), ch_names.len()],
                got: vectors.shape().to_vec(),
            });
        }
        Ok(Self { desc: desc.into(), ch_names, vectors })
    }
}

// ── Measurement info ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct MeasInfo {
    /// Sampling frequency in Hz.
    pub sfreq: f64,
    pub chs:   Vec<ChannelInfo>,
    /// Names of channels marked bad.
    pub bads:  Vec<String>,
    pub projs: Vec<Projection>,
}

impl MeasInfo {
    /// Info for `ch_names.len()` channels, all of the same `kind`, with no bad
    /// channels and no projections. Mirrors `mne.create_info`.
    pub fn new<S: AsRef<str>>(ch_names: &[S], sfreq: f64, kind: i32) -> Self {
        let chs = ch_names
            .iter()
            .map(|n| ChannelInfo::new(n.as_ref(), kind))
            .collect();
        Self { sfreq, chs, bads: vec![], projs: vec![] }
    }

    #[inline]
    pub fn n_chan(&self) -> usize {
        self.chs.len()
    }

    /// Channel names in order.
    pub fn ch_names(&self) -> Vec<&str> {
        self.chs.iter().map(|c| c.name.as_str()).collect()
    }

    /// Whether channel `idx` is listed in [`MeasInfo::bads`].
    pub fn is_bad(&self, idx: usize) -> bool {
        self.chs
            .get(idx)
            .is_some_and(|ch| self.bads.iter().any(|b| *b == ch.name))
    }

    /// Check every index in `picks` against the channel count.
    pub fn check_picks(&self, picks: &[usize]) -> Result<(), PsdError> {
        let n_chan = self.n_chan();
        match picks.iter().find(|&&i| i >= n_chan) {
            Some(&index) => Err(PsdError::ChannelOutOfRange { index, n_chan }),
            None => Ok(()),
        }
    }
}

// ── Channel picking ───────────────────────────────────────────────────────

/// Indices of MEG and/or EEG channels, in channel order.
///
/// Mirrors `mne.pick_types(info, meg=meg, eeg=eeg, exclude='bads')` when
/// `exclude_bads` is set.
pub fn pick_types(info: &MeasInfo, meg: bool, eeg: bool, exclude_bads: bool) -> Vec<usize> {
    info.chs
        .iter()
        .enumerate()
        .filter(|(_, ch)| (meg && ch.kind == FIFFV_MEG_CH) || (eeg && ch.kind == FIFFV_EEG_CH))
        .filter(|(i, _)| !(exclude_bads && info.is_bad(*i)))
        .map(|(i, _)| i)
        .collect()
}

/// Default channel selection for epochs PSD: all MEG and EEG channels that are
/// not marked bad.
pub fn default_picks(info: &MeasInfo) -> Vec<usize> {
    pick_types(info, true, true, true)
}
