//! Continuous recordings.
//!
//! [`RawSource`] is the contract PSD estimation needs from a continuous
//! recording; [`RawArray`] is the in-memory implementation (MNE's
//! `mne.io.RawArray`). File-backed readers implement the trait themselves and
//! report their I/O failures through the `anyhow::Result` of
//! [`RawSource::get_data`].
use anyhow::Result;
use ndarray::{s, Array1, Array2, Axis};

use crate::error::PsdError;
use crate::info::MeasInfo;

/// A continuous `[n_chan, n_times]` recording with measurement info.
pub trait RawSource {
    fn info(&self) -> &MeasInfo;

    /// Number of time samples.
    fn n_times(&self) -> usize;

    /// Data for channels `picks` (all channels if `None`) over the half-open
    /// sample range `[start, stop)`. `stop` past the end is clamped.
    fn get_data(&self, picks: Option<&[usize]>, start: usize, stop: usize) -> Result<Array2<f64>>;

    /// Sample index of time `t` (seconds from the first sample).
    ///
    /// `t · sfreq` is truncated toward zero and saturates to
    /// `[0, n_times − 1]`, so `f64::INFINITY` maps to the last sample.
    fn time_as_index(&self, t: f64) -> usize {
        let idx = (t * self.info().sfreq) as usize;
        idx.min(self.n_times().saturating_sub(1))
    }

    /// Sample times in seconds, `[0, 1/sfreq, …]`.
    fn times(&self) -> Array1<f64> {
        let sfreq = self.info().sfreq;
        Array1::from_shape_fn(self.n_times(), |i| i as f64 / sfreq)
    }

    /// Total duration in seconds.
    fn duration_secs(&self) -> f64 {
        self.n_times() as f64 / self.info().sfreq
    }
}

/// Continuous data held in memory.
#[derive(Debug, Clone)]
pub struct RawArray {
    pub info: MeasInfo,
    /// `[n_chan, n_times]`.
    pub data: Array2<f64>,
}

impl RawArray {
    /// Wrap `data` (`[n_chan, n_times]`); the channel axis must match `info`.
    pub fn new(data: Array2<f64>, info: MeasInfo) -> Result<Self, PsdError> {
        if data.nrows() != info.n_chan() {
            return Err(PsdError::ShapeMismatch {
                what: "raw data channels",
                expected: vec![info.n_chan()],
                got: vec![data.nrows()],
            });
        }
        Ok(Self { info, data })
    }
}

impl RawSource for RawArray {
    fn info(&self) -> &MeasInfo {
        &self.info
    }

    fn n_times(&self) -> usize {
        self.data.ncols()
    }

    fn get_data(&self, picks: Option<&[usize]>, start: usize, stop: usize) -> Result<Array2<f64>> {
        let stop = stop.min(self.n_times());
        if start >= stop {
            let sfreq = self.info.sfreq;
            return Err(PsdError::InvalidTimeRange {
                tmin: start as f64 / sfreq,
                tmax: stop as f64 / sfreq,
                reason: "empty sample range",
            }
            .into());
        }
        let window = self.data.slice(s![.., start..stop]);
        Ok(match picks {
            Some(p) => {
                self.info.check_picks(p)?;
                window.select(Axis(0), p)
            }
            None => window.to_owned(),
        })
    }
}
