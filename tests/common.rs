/// Shared builders for synthetic recordings.
use exg_psd::{MeasInfo, RawArray, FIFFV_EEG_CH};
use ndarray::{Array1, Array2, Array3};
use std::f64::consts::PI;

#[allow(unused)]
/// EEG-only info with channels named `EEG 000`, `EEG 001`, …
pub fn eeg_info(n_ch: usize, sfreq: f64) -> MeasInfo {
    let names: Vec<String> = (0..n_ch).map(|i| format!("EEG {i:03}")).collect();
    MeasInfo::new(&names, sfreq, FIFFV_EEG_CH)
}

#[allow(unused)]
/// `[n_ch, n_t]` where channel `c` is a sinusoid at `freq · (c + 1)` Hz with
/// amplitude `c + 1`.
pub fn harmonic_data(n_ch: usize, n_t: usize, sfreq: f64, freq: f64) -> Array2<f64> {
    Array2::from_shape_fn((n_ch, n_t), |(c, t)| {
        let k = (c + 1) as f64;
        k * (2.0 * PI * freq * k * t as f64 / sfreq).sin()
    })
}

#[allow(unused)]
/// Deterministic pseudo-noise (xorshift) in `[-1, 1)`.
pub fn noise_data(n_ch: usize, n_t: usize, seed: u64) -> Array2<f64> {
    let mut state = seed.max(1);
    Array2::from_shape_fn((n_ch, n_t), |_| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 52) as f64 - 1.0
    })
}

#[allow(unused)]
pub fn raw_array(data: Array2<f64>, sfreq: f64) -> RawArray {
    let info = eeg_info(data.nrows(), sfreq);
    RawArray::new(data, info).unwrap()
}

#[allow(unused)]
/// `n_epochs` copies of `epoch` stacked into `[E, C, T]`.
pub fn repeat_epoch(epoch: &Array2<f64>, n_epochs: usize) -> Array3<f64> {
    let (n_ch, n_t) = epoch.dim();
    Array3::from_shape_fn((n_epochs, n_ch, n_t), |(_, c, t)| epoch[[c, t]])
}

#[allow(unused)]
/// Index of the largest element.
pub fn argmax(x: &Array1<f64>) -> usize {
    x.iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(bi, bv), (i, &v)| if v > bv { (i, v) } else { (bi, bv) })
        .0
}

#[allow(unused)]
/// Maximum absolute difference between two arrays of equal shape.
pub fn max_abs_diff<D: ndarray::Dimension>(a: &ndarray::Array<f64, D>, b: &ndarray::Array<f64, D>) -> f64 {
    assert_eq!(a.shape(), b.shape(), "shape mismatch");
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).fold(0.0_f64, f64::max)
}
