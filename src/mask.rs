//! Frequency masking and shape-checked stacking of per-unit PSDs.
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Dimension, RemoveAxis, Zip};

use crate::error::PsdError;

/// `freqs >= fmin && freqs <= fmax`, element-wise (inclusive both ends).
pub fn freq_mask(freqs: &Array1<f64>, fmin: f64, fmax: f64) -> Vec<bool> {
    freqs.iter().map(|&f| f >= fmin && f <= fmax).collect()
}

/// Keep only the frequency bins in `[fmin, fmax]`.
///
/// `psd` may have any number of axes; its **last** axis indexes frequency and
/// must have `freqs.len()` entries. Returns `(psd[..., mask], freqs[mask])`
/// with the original bin order.
///
/// # Errors
///
/// - [`PsdError::InvalidFrequencyRange`] if `fmin > fmax` or either is NaN.
/// - [`PsdError::EmptyFrequencyMask`] if no bin survives.
/// - [`PsdError::ShapeMismatch`] if the last axis of `psd` does not match
///   `freqs`.
pub fn mask_freqs<S, D>(
    psd: &ArrayBase<S, D>,
    freqs: &Array1<f64>,
    fmin: f64,
    fmax: f64,
) -> Result<(ndarray::Array<f64, D>, Array1<f64>), PsdError>
where
    S: Data<Elem = f64>,
    D: Dimension + RemoveAxis,
{
    if fmin.is_nan() || fmax.is_nan() || fmin > fmax {
        return Err(PsdError::InvalidFrequencyRange { fmin, fmax });
    }
    let last = Axis(psd.ndim() - 1);
    if psd.len_of(last) != freqs.len() {
        return Err(PsdError::ShapeMismatch {
            what: "psd frequency axis",
            expected: vec![freqs.len()],
            got: vec![psd.len_of(last)],
        });
    }

    let keep: Vec<usize> = freq_mask(freqs, fmin, fmax)
        .iter()
        .enumerate()
        .filter_map(|(i, &m)| m.then_some(i))
        .collect();
    if keep.is_empty() {
        return Err(PsdError::EmptyFrequencyMask {
            fmin,
            fmax,
            lo: freqs.first().copied().unwrap_or(f64::NAN),
            hi: freqs.last().copied().unwrap_or(f64::NAN),
        });
    }

    Ok((psd.select(last, &keep), freqs.select(Axis(0), &keep)))
}

/// Stack equal-length rows into `[n_rows, row_len]`.
///
/// # Errors
///
/// [`PsdError::ShapeMismatch`] naming the first row whose length differs from
/// row 0.
pub fn stack_rows(rows: &[Array1<f64>]) -> Result<Array2<f64>, PsdError> {
    let n_cols = rows.first().map_or(0, |r| r.len());
    if let Some(bad) = rows.iter().find(|r| r.len() != n_cols) {
        return Err(PsdError::ShapeMismatch {
            what: "per-channel psd",
            expected: vec![n_cols],
            got: vec![bad.len()],
        });
    }
    let mut out = Array2::<f64>::zeros((rows.len(), n_cols));
    for (mut dst, src) in out.rows_mut().into_iter().zip(rows) {
        dst.assign(src);
    }
    Ok(out)
}

/// Check that every frequency vector equals the first one exactly, and return
/// the first.
///
/// # Errors
///
/// [`PsdError::FrequencyMismatch`] with the index of the first differing unit.
pub fn common_freqs(freqs: &[Array1<f64>]) -> Result<Array1<f64>, PsdError> {
    let first = freqs.first().cloned().unwrap_or_else(|| Array1::zeros(0));
    for (unit, f) in freqs.iter().enumerate().skip(1) {
        let same = f.len() == first.len()
            && Zip::from(f).and(&first).all(|&a, &b| a == b);
        if !same {
            return Err(PsdError::FrequencyMismatch { unit });
        }
    }
    Ok(first)
}
