//! Signal-space projection (SSP) operators.
//!
//! Matches `mne.io.proj.make_projector` / `make_projector_info`:
//!
//! ```text
//! 1. lay each projection vector out on the channel axis (by name)
//! 2. zero the entries of bad channels, normalise to unit length
//! 3. orthonormalise  →  U [n_chan, rank]
//! 4. P = I − U Uᵀ
//! ```
//!
//! MNE takes the left singular vectors of the stacked vectors and drops those
//! whose singular value is below 1 % of the largest. Here the basis comes from
//! modified Gram–Schmidt with the same 1 % cut applied to each residual, which
//! spans the same subspace for any well-conditioned set of vectors. For nearly
//! collinear vectors the cut is looser than MNE's: two unit vectors at angle θ
//! keep rank 2 while `sin θ > 0.01`, where the SVD cut needs `tan(θ/2) > 0.01`.
use ndarray::{Array1, Array2, Axis};

use crate::error::PsdError;
use crate::info::{MeasInfo, Projection};

/// Relative residual norm below which a projection vector is considered
/// linearly dependent on the ones before it.
const RANK_TOL: f64 = 1e-2;

/// Build the `[n_chan, n_chan]` projector for `projs` over `ch_names`.
///
/// Returns `(projector, rank)`. With no usable vectors the projector is the
/// identity and `rank == 0`.
pub fn make_projector<S: AsRef<str>>(
    projs: &[Projection],
    ch_names: &[S],
    bads: &[String],
) -> Result<(Array2<f64>, usize), PsdError> {
    let n_chan = ch_names.len();
    let mut basis: Vec<Array1<f64>> = Vec::new();

    for p in projs {
        if p.vectors.ncols() != p.ch_names.len() {
            return Err(PsdError::ShapeMismatch {
                what: "projection vectors",
                expected: vec![p.vectors.nrows(), p.ch_names.len()],
                got: p.vectors.shape().to_vec(),
            });
        }
        // Position of each projection channel on the data channel axis, if
        // present and not bad.
        let positions: Vec<Option<usize>> = p
            .ch_names
            .iter()
            .map(|name| {
                if bads.iter().any(|b| b == name) {
                    return None;
                }
                ch_names.iter().position(|c| c.as_ref() == name)
            })
            .collect();

        for row in p.vectors.rows() {
            let mut v = Array1::<f64>::zeros(n_chan);
            for (&val, pos) in row.iter().zip(&positions) {
                if let Some(i) = *pos {
                    v[i] = val;
                }
            }
            let norm = v.dot(&v).sqrt();
            if norm == 0.0 {
                continue;
            }
            v /= norm;

            // Two passes of modified Gram–Schmidt keep the basis orthogonal
            // to working precision.
            for _ in 0..2 {
                for b in &basis {
                    let c = b.dot(&v);
                    v.scaled_add(-c, b);
                }
            }
            let resid = v.dot(&v).sqrt();
            if resid > RANK_TOL {
                v /= resid;
                basis.push(v);
            }
        }
    }

    let mut proj = Array2::<f64>::eye(n_chan);
    for b in &basis {
        let col = b.view().insert_axis(Axis(1));
        let row = b.view().insert_axis(Axis(0));
        proj -= &col.dot(&row);
    }
    Ok((proj, basis.len()))
}

/// Projector for every projection item in `info`, with bad channels excluded.
pub fn make_projector_info(info: &MeasInfo) -> Result<(Array2<f64>, usize), PsdError> {
    make_projector(&info.projs, &info.ch_names(), &info.bads)
}

/// Restrict a full projector to a channel selection on **both** axes:
/// `proj[picks][:, picks]`.
pub fn restrict_projector(proj: &Array2<f64>, picks: &[usize]) -> Array2<f64> {
    proj.select(Axis(0), picks).select(Axis(1), picks)
}

/// `proj · data`, checking that the projector is square and matches the
/// channel axis of `data`.
pub fn apply_projector(proj: &Array2<f64>, data: &Array2<f64>) -> Result<Array2<f64>, PsdError> {
    let (rows, cols) = proj.dim();
    if rows != cols || cols != data.nrows() {
        return Err(PsdError::ProjectorShape { rows, cols, n_chan: data.nrows() });
    }
    Ok(proj.dot(data))
}
