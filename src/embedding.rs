use tumor_common::{CaError, Result};

/// Delay-coordinate reconstruction of a scalar series.
///
/// Returns `n - (d-1)*tau` vectors; vector `i` is
/// `(series[i], series[i+tau], ..., series[i+(d-1)*tau])`.
pub fn reconstruct(series: &[f64], tau: usize, dimension: usize) -> Result<Vec<Vec<f64>>> {
    if dimension == 0 {
        return Err(CaError::ZeroDimension);
    }
    let n = series.len();
    // An overflowing span is longer than any series.
    let span = (dimension - 1)
        .checked_mul(tau)
        .filter(|&span| span < n)
        .ok_or(CaError::SeriesTooShort {
            len: n,
            tau,
            dimension,
        })?;
    Ok((0..n - span)
        .map(|i| (0..dimension).map(|k| series[i + k * tau]).collect())
        .collect())
}
