//! Jaccard estimators for MinHash signatures
//!
//! The concatenated-hash estimator follows from the fact that two 1-bit
//! minima agree with probability `(1 + J) / 2`; after XOR folding `N` bits,
//! agreement has probability `(1 + J^N) / 2`. Inverting the observed
//! agreement rate gives `(1 - 2d/m)^(1/N)` for Hamming distance `d`.

use crate::bits::{hamdist, BitVector};
use crate::minhash::CompressedHash;
use crate::traits::{ErrorBounds, Result, SketchError};

/// b-bit MinHash Jaccard estimate
///
/// The raw match rate of the `b` lowest bits overcounts by the chance that
/// two random `b`-bit values agree, `c = 2^-b`; the estimate is
/// `(matches / m - c) / (1 - c)`. It is not truncated and can be negative.
///
/// # Errors
///
/// - [`SketchError::LengthMismatch`] if the signatures differ in length
/// - [`SketchError::InvalidParameter`] if they are empty or `b` is 0
///
/// Any `b >= 64` compares whole values.
pub fn j_hat(hashes1: &[u64], hashes2: &[u64], b: u32) -> Result<f64> {
    if hashes1.len() != hashes2.len() {
        return Err(SketchError::LengthMismatch {
            expected: hashes1.len(),
            found: hashes2.len(),
        });
    }
    if hashes1.is_empty() {
        return Err(SketchError::InvalidParameter(
            "signatures must not be empty".into(),
        ));
    }
    if b == 0 {
        return Err(SketchError::InvalidParameter("b must be > 0".into()));
    }

    let mask = if b >= 64 { u64::MAX } else { (1u64 << b) - 1 };
    let matches = hashes1
        .iter()
        .zip(hashes2)
        .filter(|(x, y)| (*x & mask) == (*y & mask))
        .count();
    let rate = matches as f64 / hashes1.len() as f64;
    let c = (-f64::from(b)).exp2();
    Ok((rate - c) / (1.0 - c))
}

/// Concatenated-hash Jaccard estimate `(1 - 2·hamdist(a, b)/m)^(1/n)`
///
/// `m` is the number of significant bits and `n` the XOR compression factor.
/// A negative base has no real root when `n > 1`, so 0 is returned. With
/// `truncate`, negative estimates are clamped to 0.
///
/// # Errors
///
/// [`SketchError::InvalidParameter`] if `m` or `n` is 0.
pub fn j_hat_from_conc(
    a: &BitVector,
    b: &BitVector,
    m: usize,
    n: usize,
    truncate: bool,
) -> Result<f64> {
    if m == 0 || n == 0 {
        return Err(SketchError::InvalidParameter(
            "hash width and compression factor must be > 0".into(),
        ));
    }
    let base = 1.0 - 2.0 * hamdist(a, b) as f64 / m as f64;
    if base < 0.0 && n > 1 {
        return Ok(0.0);
    }
    let res = if n == 1 { base } else { base.powf(1.0 / n as f64) };
    if truncate && res < 0.0 {
        return Ok(0.0);
    }
    Ok(res)
}

/// Variance of the untruncated concatenated estimator
///
/// For true Jaccard `j`, `m` significant bits and compression factor `n`;
/// approximate (first-order delta method) when `n > 1`.
pub fn var_j_hat(j: f64, m: usize, n: usize) -> f64 {
    let (m, nf) = (m as f64, n as f64);
    (1.0 / j.powi(2 * n as i32 - 2) - j * j) / m / nf / nf
}

/// Expected value of the untruncated concatenated estimator (approximate for `n > 1`)
pub fn mean_j_hat(j: f64, m: usize, n: usize) -> f64 {
    if n == 1 {
        return j;
    }
    let (m, nf) = (m as f64, n as f64);
    j - (nf - 1.0) * (1.0 / j.powi(2 * n as i32 - 1) - j) / m / nf / nf / 2.0
}

/// Mean squared error of the untruncated concatenated estimator
pub fn mse_j_hat(j: f64, m: usize, n: usize) -> f64 {
    let var = var_j_hat(j, m, n);
    if n == 1 {
        return var;
    }
    let bias = j - mean_j_hat(j, m, n);
    var + bias * bias
}

/// Truncated concatenated estimate with normal-approximation bounds
///
/// The standard error is taken from [`var_j_hat`] at the point estimate.
/// Bounds are clipped to `[0, 1]`; where the variance is undefined (a zero
/// estimate after folding) they span the whole interval.
pub fn conc_error_bounds(
    a: &CompressedHash,
    b: &CompressedHash,
    confidence: f64,
) -> Result<ErrorBounds> {
    let estimate = a.estimate_jaccard(b, true)?;
    let var = var_j_hat(estimate, a.significant_bits(), a.compression_factor());
    if !var.is_finite() {
        return Ok(ErrorBounds::new(0.0, estimate, 1.0, confidence));
    }
    let margin = ErrorBounds::z_score(confidence) * var.max(0.0).sqrt();
    Ok(ErrorBounds::new(
        (estimate - margin).max(0.0),
        estimate,
        (estimate + margin).min(1.0),
        confidence,
    ))
}
