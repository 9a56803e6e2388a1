//! Similarity estimators for Bloom filter bit vectors
//!
//! The inputs are the raw bit vectors of two filters built with the same
//! width and hash functions (see [`BloomFilter::bits`](crate::membership::BloomFilter::bits)).

use crate::bits::{BitOps, BitVector};
use crate::traits::{Result, SketchError};

/// Jaccard estimate from set bits: `|a AND b| / |a OR b|`
pub fn j_hat_from_bf(a: &BitVector, b: &BitVector) -> Result<f64> {
    let union = (a | b).popcount();
    if union == 0 {
        return Err(SketchError::Undefined("both bloom filters are empty"));
    }
    Ok((a & b).popcount() as f64 / union as f64)
}

/// Dice estimate from set bits: `2|a AND b| / (|a| + |b|)`
pub fn d_hat_from_bf(a: &BitVector, b: &BitVector) -> Result<f64> {
    let total = a.popcount() + b.popcount();
    if total == 0 {
        return Err(SketchError::Undefined("both bloom filters are empty"));
    }
    Ok(2.0 * (a & b).popcount() as f64 / total as f64)
}

/// Cardinality proxy `-m ln(1 - X/m)` for a vector with `X` set bits
fn occupancy(bits_set: usize, m: f64) -> f64 {
    -m * (1.0 - bits_set as f64 / m).ln()
}

/// Bias-corrected Jaccard estimate (Swamidass & Baldi, 2007)
///
/// Set sizes are estimated from bit occupancy and combined by
/// inclusion-exclusion: `max(A + B - AB, 0) / min(AB, A + B)`.
///
/// # Errors
///
/// - [`SketchError::InvalidParameter`] if `m` is 0
/// - [`SketchError::Undefined`] if the union is saturated (every bit set)
///   or both filters are empty
pub fn j_hat_from_bf_corrected(a: &BitVector, b: &BitVector, m: usize) -> Result<f64> {
    if m == 0 {
        return Err(SketchError::InvalidParameter(
            "bloom filter width must be > 0".into(),
        ));
    }
    let union_bits = (a | b).popcount();
    if union_bits >= m {
        return Err(SketchError::Undefined("bloom filter union is saturated"));
    }

    let mf = m as f64;
    let size_a = occupancy(a.popcount(), mf);
    let size_b = occupancy(b.popcount(), mf);
    let size_ab = occupancy(union_bits, mf);

    let num = (size_a + size_b - size_ab).max(0.0);
    let denom = size_ab.min(size_a + size_b);
    if denom == 0.0 {
        return Err(SketchError::Undefined("both bloom filters are empty"));
    }
    Ok(num / denom)
}
