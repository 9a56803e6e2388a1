//! Compressed concatenated hash values

use core::fmt;

use crate::bits::{BitOps, BitVector};
use crate::estimators::j_hat_from_conc;
use crate::traits::{Result, SketchError};

/// An immutable concatenated 1-bit minhash
///
/// Carries the packed bits, the number of significant bits `m`, and the
/// XOR compression factor `N`: the number of original minhash bits folded
/// into each surviving bit (1 until [`xor_fold`](Self::xor_fold) is applied).
///
/// # Example
///
/// ```
/// use setsketch::bits::BitVector;
/// use setsketch::minhash::CompressedHash;
///
/// let h = CompressedHash::new(BitVector::from(0b1011_0110), 8).unwrap();
/// let folded = h.xor_fold(2).unwrap();
///
/// // 1011 ^ 0110
/// assert_eq!(folded.digits(), "1101");
/// assert_eq!(folded.compression_factor(), 2);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CompressedHash {
    value: BitVector,
    /// Significant bits (m)
    bits: usize,
    /// XOR compression factor (N)
    factor: usize,
}

impl CompressedHash {
    /// Wrap `value` as an uncompressed hash of `bits` significant bits
    ///
    /// Returns [`SketchError::InvalidParameter`] if `bits` is 0 or `value`
    /// does not fit in `bits` bits.
    pub fn new(value: BitVector, bits: usize) -> Result<Self> {
        if bits == 0 {
            return Err(SketchError::InvalidParameter(
                "hash must have at least one significant bit".into(),
            ));
        }
        if !value.is_zero() && value.numdigits() > bits {
            return Err(SketchError::InvalidParameter(format!(
                "value needs {} bits but only {} are significant",
                value.numdigits(),
                bits
            )));
        }
        Ok(Self::from_parts(value, bits, 1))
    }

    pub(crate) fn from_parts(value: BitVector, bits: usize, factor: usize) -> Self {
        Self {
            value,
            bits,
            factor,
        }
    }

    /// The packed bits
    pub fn value(&self) -> &BitVector {
        &self.value
    }

    /// Number of significant bits (m)
    pub fn significant_bits(&self) -> usize {
        self.bits
    }

    /// XOR compression factor (N)
    pub fn compression_factor(&self) -> usize {
        self.factor
    }

    /// Keep only the `bits` least-significant bits
    ///
    /// The compression factor is carried over, since every surviving bit is
    /// still a fold of that many original bits.
    ///
    /// # Errors
    ///
    /// - [`SketchError::InvalidParameter`] if `bits` is 0
    /// - [`SketchError::CompressionTooLarge`] if `bits` exceeds the current width
    pub fn compressed(&self, bits: usize) -> Result<Self> {
        if bits == 0 {
            return Err(SketchError::InvalidParameter(
                "cannot compress a hash to zero bits".into(),
            ));
        }
        if bits > self.bits {
            return Err(SketchError::CompressionTooLarge {
                current: self.bits,
                requested: bits,
            });
        }
        let value = self.value.lowbits(bits)?;
        Ok(Self::from_parts(value, bits, self.factor))
    }

    /// Fold the hash into `n` equal chunks combined with XOR
    ///
    /// `n` must be a positive power of two dividing the current width; the
    /// result has width `m / n` and compression factor `N * n`.
    pub fn xor_fold(&self, n: usize) -> Result<Self> {
        if !n.is_power_of_two() {
            return Err(SketchError::NotPowerOfTwo(n));
        }
        let chunk = self.bits / n;
        if chunk * n != self.bits {
            return Err(SketchError::IndivisibleWidth {
                width: self.bits,
                factor: n,
            });
        }

        let mut folded = BitVector::new();
        let mut rest = self.value.clone();
        for _ in 0..n {
            folded = &folded ^ &rest.lowbits(chunk)?;
            rest = &rest >> chunk;
        }
        Ok(Self::from_parts(folded, chunk, self.factor * n))
    }

    /// Zero-padded binary rendering, `m` characters wide
    pub fn digits(&self) -> String {
        self.value.digits(Some(self.bits))
    }

    /// Estimate the Jaccard similarity of the sets behind two comparable hashes
    ///
    /// Both hashes must have the same width and compression factor.
    pub fn estimate_jaccard(&self, other: &Self, truncate: bool) -> Result<f64> {
        if self.bits != other.bits {
            return Err(SketchError::LengthMismatch {
                expected: self.bits,
                found: other.bits,
            });
        }
        if self.factor != other.factor {
            return Err(SketchError::InvalidParameter(format!(
                "compression factors differ: {} vs {}",
                self.factor, other.factor
            )));
        }
        j_hat_from_conc(&self.value, &other.value, self.bits, self.factor, truncate)
    }
}

impl fmt::Display for CompressedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits())
    }
}

impl fmt::LowerHex for CompressedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}
