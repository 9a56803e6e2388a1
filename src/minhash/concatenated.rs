//! Concatenated 1-bit minwise hashing

use super::bbit::BBit;
use super::compressed::CompressedHash;
use super::minwise::token_set;
use crate::bits::BitVector;
use crate::traits::{Result, SetSketcher};

/// Packs `m` one-bit minwise values into a single `m`-bit hash
///
/// The first minwise value becomes the most significant bit. Two hashes are
/// compared through their Hamming distance, see
/// [`CompressedHash::estimate_jaccard`].
///
/// # Example
///
/// ```
/// use setsketch::minhash::Concatenated;
/// use setsketch::traits::SetSketcher;
///
/// let sketcher = Concatenated::with_seed(64, 7).unwrap();
/// let a = sketcher.hash(["the", "quick", "brown", "fox"]).unwrap();
/// let b = sketcher.hash(["the", "quick", "brown", "dog"]).unwrap();
///
/// assert_eq!(a.significant_bits(), 64);
/// let estimate = a.estimate_jaccard(&b, true).unwrap();
/// assert!((0.0..=1.0).contains(&estimate));
/// ```
#[derive(Clone, Debug)]
pub struct Concatenated {
    inner: BBit,
}

impl Concatenated {
    /// Create a sketcher of `m` bits with 64-bit hashes and random tables
    pub fn new(m: usize) -> Result<Self> {
        Self::with_params(m, 64, None)
    }

    /// Create a reproducible sketcher of `m` bits
    pub fn with_seed(m: usize, seed: u64) -> Result<Self> {
        Self::with_params(m, 64, Some(seed))
    }

    /// Create a sketcher with explicit hash width and optional seed
    pub fn with_params(m: usize, width: u32, seed: Option<u64>) -> Result<Self> {
        Ok(Self {
            inner: BBit::with_params(1, m, width, seed)?,
        })
    }

    /// Replace the 1-bit signature cache
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.inner = self.inner.with_cache_capacity(capacity);
        self
    }

    /// The wrapped 1-bit sketcher
    pub fn bbit(&self) -> &BBit {
        &self.inner
    }
}

impl SetSketcher for Concatenated {
    type Signature = CompressedHash;

    fn hash<I, T>(&self, tokens: I) -> Result<CompressedHash>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let bits = self.inner.hash_set(&token_set(tokens))?;
        let mut value = BitVector::new();
        for (i, &bit) in bits.iter().rev().enumerate() {
            if bit != 0 {
                value.set(i);
            }
        }
        Ok(CompressedHash::from_parts(value, bits.len(), 1))
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}
