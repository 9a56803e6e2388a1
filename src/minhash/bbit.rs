//! b-bit minwise hashing

use core::cell::RefCell;

use super::minwise::{token_set, Minwise, SignatureCache, TokenSet};
use crate::bits::BitOps;
use crate::hashing::{BoundedCache, DEFAULT_SET_CACHE_CAPACITY};
use crate::traits::{Result, SetSketcher, SketchError};

/// b-bit minwise hash sketcher
///
/// Keeps only the `b` least-significant bits of each minwise value, trading
/// estimator variance for a much smaller signature. Compare signatures with
/// [`j_hat`](crate::estimators::j_hat), which corrects for the chance
/// agreement of random `b`-bit values.
///
/// # Example
///
/// ```
/// use setsketch::minhash::BBit;
/// use setsketch::traits::SetSketcher;
///
/// let sketcher = BBit::with_seed(2, 8, 42).unwrap();
/// let sig = sketcher.hash(["a", "b", "c"]).unwrap();
///
/// assert_eq!(sig.len(), 8);
/// assert!(sig.iter().all(|&v| v < 4));
/// ```
#[derive(Clone, Debug)]
pub struct BBit {
    b: u32,
    minwise: Minwise,
    cache: SignatureCache,
}

impl BBit {
    /// Create a `b`-bit sketcher of length `m` with 64-bit hashes and random tables
    pub fn new(b: u32, m: usize) -> Result<Self> {
        Self::with_params(b, m, 64, None)
    }

    /// Create a reproducible `b`-bit sketcher of length `m`
    pub fn with_seed(b: u32, m: usize, seed: u64) -> Result<Self> {
        Self::with_params(b, m, 64, Some(seed))
    }

    /// Create a `b`-bit sketcher with explicit hash width and optional seed
    pub fn with_params(b: u32, m: usize, width: u32, seed: Option<u64>) -> Result<Self> {
        Self::from_minwise(b, Minwise::with_params(m, width, seed)?)
    }

    /// Wrap an existing minwise sketcher
    ///
    /// Returns [`SketchError::InvalidParameter`] if `b` is 0. Any `b` at
    /// least the hash width keeps the whole minwise value.
    pub fn from_minwise(b: u32, minwise: Minwise) -> Result<Self> {
        if b == 0 {
            return Err(SketchError::InvalidParameter("b must be > 0".into()));
        }
        Ok(Self {
            b,
            minwise,
            cache: RefCell::new(BoundedCache::new(DEFAULT_SET_CACHE_CAPACITY)),
        })
    }

    /// Replace the signature cache with one holding at most `capacity` sets
    ///
    /// The wrapped minwise sketcher keeps its own cache.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = RefCell::new(BoundedCache::new(capacity));
        self
    }

    /// Bits retained per minwise value
    pub fn b(&self) -> u32 {
        self.b
    }

    /// The wrapped minwise sketcher
    pub fn minwise(&self) -> &Minwise {
        &self.minwise
    }

    pub(crate) fn hash_set(&self, set: &TokenSet) -> Result<Vec<u64>> {
        if let Some(sig) = self.cache.borrow().get(set) {
            return Ok(sig.clone());
        }

        let sig = self
            .minwise
            .hash_set(set)?
            .iter()
            .map(|v| v.lowbits(self.b as usize))
            .collect::<Result<Vec<u64>>>()?;

        self.cache.borrow_mut().insert(set.clone(), sig.clone());
        Ok(sig)
    }
}

impl SetSketcher for BBit {
    type Signature = Vec<u64>;

    fn hash<I, T>(&self, tokens: I) -> Result<Vec<u64>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.hash_set(&token_set(tokens))
    }

    fn len(&self) -> usize {
        self.minwise.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_bits_of_minwise() {
        let sketcher = BBit::with_seed(3, 16, 21).unwrap();
        let tokens = ["red", "green", "blue"];
        let full = sketcher.minwise().hash(tokens).unwrap();
        let reduced = sketcher.hash(tokens).unwrap();

        assert_eq!(reduced.len(), 16);
        for (f, r) in full.iter().zip(&reduced) {
            assert_eq!(f % 8, *r);
        }
    }

    #[test]
    fn test_b_range() {
        assert!(BBit::new(0, 4).is_err());
        for b in [64, 65, 1000] {
            let full = BBit::with_seed(b, 4, 1).unwrap();
            assert_eq!(
                full.hash(["x"]).unwrap(),
                full.minwise().hash(["x"]).unwrap()
            );
        }
    }

    #[test]
    fn test_zero_m_rejected() {
        assert!(matches!(
            BBit::new(1, 0),
            Err(SketchError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_independent_caches() {
        let sketcher = BBit::with_seed(1, 4, 2).unwrap().with_cache_capacity(0);
        sketcher.hash(["a", "b"]).unwrap();
        assert_eq!(sketcher.minwise().cached_len(), 1);
    }
}
