//! Minwise hashing: one minimum per hash function

use core::cell::RefCell;
use std::collections::BTreeSet;

use rand::RngCore;

use crate::hashing::{
    rng_from_seed, BoundedCache, HashWidth, TabulationHasher, DEFAULT_SET_CACHE_CAPACITY,
};
use crate::traits::{Result, SetSketcher, SketchError};

/// Deduplicated, order-independent token set used as a cache key
pub(crate) type TokenSet = BTreeSet<Vec<u8>>;

pub(crate) fn token_set<I, T>(tokens: I) -> TokenSet
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    tokens.into_iter().map(|t| t.as_ref().to_vec()).collect()
}

pub(crate) type SignatureCache = RefCell<BoundedCache<TokenSet, Vec<u64>>>;

/// Minwise hash sketcher
///
/// Holds `m` independent [`TabulationHasher`]s. The signature of a token set
/// is the minimum hash value of its tokens under each hasher, so its length
/// is always `m`.
///
/// Signatures are memoized per distinct token set (compared by value, not
/// insertion order) in a bounded cache.
///
/// # Example
///
/// ```
/// use setsketch::minhash::Minwise;
/// use setsketch::traits::SetSketcher;
///
/// let sketcher = Minwise::with_seed(5, 42).unwrap();
/// let sig = sketcher.hash(["a", "b", "a"]).unwrap();
///
/// assert_eq!(sig.len(), 5);
/// assert_eq!(sig, sketcher.hash(["b", "a"]).unwrap());
/// ```
#[derive(Clone, Debug)]
pub struct Minwise {
    width: HashWidth,
    hashers: Vec<TabulationHasher>,
    cache: SignatureCache,
}

impl Minwise {
    /// Create a sketcher of length `m` with 64-bit hashes and random tables
    pub fn new(m: usize) -> Result<Self> {
        Self::with_params(m, 64, None)
    }

    /// Create a reproducible sketcher of length `m` with 64-bit hashes
    pub fn with_seed(m: usize, seed: u64) -> Result<Self> {
        Self::with_params(m, 64, Some(seed))
    }

    /// Create a sketcher with explicit hash width and optional seed
    ///
    /// # Errors
    ///
    /// - [`SketchError::InvalidParameter`] if `m` is 0
    /// - [`SketchError::UnsupportedWidth`] if `width` is not 8, 16, 32 or 64
    pub fn with_params(m: usize, width: u32, seed: Option<u64>) -> Result<Self> {
        let width = HashWidth::try_from(width)?;
        let mut rng = rng_from_seed(seed);
        let sketcher = Self::from_rng(m, width, &mut rng)?;
        tracing::debug!(m, width = width.bits(), seeded = seed.is_some(), "built minwise sketcher");
        Ok(sketcher)
    }

    /// Create a sketcher whose `m` hashers are drawn in turn from `rng`
    pub fn from_rng<R: RngCore + ?Sized>(m: usize, width: HashWidth, rng: &mut R) -> Result<Self> {
        if m == 0 {
            return Err(SketchError::InvalidParameter(
                "minwise hash must have length > 0".into(),
            ));
        }
        let hashers = (0..m).map(|_| TabulationHasher::from_rng(width, &mut *rng)).collect();
        Ok(Self {
            width,
            hashers,
            cache: RefCell::new(BoundedCache::new(DEFAULT_SET_CACHE_CAPACITY)),
        })
    }

    /// Replace the signature cache with one holding at most `capacity` sets
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = RefCell::new(BoundedCache::new(capacity));
        self
    }

    /// Hash width of every function in the family
    pub fn width(&self) -> HashWidth {
        self.width
    }

    /// The underlying hash family
    pub fn hashers(&self) -> &[TabulationHasher] {
        &self.hashers
    }

    /// Number of memoized signatures
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub(crate) fn hash_set(&self, set: &TokenSet) -> Result<Vec<u64>> {
        if set.is_empty() {
            return Err(SketchError::EmptyTokenSet);
        }
        if let Some(sig) = self.cache.borrow().get(set) {
            return Ok(sig.clone());
        }

        let sig: Vec<u64> = self
            .hashers
            .iter()
            .map(|h| set.iter().map(|t| h.hash(t)).fold(u64::MAX, u64::min))
            .collect();

        self.cache.borrow_mut().insert(set.clone(), sig.clone());
        Ok(sig)
    }
}

impl SetSketcher for Minwise {
    type Signature = Vec<u64>;

    fn hash<I, T>(&self, tokens: I) -> Result<Vec<u64>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.hash_set(&token_set(tokens))
    }

    fn len(&self) -> usize {
        self.hashers.len()
    }
}
