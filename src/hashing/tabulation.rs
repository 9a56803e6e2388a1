//! Simple tabulation hashing over variable-length tokens
//!
//! Each token is first reduced to a 128-bit XXH3 digest, truncated to the
//! output width, and then split into bytes. Byte `i` indexes table `i`, and
//! the selected entries are XORed together. With the tables drawn uniformly
//! at random, distinct instances behave as independent hash functions.

use core::cell::RefCell;
use core::fmt;

use rand::RngCore;
use xxhash_rust::xxh3::xxh3_128;

use super::cache::{BoundedCache, DEFAULT_TOKEN_CACHE_CAPACITY};
use super::{rng_from_seed, HashWidth};
use crate::traits::{HashFunction, Result};

/// Tabulation hash function of width 8, 16, 32 or 64 bits
///
/// The tables are generated once at construction; the same seed always
/// produces the same tables and therefore the same hash values.
///
/// Token hashes are memoized in a bounded per-instance cache. The cache sits
/// behind a `RefCell`, so a hasher is `Send` but **not** `Sync`.
///
/// # Example
///
/// ```
/// use setsketch::hashing::TabulationHasher;
///
/// let h1 = TabulationHasher::with_seed(32, 7).unwrap();
/// let h2 = TabulationHasher::with_seed(32, 7).unwrap();
///
/// assert_eq!(h1.hash("token"), h2.hash("token"));
/// assert!(h1.hash("token") < 1 << 32);
/// ```
#[derive(Clone)]
pub struct TabulationHasher {
    width: HashWidth,
    /// One table of 256 entries per byte of output
    tables: Vec<[u64; 256]>,
    cache: RefCell<BoundedCache<Vec<u8>, u64>>,
}

impl TabulationHasher {
    /// Create a hasher with non-reproducible random tables
    pub fn new(width: u32) -> Result<Self> {
        Self::with_params(width, None)
    }

    /// Create a hasher whose tables are fixed by `seed`
    pub fn with_seed(width: u32, seed: u64) -> Result<Self> {
        Self::with_params(width, Some(seed))
    }

    /// Create a hasher with an optional seed
    ///
    /// Returns [`SketchError::UnsupportedWidth`](crate::SketchError::UnsupportedWidth)
    /// unless `width` is one of 8, 16, 32, 64.
    pub fn with_params(width: u32, seed: Option<u64>) -> Result<Self> {
        let width = HashWidth::try_from(width)?;
        let mut rng = rng_from_seed(seed);
        Ok(Self::from_rng(width, &mut rng))
    }

    /// Create a hasher drawing its tables from `rng`
    ///
    /// Building several hashers from one generator yields a reproducible
    /// family of independent hash functions.
    pub fn from_rng<R: RngCore + ?Sized>(width: HashWidth, rng: &mut R) -> Self {
        let mask = width.mask();
        let tables = (0..width.bytes())
            .map(|_| {
                let mut table = [0u64; 256];
                for entry in table.iter_mut() {
                    *entry = rng.next_u64() & mask;
                }
                table
            })
            .collect();

        tracing::trace!(width = width.bits(), "built tabulation hasher");

        Self {
            width,
            tables,
            cache: RefCell::new(BoundedCache::new(DEFAULT_TOKEN_CACHE_CAPACITY)),
        }
    }

    /// Replace the token cache with one holding at most `capacity` entries
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = RefCell::new(BoundedCache::new(capacity));
        self
    }

    /// Output width
    pub fn width(&self) -> HashWidth {
        self.width
    }

    /// Hash a token
    pub fn hash(&self, token: impl AsRef<[u8]>) -> u64 {
        self.hash_bytes(token.as_ref())
    }

    /// Number of memoized token hashes
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    fn hash_bytes(&self, token: &[u8]) -> u64 {
        self.cache
            .borrow_mut()
            .get_or_insert_with(token, || self.tabulate(token))
    }

    fn tabulate(&self, token: &[u8]) -> u64 {
        let mut x = (xxh3_128(token) as u64) & self.width.mask();
        let mut h = 0u64;
        for table in &self.tables {
            h ^= table[(x & 0xff) as usize];
            x >>= 8;
        }
        h
    }
}

impl HashFunction for TabulationHasher {
    fn hash(&self, token: &[u8]) -> u64 {
        self.hash_bytes(token)
    }
}

impl fmt::Debug for TabulationHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabulationHasher")
            .field("width", &self.width)
            .field("cached", &self.cached_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SketchError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_seeded_determinism() {
        for width in [8, 16, 32, 64] {
            let h1 = TabulationHasher::with_seed(width, 1234).unwrap();
            let h2 = TabulationHasher::with_seed(width, 1234).unwrap();
            for token in ["a", "b", "hello world", ""] {
                assert_eq!(h1.hash(token), h2.hash(token));
            }
        }
    }

    #[test]
    fn test_output_within_width() {
        for width in [8u32, 16, 32] {
            let h = TabulationHasher::with_seed(width, 9).unwrap();
            for i in 0..1000 {
                assert!(h.hash(format!("token_{}", i)) < 1u64 << width);
            }
        }
    }

    #[test]
    fn test_invalid_width() {
        for width in [0, 7, 12, 24, 128] {
            assert_eq!(
                TabulationHasher::new(width).unwrap_err(),
                SketchError::UnsupportedWidth(width)
            );
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let h1 = TabulationHasher::with_seed(64, 1).unwrap();
        let h2 = TabulationHasher::with_seed(64, 2).unwrap();
        let same = (0..100)
            .filter(|i| h1.hash(i.to_string()) == h2.hash(i.to_string()))
            .count();
        assert_eq!(same, 0);
    }

    #[test]
    fn test_family_from_rng_is_independent() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = TabulationHasher::from_rng(HashWidth::W64, &mut rng);
        let b = TabulationHasher::from_rng(HashWidth::W64, &mut rng);
        assert_ne!(a.hash("x"), b.hash("x"));
    }

    #[test]
    fn test_cache_bounded() {
        let h = TabulationHasher::with_seed(64, 3)
            .unwrap()
            .with_cache_capacity(10);
        let first = h.hash("t0");
        for i in 0..100 {
            h.hash(format!("t{}", i));
        }
        assert_eq!(h.cached_len(), 10);
        // Evicted entries are recomputed identically
        assert_eq!(h.hash("t0"), first);
    }

    #[test]
    fn test_low_bits_uniform() {
        let h = TabulationHasher::with_seed(64, 77).unwrap();
        let n = 20_000;
        let ones = (0..n)
            .filter(|i| h.hash(format!("item_{}", i)) & 1 == 1)
            .count();
        let frac = ones as f64 / n as f64;
        assert!((frac - 0.5).abs() < 0.03, "low-bit frequency {}", frac);
    }
}
