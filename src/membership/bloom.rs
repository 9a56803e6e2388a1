//! Bloom filter for probabilistic set membership
//!
//! A Bloom filter is a space-efficient probabilistic data structure that tests
//! whether an element is a member of a set. False positives are possible, but
//! false negatives are not.

use core::cell::RefCell;
use core::fmt;

use crate::bits::{BitOps, BitVector};
use crate::hashing::{
    rng_from_seed, BoundedCache, HashWidth, TabulationHasher, DEFAULT_TOKEN_CACHE_CAPACITY,
};
use crate::traits::{HashFunction, MembershipSketch, Result, SketchError};

/// The `i`-th function of a double-hashing family: `h1(x) + i·h2(x)`
///
/// Every function in a family built by [`k_hashes`] holds its own copy of the
/// same two tabulation hashers and its own memo of item → hash, so no state
/// is shared between functions. The sum is kept exactly (it can exceed 64
/// bits once the hashers are 64 bits wide).
#[derive(Clone)]
pub struct DoubleHash {
    index: u64,
    h1: TabulationHasher,
    h2: TabulationHasher,
    cache: RefCell<BoundedCache<Vec<u8>, u128>>,
}

impl DoubleHash {
    /// Position of this function within its family
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Number of memoized item hashes
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Exact value of `h1(item) + i·h2(item)`
    pub fn hash_wide(&self, item: &[u8]) -> u128 {
        self.cache.borrow_mut().get_or_insert_with(item, || {
            u128::from(self.h1.hash(item)) + u128::from(self.index) * u128::from(self.h2.hash(item))
        })
    }
}

impl HashFunction for DoubleHash {
    /// Low 64 bits of [`hash_wide`](DoubleHash::hash_wide)
    fn hash(&self, item: &[u8]) -> u64 {
        self.hash_wide(item) as u64
    }

    fn bucket(&self, item: &[u8], m: usize) -> usize {
        (self.hash_wide(item) % m as u128) as usize
    }
}

impl fmt::Debug for DoubleHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleHash")
            .field("index", &self.index)
            .field("width", &self.h1.width())
            .finish()
    }
}

/// Build `k` hash functions for a Bloom filter of `m` bits
///
/// Uses double hashing over two tabulation hashers of the narrowest width
/// whose range covers `m`. Both hashers are drawn from one generator, so a
/// seed fixes the whole family.
///
/// # Errors
///
/// - [`SketchError::InvalidParameter`] if `k` or `m` is 0
/// - [`SketchError::FilterTooWide`] if `m` exceeds `2^64`
pub fn k_hashes(k: usize, m: usize, seed: Option<u64>) -> Result<Vec<DoubleHash>> {
    if k == 0 || m == 0 {
        return Err(SketchError::InvalidParameter(
            "k and m must both be > 0".into(),
        ));
    }
    let width = HashWidth::for_range(m)?;
    let mut rng = rng_from_seed(seed);
    // Each function memoizes the combined value, the inner hashers need no cache
    let h1 = TabulationHasher::from_rng(width, &mut rng).with_cache_capacity(0);
    let h2 = TabulationHasher::from_rng(width, &mut rng).with_cache_capacity(0);

    tracing::debug!(k, m, width = width.bits(), seeded = seed.is_some(), "built double-hash family");

    Ok((0..k as u64)
        .map(|index| DoubleHash {
            index,
            h1: h1.clone(),
            h2: h2.clone(),
            cache: RefCell::new(BoundedCache::new(DEFAULT_TOKEN_CACHE_CAPACITY)),
        })
        .collect())
}

/// Number of hash functions giving an expected fraction `p` of set bits
///
/// For a filter of `m` bits holding `n` items.
pub fn get_k(m: usize, n: usize, p: f64) -> f64 {
    (1.0 - p).ln() / (1.0 - 1.0 / m as f64).ln() / n as f64
}

/// Number of hash functions minimizing the false positive rate: `(m / n) ln 2`
pub fn opt_k(m: usize, n: usize) -> f64 {
    (m as f64 / n as f64) * core::f64::consts::LN_2
}

/// Bloom filter for set membership testing
///
/// Holds a bit vector of fixed width `m` and a list of `k` hash functions;
/// an item sets (and is tested against) bit `h(item) mod m` for each
/// function `h`.
///
/// [`union`](Self::union) and [`intersection`](Self::intersection) combine
/// bit vectors directly. They are only meaningful for filters with the same
/// width and equivalent hash functions; this is the caller's responsibility.
///
/// Each filter owns its hash functions; filters derived through `union`,
/// `intersection` or `clone` get copies. With [`DoubleHash`] functions a
/// filter is `Send` but not `Sync`.
///
/// # Example
///
/// ```
/// use setsketch::membership::{k_hashes, BloomFilter};
///
/// let funcs = k_hashes(3, 10, Some(6)).unwrap();
/// let mut bloom = BloomFilter::new(100, funcs).unwrap();
///
/// bloom.add("one");
/// bloom.add("two");
/// bloom.add("three");
///
/// assert!(bloom.contains("two"));   // true - definitely inserted
/// assert!(!bloom.contains("four")); // probably false (might be false positive)
/// ```
#[derive(Clone)]
pub struct BloomFilter<H = DoubleHash> {
    /// Number of bits (m)
    m_bits: usize,
    funcs: Vec<H>,
    bits: BitVector,
}

impl<H: HashFunction> BloomFilter<H> {
    /// Create an empty filter of `m_bits` bits using `funcs`
    ///
    /// Returns [`SketchError::InvalidParameter`] if `m_bits` is 0 or `funcs`
    /// is empty.
    pub fn new(m_bits: usize, funcs: Vec<H>) -> Result<Self> {
        if m_bits == 0 {
            return Err(SketchError::InvalidParameter(
                "bloom filter width must be > 0".into(),
            ));
        }
        if funcs.is_empty() {
            return Err(SketchError::InvalidParameter(
                "bloom filter needs at least one hash function".into(),
            ));
        }
        tracing::debug!(m_bits, k = funcs.len(), "built bloom filter");
        Ok(Self {
            m_bits,
            funcs,
            bits: BitVector::new(),
        })
    }

    /// Create a filter and add every item of `items`
    pub fn with_items<I, T>(m_bits: usize, funcs: Vec<H>, items: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut filter = Self::new(m_bits, funcs)?;
        for item in items {
            filter.add(item);
        }
        Ok(filter)
    }

    fn index(&self, func: &H, item: &[u8]) -> usize {
        func.bucket(item, self.m_bits)
    }

    /// Add an item (idempotent)
    pub fn add(&mut self, item: impl AsRef<[u8]>) {
        let item = item.as_ref();
        for func in self.funcs.iter() {
            let idx = self.index(func, item);
            self.bits.set(idx);
        }
    }

    /// Check if an item might be in the filter
    ///
    /// Returns `true` if the item might be in the set (possibly a false positive),
    /// or `false` if the item is definitely not in the set.
    pub fn contains(&self, item: impl AsRef<[u8]>) -> bool {
        let item = item.as_ref();
        self.funcs
            .iter()
            .all(|func| self.bits.getbit(self.index(func, item)))
    }

    /// Estimate the number of items in the filter: `-m ln(1 - X/m) / k`
    ///
    /// Infinite once every bit is set. The size of an intersection is best
    /// estimated as `|A| + |B| - |A ∪ B|` rather than from the AND of bits.
    pub fn estimated_size(&self) -> f64 {
        let m = self.m_bits as f64;
        -m * (1.0 - self.bits_set() as f64 / m).ln() / self.funcs.len() as f64
    }

    /// Estimate the current false positive rate
    ///
    /// This is based on the actual fill ratio of the filter.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        let fill_ratio = self.bits_set() as f64 / self.m_bits as f64;
        fill_ratio.powi(self.funcs.len() as i32)
    }

    /// Zero-padded binary rendering, `m` characters wide
    pub fn digits(&self) -> String {
        self.bits.digits(Some(self.m_bits))
    }

    /// Get the number of bits in the filter
    pub fn m_bits(&self) -> usize {
        self.m_bits
    }

    /// Get the number of hash functions
    pub fn num_hashes(&self) -> usize {
        self.funcs.len()
    }

    /// The hash functions
    pub fn hash_functions(&self) -> &[H] {
        &self.funcs
    }

    /// The bit vector
    pub fn bits(&self) -> &BitVector {
        &self.bits
    }

    /// Get the number of bits set to 1
    pub fn bits_set(&self) -> usize {
        self.bits.popcount()
    }

    fn warn_if_incompatible(&self, other: &Self) {
        if self.m_bits != other.m_bits || self.funcs.len() != other.funcs.len() {
            tracing::warn!(
                left_bits = self.m_bits,
                right_bits = other.m_bits,
                left_k = self.funcs.len(),
                right_k = other.funcs.len(),
                "combining bloom filters with different configurations"
            );
        }
    }
}

impl<H: HashFunction + Clone> BloomFilter<H> {
    /// Empty filter with the same width and a copy of the hash functions
    pub fn empty_like(&self) -> Self {
        Self {
            m_bits: self.m_bits,
            funcs: self.funcs.clone(),
            bits: BitVector::new(),
        }
    }

    /// Filter whose bits are the OR of both filters' bits
    pub fn union(&self, other: &Self) -> Self {
        self.warn_if_incompatible(other);
        let mut res = self.empty_like();
        res.bits = &self.bits | &other.bits;
        res
    }

    /// Copy of this filter with `items` added
    pub fn union_items<I, T>(&self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut res = self.empty_like();
        res.bits = self.bits.clone();
        for item in items {
            res.add(item);
        }
        res
    }

    /// Filter whose bits are the AND of both filters' bits
    pub fn intersection(&self, other: &Self) -> Self {
        self.warn_if_incompatible(other);
        let mut res = self.empty_like();
        res.bits = &self.bits & &other.bits;
        res
    }

    /// AND of this filter with a filter holding exactly `items`
    pub fn intersection_items<I, T>(&self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut res = self.empty_like();
        for item in items {
            res.add(item);
        }
        res.bits = &self.bits & &res.bits;
        res
    }
}

impl<H: HashFunction> MembershipSketch for BloomFilter<H> {
    fn add(&mut self, item: &[u8]) {
        BloomFilter::add(self, item);
    }

    fn contains(&self, item: &[u8]) -> bool {
        BloomFilter::contains(self, item)
    }

    fn estimated_size(&self) -> f64 {
        BloomFilter::estimated_size(self)
    }

    fn false_positive_rate(&self) -> f64 {
        self.estimated_false_positive_rate()
    }
}

impl<H> fmt::Debug for BloomFilter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("m_bits", &self.m_bits)
            .field("num_hashes", &self.funcs.len())
            .field("bits", &self.bits)
            .finish()
    }
}

impl<H> fmt::Display for BloomFilter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.bits)
    }
}

impl<H> fmt::LowerHex for BloomFilter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.bits, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(m: usize, k: usize, seed: u64) -> BloomFilter {
        BloomFilter::new(m, k_hashes(k, m, Some(seed)).unwrap()).unwrap()
    }

    #[test]
    fn test_basic() {
        let mut bloom = filter(100, 3, 6);

        bloom.add("one");
        bloom.add("two");
        bloom.add("three");

        assert!(bloom.contains("one"));
        assert!(bloom.contains("two"));
        assert!(bloom.contains("three"));
        assert!(bloom.bits_set() <= 9);
    }

    #[test]
    fn test_no_false_negatives() {
        let mut bloom = filter(10_000, 7, 1);

        for i in 0..1000 {
            bloom.add(format!("item_{}", i));
        }

        // All inserted items must be found (no false negatives)
        for i in 0..1000 {
            assert!(bloom.contains(format!("item_{}", i)), "Missing item_{}", i);
        }
    }

    #[test]
    fn test_false_positive_rate() {
        // ~9.6 bits per item with k=7 targets ~1% false positives
        let mut bloom = filter(9_600, 7, 2);

        for i in 0..1000 {
            bloom.add(format!("item_{}", i));
        }

        let mut false_positives = 0;
        for i in 0..10000 {
            if bloom.contains(format!("other_{}", i)) {
                false_positives += 1;
            }
        }

        let fp_rate = false_positives as f64 / 10000.0;
        assert!(fp_rate < 0.03, "FP rate too high: {}", fp_rate);
        assert!(bloom.estimated_false_positive_rate() < 0.03);
    }

    #[test]
    fn test_add_idempotent() {
        let mut bloom = filter(64, 4, 3);
        bloom.add("x");
        let before = bloom.bits().clone();
        bloom.add("x");
        assert_eq!(bloom.bits(), &before);
    }

    #[test]
    fn test_union_and_intersection_are_bitwise() {
        let funcs = k_hashes(3, 256, Some(8)).unwrap();
        let mut a = BloomFilter::new(256, funcs).unwrap();
        let mut b = a.clone();
        a.add("apple");
        a.add("shared");
        b.add("banana");
        b.add("shared");

        let u = a.union(&b);
        let i = a.intersection(&b);
        assert_eq!(u.bits(), &(a.bits() | b.bits()));
        assert_eq!(i.bits(), &(a.bits() & b.bits()));
        assert!(u.contains("apple") && u.contains("banana"));
        assert!(i.contains("shared"));
    }

    #[test]
    fn test_item_variants_match_filter_variants() {
        let mut a = filter(128, 3, 4);
        a.add("x");
        a.add("y");

        let mut b = a.empty_like();
        b.add("y");
        b.add("z");

        assert_eq!(a.union_items(["y", "z"]).bits(), a.union(&b).bits());
        assert_eq!(
            a.intersection_items(["y", "z"]).bits(),
            a.intersection(&b).bits()
        );
    }

    #[test]
    fn test_estimated_size() {
        let mut bloom = filter(10_000, 5, 11);

        for i in 0..500 {
            bloom.add(format!("item_{}", i));
        }

        let estimated = bloom.estimated_size();
        // Should be roughly 500, allow 20% error
        assert!(
            estimated > 400.0 && estimated < 600.0,
            "Estimate: {}",
            estimated
        );
        assert_eq!(filter(100, 3, 1).estimated_size(), 0.0);
    }

    #[test]
    fn test_digits_width() {
        let mut bloom = filter(100, 3, 6);
        bloom.add("one");
        let digits = bloom.digits();
        assert_eq!(digits.len(), 100);
        assert_eq!(digits.matches('1').count(), bloom.bits_set());
    }

    #[test]
    fn test_with_items() {
        let bloom =
            BloomFilter::with_items(200, k_hashes(4, 200, Some(5)).unwrap(), ["a", "b"]).unwrap();
        assert!(bloom.contains("a") && bloom.contains("b"));
    }

    #[test]
    fn test_invalid_params() {
        assert!(BloomFilter::new(0, k_hashes(3, 10, Some(1)).unwrap()).is_err());
        assert!(BloomFilter::<DoubleHash>::new(10, Vec::new()).is_err());
        assert!(k_hashes(0, 10, None).is_err());
        assert!(k_hashes(3, 0, None).is_err());
    }

    #[test]
    fn test_k_hashes_reproducible() {
        let a = k_hashes(4, 1000, Some(17)).unwrap();
        let b = k_hashes(4, 1000, Some(17)).unwrap();
        for (fa, fb) in a.iter().zip(&b) {
            assert_eq!(fa.hash(b"token"), fb.hash(b"token"));
        }
        assert_eq!(a[0].index(), 0);
        assert_eq!(a[3].index(), 3);
    }

    #[test]
    fn test_functions_do_not_share_caches() {
        let funcs = k_hashes(3, 100, Some(4)).unwrap();
        funcs[0].hash(b"x");
        assert_eq!(funcs[0].cached_len(), 1);
        assert_eq!(funcs[1].cached_len(), 0);
        assert_eq!(funcs[2].cached_len(), 0);
    }

    #[test]
    fn test_filter_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<DoubleHash>();
        assert_send::<BloomFilter>();

        let mut bloom = filter(128, 3, 5);
        bloom.add("moved");
        let handle = std::thread::spawn(move || bloom.contains("moved"));
        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_wide_double_hash_is_exact() {
        // m > 2^32 needs 64-bit hashers, where h1 + 2·h2 overflows u64
        let m = (1usize << 33) + 1;
        let funcs = k_hashes(3, m, Some(9)).unwrap();
        let mut overflowed = 0;
        for i in 0..100 {
            let item = format!("t{}", i);
            let item = item.as_bytes();
            let h1 = funcs[0].hash_wide(item);
            let h2 = funcs[1].hash_wide(item) - h1;
            let exact = h1 + 2 * h2;

            assert_eq!(funcs[2].hash_wide(item), exact);
            assert_eq!(funcs[2].bucket(item, m) as u128, exact % m as u128);
            assert_eq!(funcs[2].hash(item), exact as u64);
            if exact > u128::from(u64::MAX) {
                overflowed += 1;
            }
        }
        assert!(overflowed > 0, "no item exercised the overflow path");
    }

    #[test]
    fn test_k_hashes_width_fits_m() {
        let funcs = k_hashes(1, 200, Some(2)).unwrap();
        // index 0 is h1 alone, an 8-bit hash
        for i in 0..100 {
            assert!(funcs[0].hash(format!("t{}", i).as_bytes()) < 256);
        }
    }

    #[test]
    fn test_custom_hash_function() {
        #[derive(Debug)]
        struct Len;
        impl HashFunction for Len {
            fn hash(&self, item: &[u8]) -> u64 {
                item.len() as u64
            }
        }

        let mut bloom = BloomFilter::new(16, vec![Len]).unwrap();
        bloom.add("abc");
        assert!(bloom.contains("xyz"));
        assert!(!bloom.contains("ab"));
    }

    #[test]
    fn test_get_k_and_opt_k() {
        let k = opt_k(1000, 100);
        assert!((k - 10.0 * core::f64::consts::LN_2).abs() < 1e-12);

        // With k from get_k the expected fraction of set bits is p
        let (m, n, p) = (1000, 100, 0.5);
        let k = get_k(m, n, p);
        let fraction = 1.0 - (1.0 - 1.0 / m as f64).powf(k * n as f64);
        assert!((fraction - p).abs() < 1e-9);
    }

    #[test]
    fn test_membership_trait() {
        let mut bloom = filter(128, 3, 9);
        MembershipSketch::add(&mut bloom, b"m");
        assert!(MembershipSketch::contains(&bloom, b"m"));
        assert!(bloom.false_positive_rate() > 0.0);
    }

    #[test]
    fn test_rendering() {
        let mut bloom = filter(100, 3, 6);
        assert_eq!(bloom.to_string(), "0x0");
        bloom.add("one");
        assert_eq!(format!("{:x}", bloom), format!("{:x}", bloom.bits()));
    }
}
