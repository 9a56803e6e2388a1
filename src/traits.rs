//! Core traits and error types shared by every sketch family
//!
//! Hashers implement [`HashFunction`], set sketchers implement [`SetSketcher`]
//! and approximate-membership structures implement [`MembershipSketch`].

use core::fmt::Debug;

/// Error raised by sketch construction and estimation
///
/// Every variant describes an invalid parameter or input detected before any
/// state was modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SketchError {
    /// A numeric parameter is out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Hash width is not one of 8, 16, 32 or 64
    #[error("unsupported hash width {0}: expected one of 8, 16, 32, 64")]
    UnsupportedWidth(u32),
    /// Two sketches that must have equal length do not
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    /// Attempt to compress a hash to more bits than it holds
    #[error("cannot compress a {current}-bit hash to {requested} bits")]
    CompressionTooLarge { current: usize, requested: usize },
    /// XOR folding factor is not a positive power of two
    #[error("XOR factor {0} is not a positive power of two")]
    NotPowerOfTwo(usize),
    /// Hash width does not split evenly into the requested number of chunks
    #[error("hash width {width} is not divisible by {factor}")]
    IndivisibleWidth { width: usize, factor: usize },
    /// Bloom filter width exceeds the largest tabulation width
    #[error("bloom filter width {0} exceeds 2^64")]
    FilterTooWide(usize),
    /// A sketch was requested for a set with no tokens
    #[error("token set is empty")]
    EmptyTokenSet,
    /// The estimate has no defined value for these inputs
    #[error("estimate undefined: {0}")]
    Undefined(&'static str),
}

impl SketchError {
    /// Whether this error reports an invalid argument
    ///
    /// All current variants do; callers matching on the error kind rather
    /// than the variant should use this.
    pub fn is_invalid_argument(&self) -> bool {
        true
    }
}

/// Result alias used throughout the crate
pub type Result<T> = core::result::Result<T, SketchError>;

/// Error bounds for a similarity estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorBounds {
    /// Lower bound of the estimate
    pub lower: f64,
    /// Point estimate
    pub estimate: f64,
    /// Upper bound of the estimate
    pub upper: f64,
    /// Confidence level (e.g., 0.95 for 95%)
    pub confidence: f64,
}

impl ErrorBounds {
    /// Create new error bounds
    pub fn new(lower: f64, estimate: f64, upper: f64, confidence: f64) -> Self {
        Self {
            lower,
            estimate,
            upper,
            confidence,
        }
    }

    /// Check if a value falls within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Width of the confidence interval
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Two-sided normal quantile for the given confidence level
    pub(crate) fn z_score(confidence: f64) -> f64 {
        match confidence {
            c if c >= 0.99 => 2.576,
            c if c >= 0.95 => 1.96,
            c if c >= 0.90 => 1.645,
            c if c >= 0.80 => 1.282,
            _ => 1.0,
        }
    }
}

/// A hash function mapping a token to an unsigned integer
///
/// Implementations are deterministic for the lifetime of the instance.
pub trait HashFunction: Debug {
    /// Hash a token
    fn hash(&self, token: &[u8]) -> u64;

    /// Map a token to one of `m` buckets (`m > 0`)
    ///
    /// Defaults to `hash(token) mod m`. Functions whose exact value can
    /// exceed 64 bits override this to reduce the full value.
    fn bucket(&self, token: &[u8], m: usize) -> usize {
        (self.hash(token) % m as u64) as usize
    }
}

impl<T: HashFunction + ?Sized> HashFunction for &T {
    fn hash(&self, token: &[u8]) -> u64 {
        (**self).hash(token)
    }

    fn bucket(&self, token: &[u8], m: usize) -> usize {
        (**self).bucket(token, m)
    }
}

/// Reduces a token set to a comparable signature
///
/// Token order and multiplicity are ignored: two iterables producing the same
/// set of tokens yield the same signature.
pub trait SetSketcher {
    /// Signature produced for a token set
    type Signature: Clone;

    /// Compute the signature of a token set
    fn hash<I, T>(&self, tokens: I) -> Result<Self::Signature>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>;

    /// Length of the signature in hash values
    fn len(&self) -> usize;

    /// Whether the signature is empty (never true for a valid sketcher)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Membership testing sketches (Bloom filters, etc.)
pub trait MembershipSketch {
    /// Add an item
    fn add(&mut self, item: &[u8]);

    /// Test if item might be in set
    ///
    /// - `true` means item might be present (possible false positive)
    /// - `false` means item is definitely not present
    fn contains(&self, item: &[u8]) -> bool;

    /// Estimated number of distinct items added
    fn estimated_size(&self) -> f64;

    /// Theoretical false positive rate given current state
    fn false_positive_rate(&self) -> f64;
}
