//! Hash function families for sketch construction
//!
//! This module provides [`TabulationHasher`], a seedable tabulation hash
//! over arbitrary byte tokens, and the bounded memoization cache shared by
//! every hasher and sketcher in the crate.
//!
//! # Example
//!
//! ```
//! use setsketch::hashing::{HashWidth, TabulationHasher};
//! use rand::SeedableRng;
//!
//! // A reproducible family of four independent 16-bit hash functions
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let family: Vec<_> = (0..4)
//!     .map(|_| TabulationHasher::from_rng(HashWidth::W16, &mut rng))
//!     .collect();
//!
//! assert!(family.iter().all(|h| h.hash("token") <= u16::MAX as u64));
//! ```

mod cache;
mod tabulation;

pub use cache::{BoundedCache, DEFAULT_SET_CACHE_CAPACITY, DEFAULT_TOKEN_CACHE_CAPACITY};
pub use tabulation::TabulationHasher;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::traits::{Result, SketchError};

/// Output width of a tabulation hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum HashWidth {
    /// 8-bit hashes
    W8,
    /// 16-bit hashes
    W16,
    /// 32-bit hashes
    W32,
    /// 64-bit hashes
    #[default]
    W64,
}

impl HashWidth {
    /// All supported widths, narrowest first
    pub const ALL: [HashWidth; 4] = [HashWidth::W8, HashWidth::W16, HashWidth::W32, HashWidth::W64];

    /// Width in bits
    pub fn bits(self) -> u32 {
        match self {
            HashWidth::W8 => 8,
            HashWidth::W16 => 16,
            HashWidth::W32 => 32,
            HashWidth::W64 => 64,
        }
    }

    /// Width in bytes (number of lookup tables)
    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }

    /// Mask selecting the low `bits()` bits
    pub fn mask(self) -> u64 {
        u64::MAX >> (64 - self.bits())
    }

    /// Narrowest width whose value range `2^q` covers `m`
    ///
    /// Returns [`SketchError::FilterTooWide`] if even 64 bits do not suffice.
    pub fn for_range(m: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|w| (1u128 << w.bits()) >= m as u128)
            .ok_or(SketchError::FilterTooWide(m))
    }
}

impl TryFrom<u32> for HashWidth {
    type Error = SketchError;

    fn try_from(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(HashWidth::W8),
            16 => Ok(HashWidth::W16),
            32 => Ok(HashWidth::W32),
            64 => Ok(HashWidth::W64),
            other => Err(SketchError::UnsupportedWidth(other)),
        }
    }
}

/// Explicit generator for table construction; entropy-seeded when `seed` is `None`
pub(crate) fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
