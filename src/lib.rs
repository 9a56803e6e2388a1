//! # Setsketch
//!
//! Set-similarity sketches for Rust.
//!
//! Setsketch estimates Jaccard and Dice similarity between large token sets
//! without keeping the sets, using compact probabilistic sketches built from
//! a reproducible tabulation hash family. Typical uses are near-duplicate
//! detection, deduplication and approximate search over documents
//! represented as sets of tokens or n-grams.
//!
//! ## Features
//!
//! - **Tabulation Hashing**: Seedable, independent hash functions over byte tokens
//! - **MinHash**: Minwise, b-bit and concatenated 1-bit signatures
//! - **Compression**: Truncation and XOR folding of concatenated hashes
//! - **Bloom Filters**: Approximate membership with union, intersection and size estimates
//! - **Estimators**: Bias-corrected Jaccard/Dice estimates and their error moments
//!
//! ## Quick Start
//!
//! ```rust
//! use setsketch::prelude::*;
//!
//! let sketcher = Concatenated::with_seed(256, 42).unwrap();
//!
//! let a = sketcher.hash("the quick brown fox jumps".split(' ')).unwrap();
//! let b = sketcher.hash("the quick brown fox sleeps".split(' ')).unwrap();
//!
//! // Fold 256 bits down to 64 at a known cost in accuracy
//! let (a, b) = (a.xor_fold(4).unwrap(), b.xor_fold(4).unwrap());
//! println!("Jaccard: ~{:.2}", a.estimate_jaccard(&b, true).unwrap());
//! ```
//!
//! ## Bloom Filters
//!
//! ```rust
//! use setsketch::membership::{k_hashes, BloomFilter};
//! use setsketch::estimators::j_hat_from_bf_corrected;
//!
//! let funcs = k_hashes(3, 512, Some(7)).unwrap();
//! let mut a = BloomFilter::new(512, funcs).unwrap();
//! let mut b = a.clone();
//!
//! for token in ["one", "two", "three"] {
//!     a.add(token);
//! }
//! for token in ["two", "three", "four"] {
//!     b.add(token);
//! }
//!
//! let estimate = j_hat_from_bf_corrected(a.bits(), b.bits(), 512).unwrap();
//! println!("Jaccard: ~{:.2}", estimate);
//! ```
//!
//! ## Caching and Threads
//!
//! Hashers, sketchers and Bloom filters memoize token hashes and set
//! signatures in bounded per-instance caches held in `RefCell`s. They are
//! `Send` but not `Sync`:
//! give each thread its own instance (a shared seed reproduces the same
//! hash family).
//!
//! ## Feature Flags
//!
//! Algorithm families (pick what you need):
//! - `minhash` (default): Minwise, b-bit and concatenated sketches
//! - `membership` (default): Bloom filters
//! - `full`: Enable all algorithm families
//!
//! Bit operations, tabulation hashing and exact similarity measures are
//! always available.

#![cfg_attr(docsrs, feature(doc_cfg))]

// Core traits always available
pub mod traits;

pub mod bits;
pub mod estimators;
pub mod hashing;

#[cfg(feature = "minhash")]
#[cfg_attr(docsrs, doc(cfg(feature = "minhash")))]
pub mod minhash;

#[cfg(feature = "membership")]
#[cfg_attr(docsrs, doc(cfg(feature = "membership")))]
pub mod membership;

pub use traits::{Result, SketchError};

pub mod prelude {
    pub use crate::traits::{ErrorBounds, HashFunction, MembershipSketch, SetSketcher, SketchError};

    pub use crate::bits::{hamdist, BitOps, BitVector};
    pub use crate::hashing::{HashWidth, TabulationHasher};

    #[cfg(feature = "minhash")]
    pub use crate::minhash::{BBit, CompressedHash, Concatenated, Minwise};

    #[cfg(feature = "membership")]
    pub use crate::membership::{k_hashes, BloomFilter};
}

pub use bits::BitVector;
pub use hashing::TabulationHasher;

#[cfg(feature = "minhash")]
pub use minhash::{BBit, CompressedHash, Concatenated, Minwise};

#[cfg(feature = "membership")]
pub use membership::BloomFilter;
