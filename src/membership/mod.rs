//! Membership testing data structures
//!
//! This module provides the Bloom filter and the double-hashing family used
//! to build it. Filters sharing a width and hash family can be compared with
//! the estimators in [`crate::estimators`].
//!
//! # Example
//!
//! ```
//! use setsketch::estimators::j_hat_from_bf;
//! use setsketch::membership::{k_hashes, BloomFilter};
//!
//! let funcs = k_hashes(4, 1024, Some(1)).unwrap();
//! let a = BloomFilter::with_items(1024, funcs, ["x", "y", "z"]).unwrap();
//! let b = a.union_items(["w"]);
//!
//! let estimate = j_hat_from_bf(a.bits(), b.bits()).unwrap();
//! assert!(estimate > 0.5);
//! ```

mod bloom;

pub use bloom::{get_k, k_hashes, opt_k, BloomFilter, DoubleHash};
