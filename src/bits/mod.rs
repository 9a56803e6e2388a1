//! Bit manipulation primitives
//!
//! [`BitOps`] is implemented for `u64` (single hash values) and for
//! [`BitVector`] (Bloom filter arrays and concatenated hashes of any width).
//!
//! # Example
//!
//! ```
//! use setsketch::bits::{hamdist, BitOps};
//!
//! let n = 0b1011u64;
//! assert_eq!(n.popcount(), 3);
//! assert_eq!(n.scan0(0), 2);
//! assert_eq!(n.digits(Some(6)), "001011");
//! assert_eq!(hamdist(&n, &0b0011), 1);
//! ```

mod ops;
mod vector;

pub use ops::{hamdist, BitOps};
pub use vector::BitVector;
