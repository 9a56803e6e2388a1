//! MinHash sketches for Jaccard similarity estimation
//!
//! Three progressively more compact sketchers share one tabulation hash
//! family:
//!
//! - [`Minwise`]: `m` full-width minima, one per hash function
//! - [`BBit`]: the `b` lowest bits of each minimum
//! - [`Concatenated`]: `m` single-bit minima packed into one [`CompressedHash`],
//!   which can be shrunk further by truncation or XOR folding
//!
//! # Example
//!
//! ```
//! use setsketch::estimators::j_hat;
//! use setsketch::minhash::BBit;
//! use setsketch::traits::SetSketcher;
//!
//! let sketcher = BBit::with_seed(4, 256, 1).unwrap();
//! let a = sketcher.hash("a b c d e f".split(' ')).unwrap();
//! let b = sketcher.hash("a b c d e g".split(' ')).unwrap();
//!
//! let estimate = j_hat(&a, &b, 4).unwrap();
//! println!("estimated Jaccard: {:.2}", estimate); // true value 5/7
//! ```

mod bbit;
mod compressed;
mod concatenated;
mod minwise;

pub use bbit::BBit;
pub use compressed::CompressedHash;
pub use concatenated::Concatenated;
pub use minwise::Minwise;
