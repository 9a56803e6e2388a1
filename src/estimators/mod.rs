//! Similarity estimators
//!
//! Pure functions recovering Jaccard and Dice similarity from exact token
//! sets, MinHash signatures and Bloom filter bit vectors, plus the moments
//! of the concatenated-hash estimator.
//!
//! | Input | Jaccard | Dice |
//! |-------|---------|------|
//! | token sets | [`jaccard`] | [`dice_coefficient`] |
//! | b-bit signatures | [`j_hat`] | |
//! | concatenated hashes | [`j_hat_from_conc`] | |
//! | Bloom bit vectors | [`j_hat_from_bf`], [`j_hat_from_bf_corrected`] | [`d_hat_from_bf`] |
//!
//! # Example
//!
//! ```
//! use setsketch::estimators::{jaccard, mse_j_hat};
//!
//! let exact = jaccard(["a", "b", "c"], ["b", "c", "d"]).unwrap();
//! assert_eq!(exact, 0.5);
//!
//! // Expected squared error of a 256-bit concatenated hash folded twice
//! let mse = mse_j_hat(exact, 128, 2);
//! assert!(mse > 0.0);
//! ```

mod exact;

#[cfg(feature = "minhash")]
mod minhash;

#[cfg(feature = "membership")]
mod bloom;

pub use exact::{dice_coefficient, jaccard};

#[cfg(feature = "minhash")]
#[cfg_attr(docsrs, doc(cfg(feature = "minhash")))]
pub use minhash::{conc_error_bounds, j_hat, j_hat_from_conc, mean_j_hat, mse_j_hat, var_j_hat};

#[cfg(feature = "membership")]
#[cfg_attr(docsrs, doc(cfg(feature = "membership")))]
pub use bloom::{d_hat_from_bf, j_hat_from_bf, j_hat_from_bf_corrected};
