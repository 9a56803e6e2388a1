//! Property-based tests for setsketch.
//!
//! These tests verify invariants that should hold regardless of input:
//! - Bit operations agree with their arithmetic definitions
//! - Tabulation hashes are reproducible from a seed
//! - MinHash signatures have one entry per hash function
//! - Bloom filters never produce false negatives

#[cfg(not(all(feature = "minhash", feature = "membership")))]
compile_error!(
    "Property tests require all features. Run: cargo test --test properties --features full"
);

use proptest::prelude::*;

mod bitops_props {
    use super::*;
    use setsketch::bits::{hamdist, BitOps, BitVector};

    /// Read a binary string least-significant digit first
    fn from_lsb_first(s: &str) -> u64 {
        s.chars()
            .enumerate()
            .filter(|(_, c)| *c == '1')
            .fold(0, |acc, (i, _)| acc | (1u64 << i))
    }

    prop_compose! {
        fn arb_vector()(words in prop::collection::vec(any::<u64>(), 0..4)) -> BitVector {
            BitVector::from_words(words)
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn popcount_is_distance_from_zero(n in any::<u64>()) {
            prop_assert_eq!(n.popcount(), hamdist(&n, &0));
        }

        #[test]
        fn vector_popcount_is_distance_from_zero(v in arb_vector()) {
            prop_assert_eq!(v.popcount(), hamdist(&v, &BitVector::new()));
        }

        #[test]
        fn digits_read_back(n in any::<u64>()) {
            let s = n.digits(None);
            let reversed: String = s.chars().rev().collect();
            prop_assert_eq!(from_lsb_first(&reversed), n);
            prop_assert_eq!(s.len(), n.numdigits());
        }

        #[test]
        fn scans_point_at_stated_bits(n in any::<u64>(), i in 0usize..64) {
            let zero = n.scan0(i);
            prop_assert!(zero >= i);
            prop_assert!(!n.getbit(zero));
            prop_assert!((i..zero).all(|j| n.getbit(j)));

            match n.scan1(i) {
                Some(one) => {
                    prop_assert!(one >= i);
                    prop_assert!(n.getbit(one));
                    prop_assert!((i..one).all(|j| !n.getbit(j)));
                }
                None => prop_assert_eq!(n >> i, 0),
            }
        }

        #[test]
        fn vector_scans_point_at_stated_bits(v in arb_vector(), i in 0usize..300) {
            prop_assert!(!v.getbit(v.scan0(i)));
            if let Some(one) = v.scan1(i) {
                prop_assert!(v.getbit(one));
            }
        }

        #[test]
        fn setbit_then_getbit(n in any::<u64>(), i in 0usize..64) {
            prop_assert!(n.setbit(i, true).getbit(i));
            prop_assert!(!n.setbit(i, false).getbit(i));
        }

        #[test]
        fn flipbit_is_involution(n in any::<u64>(), i in 0usize..64) {
            prop_assert_eq!(n.flipbit(i).flipbit(i), n);
            prop_assert_eq!(n.flipbit(i).abs_diff(n), 1u64 << i);
        }

        #[test]
        fn vector_flipbit_differs_by_power_of_two(v in arb_vector(), i in 0usize..300) {
            let flipped = v.flipbit(i);
            prop_assert_eq!(&flipped.flipbit(i), &v);
            prop_assert_eq!(hamdist(&flipped, &v), 1);
            prop_assert_eq!(flipped.getbit(i), !v.getbit(i));
        }

        #[test]
        fn vector_matches_word(n in any::<u64>(), i in 1usize..64) {
            let v = BitVector::from(n);
            prop_assert_eq!(v.digits(Some(64)), n.digits(Some(64)));
            prop_assert_eq!(v.lowbits(i).unwrap().to_u64(), Some(n.lowbits(i).unwrap()));
        }
    }
}

mod hashing_props {
    use super::*;
    use setsketch::hashing::TabulationHasher;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn same_seed_same_hash(
            seed in any::<u64>(),
            width in prop::sample::select(vec![8u32, 16, 32, 64]),
            token in prop::collection::vec(any::<u8>(), 0..32),
        ) {
            let a = TabulationHasher::with_seed(width, seed).unwrap();
            let b = TabulationHasher::with_seed(width, seed).unwrap();
            let h = a.hash(&token);
            prop_assert_eq!(h, b.hash(&token));
            prop_assert_eq!(h, a.hash(&token));
            if width < 64 {
                prop_assert!(h < 1u64 << width);
            }
        }
    }
}

mod minhash_props {
    use super::*;
    use setsketch::minhash::{Concatenated, Minwise};
    use setsketch::traits::SetSketcher;

    fn arb_tokens() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z]{1,8}", 1..40)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn signature_length_is_m(m in 1usize..64, seed in any::<u64>(), tokens in arb_tokens()) {
            let sketcher = Minwise::with_seed(m, seed).unwrap();
            prop_assert_eq!(sketcher.hash(&tokens).unwrap().len(), m);
        }

        #[test]
        fn identical_sets_estimate_one(seed in any::<u64>(), tokens in arb_tokens()) {
            let sketcher = Concatenated::with_seed(128, seed).unwrap();
            let h = sketcher.hash(&tokens).unwrap();
            prop_assert_eq!(h.significant_bits(), 128);
            prop_assert_eq!(h.estimate_jaccard(&h, true).unwrap(), 1.0);
        }
    }
}

mod bloom_props {
    use super::*;
    use setsketch::membership::{k_hashes, BloomFilter};

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn no_false_negatives(
            m in 1usize..4096,
            k in 1usize..8,
            seed in any::<u64>(),
            items in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), 1..100),
        ) {
            let mut bloom = BloomFilter::new(m, k_hashes(k, m, Some(seed)).unwrap()).unwrap();
            for item in &items {
                bloom.add(item);
                prop_assert!(bloom.contains(item), "false negative right after add");
            }
            for item in &items {
                prop_assert!(bloom.contains(item), "false negative after later adds");
            }
        }
    }
}
