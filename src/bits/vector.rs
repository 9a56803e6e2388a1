//! Arbitrary-width bit vector with integer semantics

use core::fmt;
use core::ops::{BitAnd, BitOr, BitXor, Shr};

use super::ops::{check_lowbits, pad_digits, BitOps};
use crate::traits::Result;

const WORD_BITS: usize = 64;

/// A non-negative integer of unbounded width stored as little-endian `u64` words
///
/// Used for Bloom filter bit arrays and concatenated hashes wider than one
/// machine word. Trailing zero words are never stored, so two vectors holding
/// the same integer compare equal regardless of how they were built.
///
/// # Example
///
/// ```
/// use setsketch::bits::{BitOps, BitVector};
///
/// let mut v = BitVector::new();
/// v.set(70);
/// v.set(1);
/// assert_eq!(v.popcount(), 2);
/// assert_eq!(v.scan1(2), Some(70));
/// assert_eq!(v.numdigits(), 71);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitVector {
    words: Vec<u64>,
}

impl BitVector {
    /// The zero vector
    pub fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Build from little-endian words
    pub fn from_words(words: Vec<u64>) -> Self {
        let mut v = Self { words };
        v.normalize();
        v
    }

    /// Little-endian words, without trailing zero words
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Whether every bit is 0
    pub fn is_zero(&self) -> bool {
        self.words.is_empty()
    }

    /// Set bit `i` in place
    pub fn set(&mut self, i: usize) {
        let w = i / WORD_BITS;
        if w >= self.words.len() {
            self.words.resize(w + 1, 0);
        }
        self.words[w] |= 1u64 << (i % WORD_BITS);
    }

    /// Clear bit `i` in place
    pub fn clear(&mut self, i: usize) {
        let w = i / WORD_BITS;
        if let Some(word) = self.words.get_mut(w) {
            *word &= !(1u64 << (i % WORD_BITS));
            self.normalize();
        }
    }

    /// The value as a `u64`, if it fits
    pub fn to_u64(&self) -> Option<u64> {
        match self.words.len() {
            0 => Some(0),
            1 => Some(self.words[0]),
            _ => None,
        }
    }

    /// Iterate over bits least-significant first, up to the highest set bit
    pub fn iter_bits(&self) -> impl Iterator<Item = bool> + '_ {
        let len = if self.is_zero() { 0 } else { self.numdigits() };
        (0..len).map(move |i| self.getbit(i))
    }

    fn normalize(&mut self) {
        while self.words.last() == Some(&0) {
            self.words.pop();
        }
    }

    fn zip_words(&self, other: &Self, f: impl Fn(u64, u64) -> u64) -> Self {
        let len = self.words.len().max(other.words.len());
        let words = (0..len)
            .map(|i| {
                let a = self.words.get(i).copied().unwrap_or(0);
                let b = other.words.get(i).copied().unwrap_or(0);
                f(a, b)
            })
            .collect();
        Self::from_words(words)
    }
}

impl From<u64> for BitVector {
    fn from(value: u64) -> Self {
        Self::from_words(vec![value])
    }
}

impl BitOps for BitVector {
    fn popcount(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    fn getbit(&self, i: usize) -> bool {
        self.words
            .get(i / WORD_BITS)
            .map_or(false, |w| (w >> (i % WORD_BITS)) & 1 == 1)
    }

    fn setbit(&self, i: usize, val: bool) -> Self {
        let mut v = self.clone();
        if val {
            v.set(i);
        } else {
            v.clear(i);
        }
        v
    }

    fn flipbit(&self, i: usize) -> Self {
        self.setbit(i, !self.getbit(i))
    }

    fn lowbits(&self, i: usize) -> Result<Self> {
        check_lowbits(i)?;
        let full = i / WORD_BITS;
        let rem = i % WORD_BITS;
        let mut words: Vec<u64> = self
            .words
            .iter()
            .take(full + usize::from(rem > 0))
            .copied()
            .collect();
        if rem > 0 && words.len() == full + 1 {
            words[full] &= (1u64 << rem) - 1;
        }
        Ok(Self::from_words(words))
    }

    fn numdigits(&self) -> usize {
        match self.words.last() {
            None => 1,
            Some(last) => {
                (self.words.len() - 1) * WORD_BITS + (WORD_BITS - last.leading_zeros() as usize)
            }
        }
    }

    fn scan0(&self, i: usize) -> usize {
        let mut w = i / WORD_BITS;
        let mut offset = i % WORD_BITS;
        loop {
            let word = self.words.get(w).copied().unwrap_or(0);
            let zeros = !word >> offset;
            if zeros != 0 {
                return w * WORD_BITS + offset + zeros.trailing_zeros() as usize;
            }
            w += 1;
            offset = 0;
        }
    }

    fn scan1(&self, i: usize) -> Option<usize> {
        let mut w = i / WORD_BITS;
        let mut offset = i % WORD_BITS;
        while let Some(&word) = self.words.get(w) {
            let ones = word >> offset;
            if ones != 0 {
                return Some(w * WORD_BITS + offset + ones.trailing_zeros() as usize);
            }
            w += 1;
            offset = 0;
        }
        None
    }

    fn digits(&self, pad: Option<usize>) -> String {
        let s: String = (0..self.numdigits())
            .rev()
            .map(|i| if self.getbit(i) { '1' } else { '0' })
            .collect();
        pad_digits(s, pad)
    }
}

impl BitAnd for &BitVector {
    type Output = BitVector;

    fn bitand(self, rhs: Self) -> BitVector {
        self.zip_words(rhs, |a, b| a & b)
    }
}

impl BitOr for &BitVector {
    type Output = BitVector;

    fn bitor(self, rhs: Self) -> BitVector {
        self.zip_words(rhs, |a, b| a | b)
    }
}

impl BitXor for &BitVector {
    type Output = BitVector;

    fn bitxor(self, rhs: Self) -> BitVector {
        self.zip_words(rhs, |a, b| a ^ b)
    }
}

impl Shr<usize> for &BitVector {
    type Output = BitVector;

    fn shr(self, n: usize) -> BitVector {
        let skip = n / WORD_BITS;
        let bits = n % WORD_BITS;
        if skip >= self.words.len() {
            return BitVector::new();
        }
        let src = &self.words[skip..];
        let words = (0..src.len())
            .map(|i| {
                let lo = src[i] >> bits;
                let hi = match (bits, src.get(i + 1)) {
                    (0, _) | (_, None) => 0,
                    (_, Some(&next)) => next << (WORD_BITS - bits),
                };
                lo | hi
            })
            .collect();
        BitVector::from_words(words)
    }
}

impl fmt::LowerHex for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();
        match self.words.split_last() {
            None => s.push('0'),
            Some((last, rest)) => {
                s.push_str(&format!("{:x}", last));
                for w in rest.iter().rev() {
                    s.push_str(&format!("{:016x}", w));
                }
            }
        }
        f.pad_integral(true, "0x", &s)
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitVector({:#x})", self)
    }
}
