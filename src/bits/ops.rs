//! Bit-level primitives over integer-like values

use core::ops::BitXor;

use crate::traits::{Result, SketchError};

/// Pure bit operations on a non-negative integer value
///
/// Bit index `i` counts from the least-significant bit, starting at 0.
/// Operations that "modify" a bit return a new value.
pub trait BitOps: Sized {
    /// Number of 1-bits
    fn popcount(&self) -> usize;

    /// Value of bit `i`
    fn getbit(&self, i: usize) -> bool;

    /// Copy of the value with bit `i` set to `val`
    fn setbit(&self, i: usize, val: bool) -> Self;

    /// Copy of the value with bit `i` flipped
    fn flipbit(&self, i: usize) -> Self;

    /// The `i` least-significant bits
    ///
    /// Returns [`SketchError::InvalidParameter`] when `i` is 0.
    fn lowbits(&self, i: usize) -> Result<Self>;

    /// Number of binary digits needed to write the value (1 for zero)
    fn numdigits(&self) -> usize;

    /// Index of the first 0-bit at or above `i`
    fn scan0(&self, i: usize) -> usize;

    /// Index of the first 1-bit at or above `i`, if any
    fn scan1(&self, i: usize) -> Option<usize>;

    /// Most-significant-bit-first binary string, left-padded with zeros to `pad`
    fn digits(&self, pad: Option<usize>) -> String;
}

/// Hamming distance: the number of bit positions where `x` and `y` differ
pub fn hamdist<T>(x: &T, y: &T) -> usize
where
    T: BitOps,
    for<'a> &'a T: BitXor<&'a T, Output = T>,
{
    (x ^ y).popcount()
}

pub(crate) fn check_lowbits(i: usize) -> Result<()> {
    if i == 0 {
        return Err(SketchError::InvalidParameter(
            "number of bits must be > 0".into(),
        ));
    }
    Ok(())
}

pub(crate) fn pad_digits(mut s: String, pad: Option<usize>) -> String {
    if let Some(pad) = pad {
        if pad > s.len() {
            let mut padded = "0".repeat(pad - s.len());
            padded.push_str(&s);
            s = padded;
        }
    }
    s
}

/// Fixed-width implementation
///
/// # Panics
///
/// `setbit` and `flipbit` panic when `i >= 64`, since the result is not
/// representable. Reads beyond bit 63 see zeros.
impl BitOps for u64 {
    #[inline]
    fn popcount(&self) -> usize {
        self.count_ones() as usize
    }

    #[inline]
    fn getbit(&self, i: usize) -> bool {
        i < 64 && (self >> i) & 1 == 1
    }

    fn setbit(&self, i: usize, val: bool) -> Self {
        assert!(i < 64, "bit index {} out of range for u64", i);
        if val {
            self | (1u64 << i)
        } else {
            self & !(1u64 << i)
        }
    }

    fn flipbit(&self, i: usize) -> Self {
        assert!(i < 64, "bit index {} out of range for u64", i);
        self ^ (1u64 << i)
    }

    fn lowbits(&self, i: usize) -> Result<Self> {
        check_lowbits(i)?;
        if i >= 64 {
            Ok(*self)
        } else {
            Ok(self & ((1u64 << i) - 1))
        }
    }

    #[inline]
    fn numdigits(&self) -> usize {
        if *self == 0 {
            1
        } else {
            64 - self.leading_zeros() as usize
        }
    }

    fn scan0(&self, i: usize) -> usize {
        if i >= 64 {
            return i;
        }
        i + (self >> i).trailing_ones() as usize
    }

    fn scan1(&self, i: usize) -> Option<usize> {
        if i >= 64 {
            return None;
        }
        match self >> i {
            0 => None,
            n => Some(i + n.trailing_zeros() as usize),
        }
    }

    fn digits(&self, pad: Option<usize>) -> String {
        pad_digits(format!("{:b}", self), pad)
    }
}
