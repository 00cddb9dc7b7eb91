//! Byte-backed bit vector.
//!
//! Bits are stored least-significant-bit first within each byte: bit `i`
//! lives at byte `i / 8`, bit position `i % 8`. Capacity is always a whole
//! number of bytes.

use bitvec::prelude::*;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{Error, Result};

/// Number of bits per storage byte.
pub const BITS_PER_BYTE: usize = 8;

/// Round a bit count up to the next multiple of [`BITS_PER_BYTE`].
pub fn round_up_to_byte(bits: usize) -> usize {
    let rem = bits % BITS_PER_BYTE;
    if rem == 0 {
        bits
    } else {
        bits + (BITS_PER_BYTE - rem)
    }
}

/// Fixed-capacity sequence of bit flags.
///
/// Equality and hashing look only at the set bits, so two vectors that
/// differ only in trailing all-zero bytes compare equal.
#[derive(Clone, Default)]
pub struct BitVector {
    bits: BitVec<u8, Lsb0>,
}

impl BitVector {
    /// Create a vector with every bit cleared, rounded up to whole bytes.
    pub fn new(bits: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, round_up_to_byte(bits)),
        }
    }

    /// Create a vector with every bit set, rounded up to whole bytes.
    pub fn ones(bits: usize) -> Self {
        Self {
            bits: BitVec::repeat(true, round_up_to_byte(bits)),
        }
    }

    /// Like [`BitVector::ones`], but reports allocation failure instead of
    /// aborting.
    pub(crate) fn try_ones(bits: usize) -> Result<Self> {
        let len = round_up_to_byte(bits) / BITS_PER_BYTE;
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(len).map_err(|e| {
            Error::InternalFailure(format!("cannot allocate {} bit template: {}", bits, e))
        })?;
        bytes.resize(len, u8::MAX);
        Ok(Self {
            bits: BitVec::from_vec(bytes),
        })
    }

    /// Build a vector from its raw byte form.
    ///
    /// Trailing all-zero bytes are dropped, so the capacity is the smallest
    /// byte-aligned capacity that holds the highest set bit.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bits: BitVec::from_slice(trim_zero_bytes(bytes)),
        }
    }

    /// Number of addressable bits (always a multiple of 8).
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Get the bit at `index`. Bits beyond the capacity read as unset.
    pub fn get(&self, index: usize) -> bool {
        self.bits.get(index).is_some_and(|b| *b)
    }

    /// Set the bit at `index`, growing the vector if needed.
    pub fn set(&mut self, index: usize) {
        self.grow_to(index);
        self.bits.set(index, true);
    }

    /// Clear the bit at `index`. Bits beyond the capacity are already clear.
    pub fn clear(&mut self, index: usize) {
        if index < self.bits.len() {
            self.bits.set(index, false);
        }
    }

    /// Toggle the bit at `index`, growing the vector if needed.
    pub fn flip(&mut self, index: usize) {
        self.grow_to(index);
        let was = self.bits[index];
        self.bits.set(index, !was);
    }

    fn grow_to(&mut self, index: usize) {
        if index >= self.bits.len() {
            self.bits.resize(round_up_to_byte(index + 1), false);
        }
    }

    /// Number of set bits.
    pub fn cardinality(&self) -> usize {
        self.bits.count_ones()
    }

    /// Returns `true` when no bit is set.
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Index of the highest set bit.
    pub fn highest_set_bit(&self) -> Option<usize> {
        self.bits.last_one()
    }

    /// Iterate over the indices of set bits in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Raw byte form, full capacity.
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    fn significant_bytes(&self) -> &[u8] {
        trim_zero_bytes(self.as_bytes())
    }
}

fn trim_zero_bytes(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &bytes[..end]
}

impl PartialEq for BitVector {
    fn eq(&self, other: &Self) -> bool {
        self.significant_bytes() == other.significant_bytes()
    }
}

impl Eq for BitVector {}

impl Hash for BitVector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant_bytes().hash(state);
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitVector")
            .field("capacity", &self.capacity())
            .field("ones", &self.iter_ones().collect::<Vec<_>>())
            .finish()
    }
}

impl FromIterator<usize> for BitVector {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut v = BitVector::default();
        for index in iter {
            v.set(index);
        }
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_up_to_byte() {
        assert_eq!(round_up_to_byte(0), 0);
        assert_eq!(round_up_to_byte(1), 8);
        assert_eq!(round_up_to_byte(8), 8);
        assert_eq!(round_up_to_byte(9), 16);
        assert_eq!(round_up_to_byte(203), 208);
    }

    #[test]
    fn test_new_and_ones() {
        let zeros = BitVector::new(12);
        assert_eq!(zeros.capacity(), 16);
        assert_eq!(zeros.cardinality(), 0);
        assert!(zeros.is_empty());

        let ones = BitVector::ones(12);
        assert_eq!(ones.capacity(), 16);
        assert_eq!(ones.cardinality(), 16);
        assert_eq!(ones.as_bytes(), &[0xFF, 0xFF]);
    }

    #[test]
    fn test_lsb_first_layout() {
        let mut v = BitVector::new(16);
        v.set(0);
        v.set(9);
        assert_eq!(v.as_bytes(), &[0b0000_0001, 0b0000_0010]);
        assert!(v.get(0));
        assert!(v.get(9));
        assert!(!v.get(1));
        assert!(!v.get(1000));
    }

    #[test]
    fn test_flip_twice_cancels() {
        let mut v = BitVector::ones(8);
        v.flip(3);
        assert!(!v.get(3));
        v.flip(3);
        assert!(v.get(3));
        assert_eq!(v.cardinality(), 8);
    }

    #[test]
    fn test_duplicate_flips_leave_odd_counts_cleared() {
        let mut v = BitVector::ones(8);
        for i in [1, 1, 2] {
            v.flip(i);
        }
        assert_eq!(v.as_bytes(), &[0b1111_1011]);
        assert_eq!(v.cardinality(), 7);
    }

    #[test]
    fn test_set_grows_clear_does_not() {
        let mut v = BitVector::default();
        v.clear(20);
        assert_eq!(v.capacity(), 0);
        v.set(20);
        assert_eq!(v.capacity(), 24);
        assert!(v.get(20));
        assert_eq!(v.as_bytes(), &[0, 0, 0b0001_0000]);
    }

    #[test]
    fn test_from_bytes_trims_trailing_zeros() {
        let v = BitVector::from_bytes(&[0x01, 0x80, 0x00, 0x00]);
        assert_eq!(v.capacity(), 16);
        assert_eq!(v.highest_set_bit(), Some(15));

        let empty = BitVector::from_bytes(&[0, 0, 0]);
        assert_eq!(empty.capacity(), 0);
        assert_eq!(empty.highest_set_bit(), None);
    }

    #[test]
    fn test_equality_ignores_trailing_zero_bytes() {
        let mut wide = BitVector::new(64);
        wide.set(2);
        let narrow = BitVector::from_bytes(wide.as_bytes());
        assert_ne!(wide.capacity(), narrow.capacity());
        assert_eq!(wide, narrow);

        use std::collections::hash_map::DefaultHasher;
        let hash = |v: &BitVector| {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&wide), hash(&narrow));
    }

    #[test]
    fn test_iter_ones_and_from_iter() {
        let v: BitVector = [1usize, 5, 8, 17].into_iter().collect();
        assert_eq!(v.iter_ones().collect::<Vec<_>>(), vec![1, 5, 8, 17]);
        assert_eq!(v.capacity(), 24);
    }

    #[test]
    fn test_try_ones() {
        let v = BitVector::try_ones(203).unwrap();
        assert_eq!(v.capacity(), 208);
        assert_eq!(v.cardinality(), 208);
    }
}
