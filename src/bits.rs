//! Bit- and byte-level primitives over arbitrary-precision integers.

use num_bigint::BigUint;
use rand::RngCore;

/// Returns the 1-indexed position of the highest set bit, or zero for zero.
pub(crate) fn bit_length(value: &BigUint) -> u64 {
    value.bits()
}

/// Returns the big-endian byte representation of `value` using the fewest bytes possible.
pub fn to_bytes(value: &BigUint) -> Vec<u8> {
    value.to_bytes_be()
}

/// Creates an integer from its big-endian byte representation.
pub fn from_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Returns the version encoded in the top four bits of a value whose bit length is `bit_length`.
///
/// The top bit of the nibble is always set, so nibbles `8..=15` map to versions `1..=8`.
pub(crate) fn version_of(value: &BigUint, bit_length: u64) -> u8 {
    debug_assert!(bit_length >= 4 && bit_length == value.bits());
    let nibble = low_u64(&(value >> (bit_length - 4)));
    (nibble & 7) as u8 + 1
}

/// Returns the lowest 64 bits of `value`.
pub(crate) fn low_u64(value: &BigUint) -> u64 {
    value.iter_u64_digits().next().unwrap_or(0)
}

/// Draws a uniformly distributed integer in `0..2^bits` from `rng`.
pub(crate) fn random_bits<R: RngCore + ?Sized>(rng: &mut R, bits: u32) -> BigUint {
    let len = (bits as usize + 7) / 8;
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    let excess = len * 8 - bits as usize;
    if let Some(first) = bytes.first_mut() {
        *first &= 0xff >> excess;
    }
    BigUint::from_bytes_be(&bytes)
}
