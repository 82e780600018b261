//! Random identifiers.

use std::{fmt, str};

use num_bigint::BigUint;

use crate::id::{check_bit_length, decode_bytes, decode_str, UidValue};
use crate::{Encoding, Error, Result, UidKind};

/// A version-2 identifier: `[1001][uniformly random field]`, at least 24 bits in total.
///
/// Random identifiers carry no ordering guarantee.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct RandomUid(BigUint);

impl RandomUid {
    /// Minimum string length accepted by [`parse`](Self::parse).
    pub const MIN_STR_LEN: usize = 4;

    /// Minimum byte length accepted by [`from_bytes`](Self::from_bytes).
    pub const MIN_BYTES_LEN: usize = 3;

    /// Parses a string representation in the given encoding.
    ///
    /// # Errors
    ///
    /// Fails if the string is shorter than [`MIN_STR_LEN`](Self::MIN_STR_LEN), contains foreign
    /// characters, or does not decode to a version-2 value of at least 24 bits.
    pub fn parse(src: &str, encoding: Encoding) -> Result<Self> {
        Self::from_big_uint(decode_str(UidKind::Random, src, encoding, Self::MIN_STR_LEN)?)
    }

    /// Parses a string representation, returning `None` on any failure.
    pub fn try_parse(src: &str, encoding: Encoding) -> Option<Self> {
        Self::parse(src, encoding).ok()
    }

    /// Creates an identifier from its integer value.
    pub fn from_big_uint(value: BigUint) -> Result<Self> {
        check_bit_length(UidKind::Random, &value, |n| n >= 24)?;
        Ok(Self(value))
    }

    /// Creates an identifier from its big-endian byte representation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_big_uint(decode_bytes(UidKind::Random, bytes, Self::MIN_BYTES_LEN)?)
    }

    pub(crate) fn new_unchecked(value: BigUint) -> Self {
        Self(value)
    }
}

impl UidValue for RandomUid {
    fn kind(&self) -> UidKind {
        UidKind::Random
    }

    fn as_big_uint(&self) -> &BigUint {
        &self.0
    }
}

impl fmt::Display for RandomUid {
    /// Writes the Base58 representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode(Encoding::Base58))
    }
}

impl str::FromStr for RandomUid {
    type Err = Error;

    /// Parses the Base58 representation.
    fn from_str(src: &str) -> Result<Self> {
        Self::parse(src, Encoding::Base58)
    }
}
