//! Geohash-based identifiers and the underlying bit-interleaving codec.

use std::{fmt, str};

use num_bigint::BigUint;

use crate::bits::low_u64;
use crate::geo::check_coordinates;
use crate::id::{check_bit_length, decode_bytes, decode_str, UidValue};
use crate::{BoundingBox, Encoding, Location, Result, UidKind};

/// Number of interleaved geohash bits below the version nibble.
pub const GEOHASH_BITS: u32 = 56;

const GEOHASH_MASK: u64 = (1 << GEOHASH_BITS) - 1;

/// Value of a geohash UID with all geohash bits cleared (version nibble `1010`).
const INITIAL_VALUE: u64 = 0xa << GEOHASH_BITS;

/// Encodes a coordinate pair into a 56-bit geohash.
///
/// Each step halves the active longitude or latitude range, starting with longitude, and appends
/// `1` if the coordinate is strictly above the midpoint.
pub fn encode(latitude: f64, longitude: f64) -> u64 {
    let (mut lat, mut lon) = ((-90.0, 90.0), (-180.0, 180.0));
    let mut geohash = 0u64;
    for i in 0..GEOHASH_BITS {
        let (range, value) = if i % 2 == 0 {
            (&mut lon, longitude)
        } else {
            (&mut lat, latitude)
        };
        let mid = (range.0 + range.1) / 2.0;
        geohash <<= 1;
        if value > mid {
            geohash |= 1;
            range.0 = mid;
        } else {
            range.1 = mid;
        }
    }
    geohash
}

/// Decodes a 56-bit geohash into the region it designates. Bits above the lowest 56 are ignored.
pub fn decode(geohash: u64) -> BoundingBox {
    let (mut lat, mut lon) = ((-90.0, 90.0), (-180.0, 180.0));
    for i in 0..GEOHASH_BITS {
        let range = if i % 2 == 0 { &mut lon } else { &mut lat };
        let mid = (range.0 + range.1) / 2.0;
        if (geohash >> (GEOHASH_BITS - 1 - i)) & 1 == 1 {
            range.0 = mid;
        } else {
            range.1 = mid;
        }
    }
    BoundingBox::new(lat.0, lon.0, lat.1, lon.1)
}

/// Rounds to six decimal places.
fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// A version-3 identifier holding a 56-bit geohash: `[0011 + 8][geohash]`, 60 bits in total.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct GeohashUid(BigUint);

impl GeohashUid {
    /// Minimum string length accepted by [`parse`](Self::parse).
    pub const MIN_STR_LEN: usize = 10;

    /// Minimum byte length accepted by [`from_bytes`](Self::from_bytes).
    pub const MIN_BYTES_LEN: usize = 8;

    /// Creates an identifier for the geohash of the given coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if either coordinate is out of range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dwuid::GeohashUid;
    ///
    /// let uid = GeohashUid::from_coordinates(51.5074, -0.1278)?;
    /// assert_eq!(uid.to_string(), "2kfu9QtsZiV");
    /// let loc = uid.to_location();
    /// assert!((loc.latitude() - 51.5074).abs() < 0.0001);
    /// # Ok::<(), dwuid::Error>(())
    /// ```
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Result<Self> {
        check_coordinates(latitude, longitude)?;
        Ok(Self::from_geohash(encode(latitude, longitude)))
    }

    /// Creates an identifier for the geohash of `location`.
    pub fn from_location(location: &Location) -> Self {
        Self::from_geohash(encode(location.latitude(), location.longitude()))
    }

    fn from_geohash(geohash: u64) -> Self {
        Self(BigUint::from(INITIAL_VALUE | (geohash & GEOHASH_MASK)))
    }

    /// Parses a string representation in the given encoding.
    ///
    /// # Errors
    ///
    /// Fails if the string is shorter than [`MIN_STR_LEN`](Self::MIN_STR_LEN), contains foreign
    /// characters, or does not decode to a 60-bit version-3 value.
    pub fn parse(src: &str, encoding: Encoding) -> Result<Self> {
        Self::from_big_uint(decode_str(UidKind::Geohash, src, encoding, Self::MIN_STR_LEN)?)
    }

    /// Parses a string representation, returning `None` on any failure.
    pub fn try_parse(src: &str, encoding: Encoding) -> Option<Self> {
        Self::parse(src, encoding).ok()
    }

    /// Creates an identifier from its integer value.
    ///
    /// # Errors
    ///
    /// Fails unless the value is exactly 60 bits long and carries version 3.
    pub fn from_big_uint(value: BigUint) -> Result<Self> {
        check_bit_length(UidKind::Geohash, &value, |n| n == 60)?;
        Ok(Self(value))
    }

    /// Creates an identifier from its big-endian byte representation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_big_uint(decode_bytes(UidKind::Geohash, bytes, Self::MIN_BYTES_LEN)?)
    }

    pub(crate) fn new_unchecked(value: BigUint) -> Self {
        Self(value)
    }

    /// Returns the raw 56-bit geohash.
    pub fn geohash(&self) -> u64 {
        low_u64(&self.0) & GEOHASH_MASK
    }

    /// Returns the region encoded by this identifier.
    pub fn to_bounding_box(&self) -> BoundingBox {
        decode(self.geohash())
    }

    /// Returns the center of the encoded region, rounded to six decimal places.
    pub fn to_location(&self) -> Location {
        let center = self.to_bounding_box().center();
        Location::new_unchecked(round6(center.latitude()), round6(center.longitude()))
    }
}

impl UidValue for GeohashUid {
    fn kind(&self) -> UidKind {
        UidKind::Geohash
    }

    fn as_big_uint(&self) -> &BigUint {
        &self.0
    }
}

impl fmt::Display for GeohashUid {
    /// Writes the Base58 representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode(Encoding::Base58))
    }
}

impl str::FromStr for GeohashUid {
    type Err = crate::Error;

    /// Parses the Base58 representation.
    fn from_str(src: &str) -> Result<Self> {
        Self::parse(src, Encoding::Base58)
    }
}
