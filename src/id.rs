//! The common identifier interface and version dispatch.

use std::{fmt, str};

use num_bigint::BigUint;

use crate::bits::{bit_length, from_bytes, to_bytes, version_of};
use crate::{Encoding, Error, GeohashUid, RandomUid, Result, TimestampUid, UidKind};

/// Operations shared by every kind of identifier.
///
/// An identifier is an immutable non-negative integer whose top four bits carry a version tag.
pub trait UidValue {
    /// Returns the kind of this identifier.
    fn kind(&self) -> UidKind;

    /// Returns a reference to the integer value.
    fn as_big_uint(&self) -> &BigUint;

    /// Returns a copy of the integer value.
    fn to_big_uint(&self) -> BigUint {
        self.as_big_uint().clone()
    }

    /// Returns the version stored in the top nibble (1, 2 or 3).
    fn version(&self) -> u8 {
        let value = self.as_big_uint();
        version_of(value, bit_length(value))
    }

    /// Returns the string representation in the given encoding.
    fn encode(&self, encoding: Encoding) -> String {
        encoding.encode(self.as_big_uint())
    }

    /// Returns the minimal big-endian byte representation.
    fn to_bytes(&self) -> Vec<u8> {
        to_bytes(self.as_big_uint())
    }
}

/// Decodes `src` after checking it holds at least `min_len` characters.
pub(crate) fn decode_str(
    kind: UidKind,
    src: &str,
    encoding: Encoding,
    min_len: usize,
) -> Result<BigUint> {
    let length = src.chars().count();
    if length < min_len {
        return Err(Error::InvalidLength { kind, length });
    }
    encoding.decode(src)
}

/// Reads `bytes` after checking it holds at least `min_len` bytes.
pub(crate) fn decode_bytes(kind: UidKind, bytes: &[u8], min_len: usize) -> Result<BigUint> {
    if bytes.len() < min_len {
        return Err(Error::InvalidLength {
            kind,
            length: bytes.len(),
        });
    }
    Ok(from_bytes(bytes))
}

/// Checks the bit length of `value` with `accept`, then that its version matches `kind`.
pub(crate) fn check_bit_length(
    kind: UidKind,
    value: &BigUint,
    accept: impl FnOnce(u64) -> bool,
) -> Result<()> {
    let bit_length = bit_length(value);
    if !accept(bit_length) {
        return Err(Error::InvalidBitLength { kind, bit_length });
    }
    let version = version_of(value, bit_length);
    if Some(version) != kind.version() {
        return Err(Error::VersionMismatch { kind, version });
    }
    Ok(())
}

/// Returns true for the bit lengths a timestamp identifier may have.
pub(crate) const fn is_timestamp_bit_length(bit_length: u64) -> bool {
    bit_length >= 60 || bit_length == 52
}

/// Any identifier, tagged with its kind.
///
/// # Examples
///
/// ```rust
/// use dwuid::{Encoding, Uid, UidValue};
///
/// let uid = Uid::parse("2kfu9QtsZiV", Encoding::Base58)?;
/// assert_eq!(uid.version(), 3);
/// if let Uid::Geohash(g) = &uid {
///     println!("{:?}", g.to_location());
/// }
/// # Ok::<(), dwuid::Error>(())
/// ```
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Uid {
    /// Version 1.
    Timestamp(TimestampUid),
    /// Version 2.
    Random(RandomUid),
    /// Version 3.
    Geohash(GeohashUid),
}

impl Uid {
    /// Minimum string length accepted by [`parse`](Self::parse).
    pub const MIN_STR_LEN: usize = 4;

    /// Minimum byte length accepted by [`from_bytes`](Self::from_bytes).
    pub const MIN_BYTES_LEN: usize = 3;

    /// Minimum bit length of any identifier.
    pub const MIN_BIT_LEN: u64 = 24;

    /// Creates a geohash identifier from coordinates.
    pub fn geohash(latitude: f64, longitude: f64) -> Result<GeohashUid> {
        GeohashUid::from_coordinates(latitude, longitude)
    }

    /// Parses a string representation of any kind.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidLength`] before decoding if `src` is shorter than
    /// [`MIN_STR_LEN`](Self::MIN_STR_LEN), and otherwise as [`from_big_uint`](Self::from_big_uint).
    pub fn parse(src: &str, encoding: Encoding) -> Result<Self> {
        Self::from_big_uint(decode_str(UidKind::Uid, src, encoding, Self::MIN_STR_LEN)?)
    }

    /// Parses a string representation of any kind, returning `None` on any failure.
    pub fn try_parse(src: &str, encoding: Encoding) -> Option<Self> {
        Self::parse(src, encoding).ok()
    }

    /// Creates an identifier from its integer value, dispatching on the version nibble.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidBitLength`] for values shorter than 24 bits or not matching the
    /// kind's width, and with [`Error::UnknownVersion`] for versions other than 1, 2 and 3.
    pub fn from_big_uint(value: BigUint) -> Result<Self> {
        let bit_length = bit_length(&value);
        if bit_length < Self::MIN_BIT_LEN {
            return Err(Error::InvalidBitLength {
                kind: UidKind::Uid,
                bit_length,
            });
        }
        match version_of(&value, bit_length) {
            1 if is_timestamp_bit_length(bit_length) => {
                Ok(Self::Timestamp(TimestampUid::new_unchecked(value)))
            }
            1 => Err(Error::InvalidBitLength {
                kind: UidKind::Timestamp,
                bit_length,
            }),
            2 => Ok(Self::Random(RandomUid::new_unchecked(value))),
            3 if bit_length == 60 => Ok(Self::Geohash(GeohashUid::new_unchecked(value))),
            3 => Err(Error::InvalidBitLength {
                kind: UidKind::Geohash,
                bit_length,
            }),
            version => Err(Error::UnknownVersion(version)),
        }
    }

    /// Creates an identifier of any kind from its big-endian byte representation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_big_uint(decode_bytes(UidKind::Uid, bytes, Self::MIN_BYTES_LEN)?)
    }

    fn as_value(&self) -> &dyn UidValue {
        match self {
            Self::Timestamp(e) => e,
            Self::Random(e) => e,
            Self::Geohash(e) => e,
        }
    }
}

impl UidValue for Uid {
    fn kind(&self) -> UidKind {
        self.as_value().kind()
    }

    fn as_big_uint(&self) -> &BigUint {
        self.as_value().as_big_uint()
    }
}

impl fmt::Display for Uid {
    /// Writes the Base58 representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode(Encoding::Base58))
    }
}

impl str::FromStr for Uid {
    type Err = Error;

    /// Parses the Base58 representation.
    fn from_str(src: &str) -> Result<Self> {
        Self::parse(src, Encoding::Base58)
    }
}

impl From<Uid> for BigUint {
    fn from(src: Uid) -> Self {
        src.to_big_uint()
    }
}

impl From<Uid> for String {
    fn from(src: Uid) -> Self {
        src.to_string()
    }
}

impl TryFrom<BigUint> for Uid {
    type Error = Error;

    fn try_from(src: BigUint) -> Result<Self> {
        Self::from_big_uint(src)
    }
}

impl TryFrom<&[u8]> for Uid {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self> {
        Self::from_bytes(src)
    }
}

macro_rules! impl_uid_variant {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Uid {
            fn from(src: $ty) -> Self {
                Self::$variant(src)
            }
        }

        impl TryFrom<Uid> for $ty {
            type Error = Error;

            /// Extracts the variant, failing with [`Error::VersionMismatch`] for other kinds.
            fn try_from(src: Uid) -> Result<Self> {
                match src {
                    Uid::$variant(e) => Ok(e),
                    other => Err(Error::VersionMismatch {
                        kind: UidKind::$variant,
                        version: other.version(),
                    }),
                }
            }
        }
    };
}

impl_uid_variant!(Timestamp, TimestampUid);
impl_uid_variant!(Random, RandomUid);
impl_uid_variant!(Geohash, GeohashUid);

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uid, UidValue};
    use crate::{Encoding, GeohashUid, RandomUid, Result, TimestampUid};
    use serde::{de, Deserializer, Serializer};
    use std::marker::PhantomData;

    /// Parsing entry points shared by the deserializable types.
    trait Decode: Sized {
        const EXPECTING: &'static str;
        fn decode_str(src: &str) -> Result<Self>;
        fn decode_bytes(src: &[u8]) -> Result<Self>;
    }

    macro_rules! impl_serde {
        ($ty:ty, $expecting:literal) => {
            impl Decode for $ty {
                const EXPECTING: &'static str = $expecting;

                fn decode_str(src: &str) -> Result<Self> {
                    <$ty>::parse(src, Encoding::Base58)
                }

                fn decode_bytes(src: &[u8]) -> Result<Self> {
                    <$ty>::from_bytes(src)
                }
            }

            impl serde::Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    if serializer.is_human_readable() {
                        serializer.serialize_str(&self.encode(Encoding::Base58))
                    } else {
                        serializer.serialize_bytes(&self.to_bytes())
                    }
                }
            }

            impl<'de> serde::Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    if deserializer.is_human_readable() {
                        deserializer.deserialize_str(VisitorImpl(PhantomData))
                    } else {
                        deserializer.deserialize_bytes(VisitorImpl(PhantomData))
                    }
                }
            }
        };
    }

    impl_serde!(Uid, "a UID representation");
    impl_serde!(TimestampUid, "a TimestampUID representation");
    impl_serde!(RandomUid, "a RandomUID representation");
    impl_serde!(GeohashUid, "a GeohashUID representation");

    struct VisitorImpl<T>(PhantomData<T>);

    impl<'de, T: Decode> de::Visitor<'de> for VisitorImpl<T> {
        type Value = T;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str(T::EXPECTING)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            T::decode_str(value).map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            T::decode_bytes(value).map_err(de::Error::custom)
        }
    }

}
