//! Error type shared by all parsing, decoding and construction paths.

use std::fmt;

use crate::Encoding;

/// A shorthand for results carrying this crate's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Identifies the kind of identifier an operation was working on when it failed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UidKind {
    /// Any UID, before version dispatch.
    Uid,
    /// A [`TimestampUid`](crate::TimestampUid) (version 1).
    Timestamp,
    /// A [`RandomUid`](crate::RandomUid) (version 2).
    Random,
    /// A [`GeohashUid`](crate::GeohashUid) (version 3).
    Geohash,
}

impl UidKind {
    /// Returns the version number carried by identifiers of this kind, or `None` for the generic
    /// kind.
    pub const fn version(self) -> Option<u8> {
        match self {
            Self::Uid => None,
            Self::Timestamp => Some(1),
            Self::Random => Some(2),
            Self::Geohash => Some(3),
        }
    }
}

impl fmt::Display for UidKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uid => "UID",
            Self::Timestamp => "TimestampUID",
            Self::Random => "RandomUID",
            Self::Geohash => "GeohashUID",
        })
    }
}

/// Error returned when an identifier, a codec input, a coordinate or a generator configuration is
/// rejected.
#[derive(Clone, PartialEq, Debug, thiserror::Error)]
pub enum Error {
    /// The string or byte input is shorter than the kind's minimum.
    #[error("invalid {kind} length: {length}")]
    InvalidLength { kind: UidKind, length: usize },

    /// The decoded integer's bit length is outside the range allowed for the kind.
    #[error("invalid {kind} bit length: {bit_length}")]
    InvalidBitLength { kind: UidKind, bit_length: u64 },

    /// The version nibble does not name any known kind.
    #[error("unknown UID version: {0}")]
    UnknownVersion(u8),

    /// The version nibble names a kind other than the one requested.
    #[error("invalid {kind} version: {version}")]
    VersionMismatch { kind: UidKind, version: u8 },

    /// A character outside the codec's alphabet (and alias set) was found while decoding.
    #[error("invalid {encoding} character at index {index}: {input}")]
    InvalidCharacter {
        encoding: Encoding,
        index: usize,
        input: String,
    },

    /// A generator was configured with an unsupported bit width.
    #[error("{kind} bits must be greater than or equal to {min}: {bits}")]
    InvalidConfiguration { kind: UidKind, bits: u32, min: u32 },

    /// Latitude outside `[-90, 90]`.
    #[error("latitude must be between -90 and 90: {0}")]
    LatitudeOutOfRange(f64),

    /// Longitude outside `[-180, 180]`.
    #[error("longitude must be between -180 and 180: {0}")]
    LongitudeOutOfRange(f64),

    /// A millisecond timestamp that precedes the Unix epoch or does not fit in 48 bits.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(i128),
}
