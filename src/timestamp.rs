//! Timestamp-based identifiers.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use std::{fmt, str};

use num_bigint::BigUint;

use crate::bits::{bit_length, low_u64};
use crate::id::{check_bit_length, decode_bytes, decode_str, is_timestamp_bit_length, UidValue};
use crate::{Encoding, Error, Result, UidKind};

/// Width of the millisecond timestamp field.
pub const TIMESTAMP_BITS: u32 = 48;

pub(crate) const MAX_TIMESTAMP: u64 = (1 << TIMESTAMP_BITS) - 1;

/// Value of the 52-bit prefix (version nibble `1000`, zero timestamp).
pub(crate) const INITIAL_VALUE: u64 = 0x8 << TIMESTAMP_BITS;

/// Returns the current Unix time in milliseconds.
pub(crate) fn unix_ts_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock may have gone backwards")
        .as_millis() as u64
}

/// A version-1 identifier: `[1000][48-bit unix_ts_ms][uniqueness field]`.
///
/// The uniqueness field is empty (52 bits in total) for identifiers created by
/// [`now`](Self::now) and [`from_date`](Self::from_date), and at least 8 bits wide (60 bits in
/// total) for those minted by a [`TimestampUidGenerator`](crate::TimestampUidGenerator).
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct TimestampUid(BigUint);

impl TimestampUid {
    /// Minimum string length accepted by [`parse`](Self::parse).
    pub const MIN_STR_LEN: usize = 9;

    /// Minimum byte length accepted by [`from_bytes`](Self::from_bytes).
    pub const MIN_BYTES_LEN: usize = 7;

    /// Returns an identifier for the current millisecond without a uniqueness field.
    ///
    /// Calls within the same millisecond return equal identifiers. The last value is cached
    /// process-wide and replaced whenever a call observes a new timestamp.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dwuid::TimestampUid;
    ///
    /// let uid = TimestampUid::now();
    /// assert!(uid.to_date() <= std::time::SystemTime::now());
    /// ```
    pub fn now() -> Self {
        static LAST: Mutex<Option<(u64, TimestampUid)>> = Mutex::new(None);

        let unix_ts_ms = unix_ts_ms();
        let mut last = LAST.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((ts, uid)) = &*last {
            if *ts == unix_ts_ms {
                return uid.clone();
            }
        }
        let uid = Self::from_timestamp(unix_ts_ms);
        *last = Some((unix_ts_ms, uid.clone()));
        uid
    }

    /// Creates an identifier from a point in time, truncated to milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimestamp`] for times before the Unix epoch or beyond the 48-bit
    /// millisecond range.
    pub fn from_date(date: SystemTime) -> Result<Self> {
        match date.duration_since(UNIX_EPOCH) {
            Ok(d) => match u64::try_from(d.as_millis()) {
                Ok(ms) => Self::from_unix_ts_ms(ms),
                Err(_) => Err(Error::InvalidTimestamp(d.as_millis() as i128)),
            },
            Err(e) => Err(Error::InvalidTimestamp(-(e.duration().as_millis() as i128))),
        }
    }

    /// Creates an identifier from a Unix timestamp in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimestamp`] if `unix_ts_ms` does not fit in 48 bits.
    pub fn from_unix_ts_ms(unix_ts_ms: u64) -> Result<Self> {
        if unix_ts_ms > MAX_TIMESTAMP {
            return Err(Error::InvalidTimestamp(unix_ts_ms as i128));
        }
        Ok(Self::from_timestamp(unix_ts_ms))
    }

    fn from_timestamp(unix_ts_ms: u64) -> Self {
        Self(BigUint::from(INITIAL_VALUE | unix_ts_ms))
    }

    /// Parses a string representation in the given encoding.
    ///
    /// # Errors
    ///
    /// Fails if the string is shorter than [`MIN_STR_LEN`](Self::MIN_STR_LEN), contains foreign
    /// characters, or does not decode to a version-1 value of 52 or at least 60 bits.
    pub fn parse(src: &str, encoding: Encoding) -> Result<Self> {
        Self::from_big_uint(decode_str(UidKind::Timestamp, src, encoding, Self::MIN_STR_LEN)?)
    }

    /// Parses a string representation, returning `None` on any failure.
    pub fn try_parse(src: &str, encoding: Encoding) -> Option<Self> {
        Self::parse(src, encoding).ok()
    }

    /// Creates an identifier from its integer value.
    pub fn from_big_uint(value: BigUint) -> Result<Self> {
        check_bit_length(UidKind::Timestamp, &value, is_timestamp_bit_length)?;
        Ok(Self(value))
    }

    /// Creates an identifier from its big-endian byte representation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_big_uint(decode_bytes(UidKind::Timestamp, bytes, Self::MIN_BYTES_LEN)?)
    }

    pub(crate) fn new_unchecked(value: BigUint) -> Self {
        Self(value)
    }

    /// Returns the embedded Unix timestamp in milliseconds.
    pub fn to_unix_ts_ms(&self) -> u64 {
        let shift = bit_length(&self.0) - u64::from(TIMESTAMP_BITS + 4);
        low_u64(&(&self.0 >> shift)) & MAX_TIMESTAMP
    }

    /// Returns the embedded timestamp as a point in time.
    pub fn to_date(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.to_unix_ts_ms())
    }
}

impl UidValue for TimestampUid {
    fn kind(&self) -> UidKind {
        UidKind::Timestamp
    }

    fn as_big_uint(&self) -> &BigUint {
        &self.0
    }
}

impl fmt::Display for TimestampUid {
    /// Writes the Base58 representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode(Encoding::Base58))
    }
}

impl str::FromStr for TimestampUid {
    type Err = Error;

    /// Parses the Base58 representation.
    fn from_str(src: &str) -> Result<Self> {
        Self::parse(src, Encoding::Base58)
    }
}

#[cfg(test)]
mod tests {
    use super::TimestampUid;
    use crate::{Encoding, Error, UidKind, UidValue};
    use num_bigint::BigUint;
    use std::time::{Duration, UNIX_EPOCH};

    /// Encodes and decodes prepared cases correctly
    #[test]
    fn encodes_and_decodes_prepared_cases_correctly() {
        let e = TimestampUid::from_unix_ts_ms(0x0123_4567_89ab).unwrap();
        assert_eq!(e.to_big_uint(), BigUint::from(0x8_0123_4567_89abu64));
        assert_eq!(e.as_big_uint().bits(), 52);
        assert_eq!(e.version(), 1);
        assert_eq!(e.to_string(), "JbQppBoGn");
        assert_eq!(e.encode(Encoding::Base64), "7-HC4Osaf");
        assert_eq!(e.to_bytes(), [8, 1, 35, 69, 103, 137, 171]);
        assert_eq!("JbQppBoGn".parse(), Ok(e.clone()));
        assert_eq!(TimestampUid::parse("7-HC4Osaf", Encoding::Base64), Ok(e.clone()));
        assert_eq!(TimestampUid::from_bytes(&e.to_bytes()), Ok(e.clone()));

        let long = TimestampUid::parse("4apKkmgGHGzQSfAg3Uw7x", Encoding::Base58).unwrap();
        assert_eq!(long.as_big_uint().bits(), 120);
        assert_eq!(long.to_unix_ts_ms(), 0x0123_4567_89ab);
        assert_eq!(long.to_date(), e.to_date());
    }

    /// Converts to and from dates
    #[test]
    fn converts_to_and_from_dates() {
        let date = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        let e = TimestampUid::from_date(date).unwrap();
        assert_eq!(e.to_unix_ts_ms(), 1_700_000_000_123);
        assert_eq!(e.to_date(), date);

        let truncated = TimestampUid::from_date(date + Duration::from_micros(999)).unwrap();
        assert_eq!(truncated, e);

        assert_eq!(TimestampUid::from_date(UNIX_EPOCH).unwrap().to_unix_ts_ms(), 0);
        assert_eq!(
            TimestampUid::from_date(UNIX_EPOCH - Duration::from_millis(5)),
            Err(Error::InvalidTimestamp(-5))
        );
        assert_eq!(
            TimestampUid::from_unix_ts_ms(1 << 48),
            Err(Error::InvalidTimestamp(1 << 48))
        );
    }

    /// Returns cached identifiers within the same millisecond
    #[test]
    fn returns_cached_identifiers_within_the_same_millisecond() {
        let mut prev = TimestampUid::now();
        for _ in 0..10_000 {
            let curr = TimestampUid::now();
            assert_eq!(curr.as_big_uint().bits(), 52);
            assert!(prev <= curr);
            if prev.to_unix_ts_ms() == curr.to_unix_ts_ms() {
                assert_eq!(prev, curr);
            }
            prev = curr;
        }
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        for _ in 0..1_000 {
            let ts_now = super::unix_ts_ms() as i64;
            let timestamp = TimestampUid::now().to_unix_ts_ms() as i64;
            assert!((ts_now - timestamp).abs() < 16);
        }
    }

    /// Rejects malformed and foreign identifiers
    #[test]
    fn rejects_malformed_and_foreign_identifiers() {
        assert_eq!(
            TimestampUid::parse("JbQppBoG", Encoding::Base58),
            Err(Error::InvalidLength {
                kind: UidKind::Timestamp,
                length: 8,
            })
        );
        assert_eq!(
            TimestampUid::from_bytes(&[8, 1, 35, 69, 103, 137]),
            Err(Error::InvalidLength {
                kind: UidKind::Timestamp,
                length: 6,
            })
        );
        assert_eq!(
            TimestampUid::from_big_uint(BigUint::from(0x8u64 << 54)),
            Err(Error::InvalidBitLength {
                kind: UidKind::Timestamp,
                bit_length: 58,
            })
        );
        assert_eq!(
            TimestampUid::parse("2kfu9QtsZiV", Encoding::Base58),
            Err(Error::VersionMismatch {
                kind: UidKind::Timestamp,
                version: 3,
            })
        );
        assert_eq!(
            TimestampUid::parse("52fTfCczxPe9Dp1Tt8K2e", Encoding::Base58),
            Err(Error::VersionMismatch {
                kind: UidKind::Timestamp,
                version: 2,
            })
        );
        assert_eq!(TimestampUid::try_parse("JbQppBoG+", Encoding::Base58), None);
        assert!(TimestampUid::try_parse("JbQppBoGn", Encoding::Base58).is_some());
    }
}
