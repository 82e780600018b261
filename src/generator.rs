//! Generators for timestamp and random identifiers.

use num_bigint::BigUint;
use num_traits::Zero;
use rand::rngs::adapter::ReseedingRng;
use rand::rngs::{OsRng, SmallRng};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha12Core;
use tracing::debug;

use crate::bits::random_bits;
use crate::timestamp::{unix_ts_ms, MAX_TIMESTAMP, TIMESTAMP_BITS};
use crate::{Error, RandomUid, Result, TimestampUid, Uid, UidKind};

#[cfg(test)]
mod tests;

/// Default total width of generated identifiers.
pub const DEFAULT_BITS: u32 = 120;

/// Minimum total width of identifiers minted by a [`TimestampUidGenerator`].
pub const TIMESTAMP_MIN_BITS: u32 = 60;

/// Minimum total width of identifiers minted by a [`RandomUidGenerator`].
pub const RANDOM_MIN_BITS: u32 = 24;

/// Configuration accepted by [`TimestampUidGenerator::new`] and [`RandomUidGenerator::new`].
///
/// With the `serde` feature, options deserialize from `{"bits": 96, "secureRandom": true}`; a
/// non-integer `bits` is rejected by the deserializer and an out-of-range one by the generator
/// constructor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct GeneratorOptions {
    /// Total width of generated identifiers, version nibble included. Defaults to
    /// [`DEFAULT_BITS`].
    pub bits: Option<u32>,

    /// Selects the cryptographically secure random source instead of the statistical one.
    pub secure_random: bool,
}

impl GeneratorOptions {
    /// Sets the total width of generated identifiers.
    pub const fn with_bits(mut self, bits: u32) -> Self {
        self.bits = Some(bits);
        self
    }

    /// Selects the cryptographically secure random source.
    pub const fn with_secure_random(mut self, secure_random: bool) -> Self {
        self.secure_random = secure_random;
        self
    }

    /// Returns the configured width after checking it is at least `min`.
    fn checked_bits(bits: Option<u32>, kind: UidKind, min: u32) -> Result<u32> {
        match bits.unwrap_or(DEFAULT_BITS) {
            bits if bits < min => Err(Error::InvalidConfiguration { kind, bits, min }),
            bits => Ok(bits),
        }
    }
}

/// The random number generator selected by [`GeneratorOptions::secure_random`].
///
/// The secure source employs [`ChaCha12Core`] with [`ReseedingRng`] wrapper seeded from the
/// operating system; the statistical source is a [`SmallRng`] seeded once from entropy.
#[derive(Clone, Debug)]
pub enum UidRng {
    /// Fast, non-cryptographic source.
    Statistical(SmallRng),
    /// Cryptographically secure source.
    Secure(ReseedingRng<ChaCha12Core, OsRng>),
}

impl UidRng {
    /// Creates a freshly seeded random number generator of the requested strength.
    pub fn new(secure_random: bool) -> Self {
        if secure_random {
            Self::Secure(ReseedingRng::new(
                ChaCha12Core::from_entropy(),
                1024 * 64,
                OsRng,
            ))
        } else {
            Self::Statistical(SmallRng::from_entropy())
        }
    }
}

impl RngCore for UidRng {
    fn next_u32(&mut self) -> u32 {
        match self {
            Self::Statistical(rng) => rng.next_u32(),
            Self::Secure(rng) => rng.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self {
            Self::Statistical(rng) => rng.next_u64(),
            Self::Secure(rng) => rng.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match self {
            Self::Statistical(rng) => rng.fill_bytes(dest),
            Self::Secure(rng) => rng.fill_bytes(dest),
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        match self {
            Self::Statistical(rng) => rng.try_fill_bytes(dest),
            Self::Secure(rng) => rng.try_fill_bytes(dest),
        }
    }
}

/// The interface common to identifier generators.
pub trait UidGenerator {
    /// The kind of identifier produced.
    type Output: Into<Uid>;

    /// Generates a new identifier.
    fn generate(&mut self) -> Self::Output;
}

/// Represents a timestamp identifier generator that encapsulates a uniqueness field and guarantees
/// the monotonic order of identifiers generated within the same millisecond.
///
/// Whenever the clock reading changes, the generator draws a fresh uniformly random uniqueness
/// field; otherwise it increments the previous one. Values therefore increase by exactly one
/// within a millisecond, except when the field is at its maximum, where it wraps to zero and the
/// next identifier is smaller than the previous one.
///
/// The generator keeps its state in the instance. Share one across threads by wrapping it in a
/// mutex, which makes each [`generate`](Self::generate) call a critical section:
///
/// ```rust
/// use std::{sync, thread};
/// use dwuid::TimestampUidGenerator;
///
/// let g = sync::Arc::new(sync::Mutex::new(TimestampUidGenerator::default()));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.lock().unwrap().generate(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
#[derive(Clone, Debug)]
pub struct TimestampUidGenerator<R = UidRng> {
    unique_bits: u32,
    /// Version nibble shifted above the timestamp and uniqueness fields.
    base: BigUint,
    max_unique: BigUint,

    last_timestamp: Option<u64>,
    prefix: BigUint,
    unique: BigUint,

    /// The random number generator used by the generator.
    rng: R,
}

impl TimestampUidGenerator<UidRng> {
    /// Creates a generator from `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `options.bits` is less than
    /// [`TIMESTAMP_MIN_BITS`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dwuid::{GeneratorOptions, TimestampUidGenerator, UidValue};
    ///
    /// let options = GeneratorOptions::default().with_bits(96).with_secure_random(true);
    /// let mut g = TimestampUidGenerator::new(options)?;
    /// assert_eq!(g.generate().as_big_uint().bits(), 96);
    /// assert!(TimestampUidGenerator::new(options.with_bits(59)).is_err());
    /// # Ok::<(), dwuid::Error>(())
    /// ```
    pub fn new(options: GeneratorOptions) -> Result<Self> {
        Self::with_rng(options.bits, UidRng::new(options.secure_random))
    }
}

impl Default for TimestampUidGenerator<UidRng> {
    /// Creates a 120-bit generator with the statistical random source.
    fn default() -> Self {
        Self::from_parts(DEFAULT_BITS, UidRng::new(false))
    }
}

impl<R: RngCore> TimestampUidGenerator<R> {
    /// Creates a generator of identifiers `bits` wide (120 if `None`) drawing uniqueness fields
    /// from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `bits` is less than 60.
    pub fn with_rng(bits: Option<u32>, rng: R) -> Result<Self> {
        let bits = GeneratorOptions::checked_bits(bits, UidKind::Timestamp, TIMESTAMP_MIN_BITS)?;
        Ok(Self::from_parts(bits, rng))
    }

    fn from_parts(bits: u32, rng: R) -> Self {
        let unique_bits = bits - TIMESTAMP_BITS - 4;
        debug!(kind = %UidKind::Timestamp, bits, unique_bits, "created generator");
        Self {
            unique_bits,
            base: BigUint::from(0x8u8) << (TIMESTAMP_BITS + unique_bits),
            max_unique: (BigUint::from(1u8) << unique_bits) - 1u8,
            last_timestamp: None,
            prefix: BigUint::zero(),
            unique: BigUint::zero(),
            rng,
        }
    }

    /// Returns the width of the uniqueness field.
    pub const fn unique_bits(&self) -> u32 {
        self.unique_bits
    }

    /// Generates a new identifier from the current timestamp.
    pub fn generate(&mut self) -> TimestampUid {
        self.generate_core(unix_ts_ms())
    }

    /// Generates a new identifier from the `unix_ts_ms` passed.
    ///
    /// A timestamp different from the previous call's starts a new random uniqueness field, even
    /// if it is smaller; the generator does not guard against clock rollbacks.
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms` is not a 48-bit integer.
    pub fn generate_core(&mut self, unix_ts_ms: u64) -> TimestampUid {
        assert!(
            unix_ts_ms <= MAX_TIMESTAMP,
            "`unix_ts_ms` must be a 48-bit integer"
        );

        if self.last_timestamp != Some(unix_ts_ms) {
            self.last_timestamp = Some(unix_ts_ms);
            self.prefix = &self.base + (BigUint::from(unix_ts_ms) << self.unique_bits);
            self.unique = random_bits(&mut self.rng, self.unique_bits);
        } else {
            self.unique += 1u8;
            if self.unique > self.max_unique {
                // wrap around within the same timestamp
                debug!(unix_ts_ms, "uniqueness field wrapped around");
                self.unique.set_zero();
            }
        }

        TimestampUid::new_unchecked(&self.prefix + &self.unique)
    }
}

impl<R: RngCore> UidGenerator for TimestampUidGenerator<R> {
    type Output = TimestampUid;

    fn generate(&mut self) -> Self::Output {
        TimestampUidGenerator::generate(self)
    }
}

/// Supports operations as an infinite iterator that produces a new identifier for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use dwuid::TimestampUidGenerator;
///
/// TimestampUidGenerator::default()
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e));
/// ```
impl<R: RngCore> Iterator for TimestampUidGenerator<R> {
    type Item = TimestampUid;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RngCore> std::iter::FusedIterator for TimestampUidGenerator<R> {}

/// Represents a random identifier generator.
///
/// Each identifier is the version-2 prefix followed by a fresh uniformly random field; the
/// generator holds no state besides its random number generator.
#[derive(Clone, Debug)]
pub struct RandomUidGenerator<R = UidRng> {
    random_bits: u32,
    base: BigUint,

    /// The random number generator used by the generator.
    rng: R,
}

impl RandomUidGenerator<UidRng> {
    /// Creates a generator from `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `options.bits` is less than
    /// [`RANDOM_MIN_BITS`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dwuid::{Encoding, GeneratorOptions, RandomUidGenerator, UidValue};
    ///
    /// let mut g = RandomUidGenerator::new(GeneratorOptions::default().with_bits(64))?;
    /// let uid = g.generate();
    /// assert_eq!(uid.version(), 2);
    /// println!("{}", uid.encode(Encoding::Base64));
    /// # Ok::<(), dwuid::Error>(())
    /// ```
    pub fn new(options: GeneratorOptions) -> Result<Self> {
        Self::with_rng(options.bits, UidRng::new(options.secure_random))
    }
}

impl Default for RandomUidGenerator<UidRng> {
    /// Creates a 120-bit generator with the statistical random source.
    fn default() -> Self {
        Self::from_parts(DEFAULT_BITS, UidRng::new(false))
    }
}

impl<R: RngCore> RandomUidGenerator<R> {
    /// Creates a generator of identifiers `bits` wide (120 if `None`) drawing from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `bits` is less than 24.
    pub fn with_rng(bits: Option<u32>, rng: R) -> Result<Self> {
        let bits = GeneratorOptions::checked_bits(bits, UidKind::Random, RANDOM_MIN_BITS)?;
        Ok(Self::from_parts(bits, rng))
    }

    fn from_parts(bits: u32, rng: R) -> Self {
        let random_bits = bits - 4;
        debug!(kind = %UidKind::Random, bits, random_bits, "created generator");
        Self {
            random_bits,
            base: BigUint::from(0x9u8) << random_bits,
            rng,
        }
    }

    /// Returns the width of the random field.
    pub const fn random_bits(&self) -> u32 {
        self.random_bits
    }

    /// Generates a new identifier.
    pub fn generate(&mut self) -> RandomUid {
        RandomUid::new_unchecked(&self.base + random_bits(&mut self.rng, self.random_bits))
    }
}

impl<R: RngCore> UidGenerator for RandomUidGenerator<R> {
    type Output = RandomUid;

    fn generate(&mut self) -> Self::Output {
        RandomUidGenerator::generate(self)
    }
}

/// Supports operations as an infinite iterator that produces a new identifier for each call of
/// `next()`.
impl<R: RngCore> Iterator for RandomUidGenerator<R> {
    type Item = RandomUid;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RngCore> std::iter::FusedIterator for RandomUidGenerator<R> {}
