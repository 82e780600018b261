//! Compact, sortable and self-describing unique identifiers
//!
//! ```rust
//! use dwuid::{Encoding, Uid, UidValue};
//!
//! let uid = Uid::timestamp();
//! println!("{}", uid); // e.g. "4apKkmgGHGzQSfAg3Uw7x"
//! println!("{}", uid.encode(Encoding::Base64)); // e.g. "7-HC4Osaf------KXUPz"
//! println!("{:?}", uid.to_bytes()); // as minimal big-endian bytes
//!
//! let parsed = Uid::parse(&uid.to_string(), Encoding::Base58)?;
//! assert_eq!(parsed, Uid::from(uid));
//! # Ok::<(), dwuid::Error>(())
//! ```
//!
//! # Field and bit layout
//!
//! Every identifier is a non-negative integer of variable width whose four most significant bits
//! hold a version nibble `1vvv`, where `vvv + 1` is the version. The remaining bits depend on the
//! version:
//!
//! ```text
//! version 1, timestamp (52 bits, or 60 bits and wider):
//! +--------+--------------------------------+--------------------------+
//! |  1000  |       unix_ts_ms (48 bits)     |    unique (0 or 8+ bits) |
//! +--------+--------------------------------+--------------------------+
//!
//! version 2, random (24 bits and wider):
//! +--------+-----------------------------------------------------------+
//! |  1001  |                     rand (20+ bits)                       |
//! +--------+-----------------------------------------------------------+
//!
//! version 3, geohash (exactly 60 bits):
//! +--------+-----------------------------------------------------------+
//! |  1010  |                   geohash (56 bits)                       |
//! +--------+-----------------------------------------------------------+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in milliseconds.
//! - The `unique` field is drawn uniformly at random whenever the timestamp changes and is
//!   incremented by one for each identifier generated within the same timestamp. When it reaches
//!   its maximum it wraps around to zero, and the next identifier is smaller than the previous one.
//! - The `geohash` field interleaves 28 longitude bits and 28 latitude bits, starting with
//!   longitude.
//!
//! Generators produce 120-bit identifiers by default, which render as 21 Base58 characters or 20
//! Base64 characters.
//!
//! # Encodings
//!
//! Identifiers render as Base58 by default, with the decoder accepting `I` and `l` for `1` and `0`
//! and `O` for `o`. The Base64 alphabet is ordered by ASCII code, so encoded timestamp identifiers
//! of equal width sort in creation order:
//!
//! ```rust
//! use dwuid::{Encoding, TimestampUidGenerator, UidValue};
//!
//! let mut g = TimestampUidGenerator::default();
//! let a = g.generate().encode(Encoding::Base64);
//! let b = g.generate().encode(Encoding::Base64);
//! assert!(a < b);
//! ```
//!
//! # Geohash identifiers
//!
//! ```rust
//! use dwuid::{GeohashUid, Location};
//!
//! let uid = GeohashUid::from_coordinates(51.5074, -0.1278)?;
//! let location = uid.to_location();
//! assert!((location.latitude() - 51.5074).abs() < 1e-4);
//! assert!(uid.to_bounding_box().contains(&Location::new(51.5074, -0.1278)?));
//! # Ok::<(), dwuid::Error>(())
//! ```
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen`: enables the process-wide default generators behind [`Uid::timestamp`] and
//!   [`Uid::random`].
//!
//! Optional features:
//!
//! - `serde`: enables serialization and deserialization of identifiers via serde, as Base58
//!   strings in human-readable formats and as bytes otherwise, and of [`GeneratorOptions`].

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod bits;

mod codec;
pub use codec::{Encoding, UnknownEncoding};

mod error;
pub use error::{Error, Result, UidKind};

mod geo;
pub use geo::{BoundingBox, Location};

pub mod geohash;
pub use geohash::GeohashUid;

mod id;
pub use id::{Uid, UidValue};

mod random;
pub use random::RandomUid;

mod timestamp;
pub use timestamp::TimestampUid;

pub mod generator;
pub use generator::{
    GeneratorOptions, RandomUidGenerator, TimestampUidGenerator, UidGenerator, UidRng,
};

mod global_gen;
