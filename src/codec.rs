//! Base58 and Base64 string codecs for arbitrary-precision integers.
//!
//! Both codecs write digits most-significant first without padding, so zero encodes to the empty
//! string. The Base64 alphabet is not RFC 4648: it is ordered by ASCII code so that encoded strings
//! of equal length sort like the integers they represent.

use std::{fmt, str};

use num_bigint::BigUint;
use num_traits::Zero;

use crate::{Error, Result};

const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const BASE64_ALPHABET: &[u8; 64] =
    b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

/// Visually ambiguous glyphs accepted by the Base58 decoder, as `(alias, canonical)` pairs.
const BASE58_ALIASES: &[(u8, u8)] = &[(b'I', b'1'), (b'l', b'1'), (b'0', b'o'), (b'O', b'o')];

const INVALID: u8 = 0xff;

static BASE58_DECODING: [u8; 128] = decoding_table(BASE58_ALPHABET, BASE58_ALIASES);
static BASE64_DECODING: [u8; 128] = decoding_table(BASE64_ALPHABET, &[]);

/// Builds an ASCII lookup table from characters to digit values.
const fn decoding_table(alphabet: &[u8], aliases: &[(u8, u8)]) -> [u8; 128] {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < alphabet.len() {
        table[alphabet[i] as usize] = i as u8;
        i += 1;
    }
    let mut i = 0;
    while i < aliases.len() {
        let (alias, canonical) = aliases[i];
        table[alias as usize] = table[canonical as usize];
        i += 1;
    }
    table
}

/// String encodings available for identifiers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Encoding {
    /// Bitcoin-style Base58; decoding accepts `I`/`l` for `1` and `0`/`O` for `o`.
    #[default]
    Base58,
    /// URL-safe, sort-preserving Base64 variant (`-0-9A-Z_a-z`).
    Base64,
}

impl Encoding {
    const fn alphabet(self) -> &'static [u8] {
        match self {
            Self::Base58 => BASE58_ALPHABET,
            Self::Base64 => BASE64_ALPHABET,
        }
    }

    fn decoding_table(self) -> &'static [u8; 128] {
        match self {
            Self::Base58 => &BASE58_DECODING,
            Self::Base64 => &BASE64_DECODING,
        }
    }

    /// Returns the number of distinct digits.
    pub const fn radix(self) -> u32 {
        self.alphabet().len() as u32
    }

    /// Returns the digit value of `c`, including aliases.
    fn digit(self, c: char) -> Option<u8> {
        let table = self.decoding_table();
        table
            .get(c as usize)
            .copied()
            .filter(|&digit| digit != INVALID)
    }

    /// Encodes a non-negative integer, most significant digit first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dwuid::Encoding;
    /// use num_bigint::BigUint;
    ///
    /// assert_eq!(Encoding::Base58.encode(&BigUint::from(57u8)), "z");
    /// assert_eq!(Encoding::Base64.encode(&BigUint::from(64u8)), "0-");
    /// assert_eq!(Encoding::Base58.encode(&BigUint::from(0u8)), "");
    /// ```
    pub fn encode(self, value: &BigUint) -> String {
        if value.is_zero() {
            return String::new();
        }
        let alphabet = self.alphabet();
        value
            .to_radix_be(self.radix())
            .into_iter()
            .map(|digit| alphabet[digit as usize] as char)
            .collect()
    }

    /// Decodes a string produced by [`encode`](Self::encode).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCharacter`] naming the index of the first character that is neither
    /// in the alphabet nor an accepted alias.
    pub fn decode(self, src: &str) -> Result<BigUint> {
        let radix = self.radix();
        src.chars()
            .enumerate()
            .try_fold(BigUint::zero(), |acc, (index, c)| -> Result<BigUint> {
                let digit = self.digit(c).ok_or_else(|| Error::InvalidCharacter {
                    encoding: self,
                    index,
                    input: src.to_owned(),
                })?;
                Ok(acc * radix + digit)
            })
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Base58 => "base58",
            Self::Base64 => "base64",
        })
    }
}

/// Error parsing an unknown encoding name.
#[derive(Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
#[error("unknown encoding: {0}")]
pub struct UnknownEncoding(String);

impl str::FromStr for Encoding {
    type Err = UnknownEncoding;

    /// Accepts `base58` or `base64`, ignoring ASCII case.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        if src.eq_ignore_ascii_case("base58") {
            Ok(Self::Base58)
        } else if src.eq_ignore_ascii_case("base64") {
            Ok(Self::Base64)
        } else {
            Err(UnknownEncoding(src.to_owned()))
        }
    }
}
