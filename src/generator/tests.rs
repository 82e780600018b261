use super::*;
use crate::{Encoding, UidValue};
use rand::rngs::mock::StepRng;

/// Returns a random number generator that always yields set bits.
fn saturated_rng() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

/// Returns a random number generator that always yields cleared bits.
fn zero_rng() -> StepRng {
    StepRng::new(0, 0)
}

const TS: u64 = 0x0123_4567_89ab;

/// Rejects bit widths below the minimum at construction
#[test]
fn rejects_bit_widths_below_the_minimum_at_construction() {
    for bits in [0, 24, 52, 59] {
        assert_eq!(
            TimestampUidGenerator::new(GeneratorOptions::default().with_bits(bits)).err(),
            Some(Error::InvalidConfiguration {
                kind: UidKind::Timestamp,
                bits,
                min: 60,
            })
        );
    }
    for bits in [0, 4, 23] {
        assert_eq!(
            RandomUidGenerator::new(GeneratorOptions::default().with_bits(bits)).err(),
            Some(Error::InvalidConfiguration {
                kind: UidKind::Random,
                bits,
                min: 24,
            })
        );
    }
    assert!(TimestampUidGenerator::with_rng(Some(60), zero_rng()).is_ok());
    assert!(RandomUidGenerator::with_rng(Some(24), zero_rng()).is_ok());
}

/// Generates identifiers of the configured width and version
#[test]
fn generates_identifiers_of_the_configured_width_and_version() {
    for secure_random in [false, true] {
        for bits in [60, 64, 96, 120, 256] {
            let options = GeneratorOptions::default()
                .with_bits(bits)
                .with_secure_random(secure_random);
            let mut g = TimestampUidGenerator::new(options).unwrap();
            assert_eq!(g.unique_bits(), bits - 52);
            for e in g.by_ref().take(100) {
                assert_eq!(e.as_big_uint().bits(), bits as u64);
                assert_eq!(e.version(), 1);
            }
        }
        for bits in [24, 32, 64, 120, 256] {
            let options = GeneratorOptions::default()
                .with_bits(bits)
                .with_secure_random(secure_random);
            let mut g = RandomUidGenerator::new(options).unwrap();
            assert_eq!(g.random_bits(), bits - 4);
            for e in g.by_ref().take(100) {
                assert_eq!(e.as_big_uint().bits(), bits as u64);
                assert_eq!(e.version(), 2);
            }
        }
    }

    let e = TimestampUidGenerator::default().generate();
    assert_eq!(e.as_big_uint().bits(), 120);
    let e = RandomUidGenerator::default().generate();
    assert_eq!(e.as_big_uint().bits(), 120);
}

/// Increments uniqueness field by one within the same timestamp
#[test]
fn increments_uniqueness_field_by_one_within_the_same_timestamp() {
    let mut g = TimestampUidGenerator::with_rng(None, rand::thread_rng()).unwrap();
    let mut prev = g.generate_core(TS);
    assert_eq!(prev.to_unix_ts_ms(), TS);
    for _ in 0..10_000 {
        let curr = g.generate_core(TS);
        let expected = prev.to_big_uint() + 1u8;
        // the 68-bit field wraps around only at its maximum
        if expected.bits() == 120 && curr.to_unix_ts_ms() == TS {
            assert_eq!(curr.to_big_uint(), expected);
        }
        prev = curr;
    }
}

/// Wraps uniqueness field around to zero at its maximum
#[test]
fn wraps_uniqueness_field_around_to_zero_at_its_maximum() {
    let mut g = TimestampUidGenerator::with_rng(Some(60), saturated_rng()).unwrap();
    let first = g.generate_core(TS);
    let prefix = (BigUint::from(0x8u8) << 56u32) + (BigUint::from(TS) << 8u32);
    assert_eq!(first.to_big_uint(), &prefix + 0xffu8);

    let second = g.generate_core(TS);
    assert_eq!(second.to_big_uint(), prefix);
    assert!(second < first);
    assert_eq!(second.to_unix_ts_ms(), TS);

    let third = g.generate_core(TS);
    assert_eq!(third.to_big_uint(), &prefix + 1u8);
}

/// Generates increasing identifiers across increasing timestamps
#[test]
fn generates_increasing_identifiers_across_increasing_timestamps() {
    // a saturated field followed by a zero field is the worst case
    let mut g = TimestampUidGenerator::with_rng(Some(60), saturated_rng()).unwrap();
    let high = g.generate_core(TS);
    let mut g = TimestampUidGenerator::with_rng(Some(60), zero_rng()).unwrap();
    let low = g.generate_core(TS + 1);
    assert!(high < low);

    let mut g = TimestampUidGenerator::default();
    let mut prev = g.generate_core(TS);
    for i in 1..10_000u64 {
        let curr = g.generate_core(TS + i / 8);
        if curr.to_unix_ts_ms() > prev.to_unix_ts_ms() {
            assert!(prev < curr);
        }
        prev = curr;
    }
}

/// Starts a new random uniqueness field when the timestamp changes
#[test]
fn starts_a_new_random_uniqueness_field_when_the_timestamp_changes() {
    let mut g = TimestampUidGenerator::with_rng(Some(60), zero_rng()).unwrap();
    let a = g.generate_core(TS);
    let b = g.generate_core(TS);
    let c = g.generate_core(TS - 1);
    let d = g.generate_core(TS);
    assert_eq!(b.to_big_uint(), a.to_big_uint() + 1u8);
    assert_eq!(c.to_unix_ts_ms(), TS - 1);
    assert_eq!(d, a);
}

/// Encodes up-to-date timestamp
#[test]
fn encodes_up_to_date_timestamp() {
    let mut g = TimestampUidGenerator::default();
    for _ in 0..10_000 {
        let ts_now = crate::timestamp::unix_ts_ms() as i64;
        let timestamp = g.generate().to_unix_ts_ms() as i64;
        assert!((ts_now - timestamp).abs() < 16);
    }
}

/// Generates sortable identifiers within the same generator
#[test]
fn generates_sortable_identifiers_within_the_same_generator() {
    let samples: Vec<_> = TimestampUidGenerator::default().take(100_000).collect();
    for i in 1..samples.len() {
        // equal timestamps may wrap only at the field maximum, which is 1 in 2^68 per draw
        assert!(samples[i - 1] < samples[i]);
        assert!(samples[i - 1].encode(Encoding::Base64) < samples[i].encode(Encoding::Base64));
    }
}

/// Sets constant bits and random bits properly
#[test]
fn sets_constant_bits_and_random_bits_properly() {
    const N_SAMPLES: usize = 100_000;

    // count '1' of each bit
    let mut bins = [0u32; 120];
    let mut g = RandomUidGenerator::new(GeneratorOptions::default().with_secure_random(true))
        .unwrap();
    for e in g.by_ref().take(N_SAMPLES) {
        let value = e.as_big_uint();
        for (i, bin) in bins.iter_mut().enumerate() {
            *bin += value.bit(i as u64) as u32;
        }
    }

    // test if constant bits are all set to 1 or 0
    let n = N_SAMPLES as u32;
    assert_eq!(bins[119], n, "version bit 119");
    assert_eq!(bins[118], 0, "version bit 118");
    assert_eq!(bins[117], 0, "version bit 117");
    assert_eq!(bins[116], n, "version bit 116");

    // test if random bits are set to 1 at ~50% probability
    // set margin based on binom dist 99.999% confidence interval
    let margin = 4.417173 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
    for (i, &bin) in bins.iter().enumerate().take(116) {
        let p = bin as f64 / N_SAMPLES as f64;
        assert!((p - 0.5).abs() < margin, "random bit {}: {}", i, p);
    }
}

/// Round-trips generated identifiers of various widths through strings and bytes
#[test]
fn round_trips_generated_identifiers_of_various_widths_through_strings_and_bytes() {
    fn assert_round_trip<T>(e: T, parse: fn(&str, Encoding) -> crate::Result<T>)
    where
        T: UidValue + Clone + PartialEq + std::fmt::Debug + Into<Uid>,
    {
        for encoding in [Encoding::Base58, Encoding::Base64] {
            let text = e.encode(encoding);
            assert_eq!(parse(&text, encoding), Ok(e.clone()));
            assert_eq!(Uid::parse(&text, encoding), Ok(e.clone().into()));
        }
        assert_eq!(Uid::from_bytes(&e.to_bytes()), Ok(e.clone().into()));
        assert_eq!(Uid::from_big_uint(e.to_big_uint()), Ok(e.into()));
    }

    for bits in [60, 61, 63, 64, 65, 100, 120, 200] {
        let mut g = TimestampUidGenerator::new(GeneratorOptions::default().with_bits(bits)).unwrap();
        for e in g.by_ref().take(2_000) {
            assert_eq!(TimestampUid::from_bytes(&e.to_bytes()), Ok(e.clone()));
            assert_round_trip(e, TimestampUid::parse);
        }
    }
    for bits in [24, 25, 31, 32, 33, 120] {
        let mut g = RandomUidGenerator::new(GeneratorOptions::default().with_bits(bits)).unwrap();
        for e in g.by_ref().take(2_000) {
            assert_eq!(RandomUid::from_bytes(&e.to_bytes()), Ok(e.clone()));
            assert_round_trip(e, RandomUid::parse);
        }
    }
}

/// Generates 100k random identifiers without collision
#[test]
fn generates_100k_random_identifiers_without_collision() {
    use std::collections::HashSet;
    const N_SAMPLES: usize = 100_000;
    let s: HashSet<String> = RandomUidGenerator::default()
        .take(N_SAMPLES)
        .map(|e| e.to_string())
        .collect();
    assert_eq!(s.len(), N_SAMPLES);
}

/// Generates canonical base58 strings
#[test]
fn generates_canonical_base58_strings() {
    let re = regex::Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{21}$").unwrap();
    let mut tg = TimestampUidGenerator::default();
    let mut rg = RandomUidGenerator::default();
    for _ in 0..10_000 {
        assert!(re.is_match(&tg.generate().to_string()));
        assert!(re.is_match(&rg.generate().to_string()));
    }
}

/// Produces identifiers through the common generator interface
#[test]
fn produces_identifiers_through_the_common_generator_interface() {
    fn mint<G: UidGenerator>(g: &mut G) -> Uid {
        g.generate().into()
    }

    let mut tg = TimestampUidGenerator::default();
    let mut rg = RandomUidGenerator::default();
    assert_eq!(mint(&mut tg).kind(), UidKind::Timestamp);
    assert_eq!(mint(&mut rg).kind(), UidKind::Random);
}

/// Generates no duplicates from a generator shared under multithreading
#[test]
fn generates_no_duplicates_from_a_generator_shared_under_multithreading() {
    use std::{collections::HashSet, sync, thread};

    let g = sync::Arc::new(sync::Mutex::new(TimestampUidGenerator::default()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let g = sync::Arc::clone(&g);
            thread::spawn(move || {
                (0..10_000)
                    .map(|_| g.lock().unwrap().generate())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut s = HashSet::new();
    for h in handles {
        s.extend(h.join().unwrap());
    }
    assert_eq!(s.len(), 4 * 10_000);
}

#[cfg(feature = "serde")]
mod serde_options {
    use super::GeneratorOptions;
    use serde_test::{assert_de_tokens, assert_de_tokens_error, Token};

    /// Deserializes options with camel-case keys
    #[test]
    fn deserializes_options_with_camel_case_keys() {
        assert_de_tokens(
            &GeneratorOptions::default().with_bits(96).with_secure_random(true),
            &[
                Token::Struct {
                    name: "GeneratorOptions",
                    len: 2,
                },
                Token::Str("bits"),
                Token::Some,
                Token::U32(96),
                Token::Str("secureRandom"),
                Token::Bool(true),
                Token::StructEnd,
            ],
        );
        assert_de_tokens(
            &GeneratorOptions::default(),
            &[
                Token::Struct {
                    name: "GeneratorOptions",
                    len: 0,
                },
                Token::StructEnd,
            ],
        );
    }

    /// Rejects non-integer bit widths
    #[test]
    fn rejects_non_integer_bit_widths() {
        assert_de_tokens_error::<GeneratorOptions>(
            &[
                Token::Struct {
                    name: "GeneratorOptions",
                    len: 1,
                },
                Token::Str("bits"),
                Token::Some,
                Token::F64(96.5),
            ],
            "invalid type: floating point `96.5`, expected u32",
        );
    }
}
