//! Property tests for integer tokens and the wire tokenizer

use num_bigint::{BigInt, BigUint, Sign};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use secshsrv::codec::{decode_integer, encode_checksummed, tokenize};

/// Non-empty list of share values small enough to print in any encoding
#[derive(Clone, Debug)]
struct ShareValues(Vec<u64>);

impl Arbitrary for ShareValues {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = (usize::arbitrary(g) % 12) + 1; // 1..=12
        ShareValues((0..len).map(|_| u64::arbitrary(g)).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(
            self.0
                .shrink()
                .filter(|v| !v.is_empty())
                .map(ShareValues),
        )
    }
}

/// The same value decodes identically whichever encoding carries it
#[quickcheck]
fn prop_encodings_agree(value: u64) -> bool {
    let expected = BigInt::from(value);
    let checksummed = encode_checksummed(&BigUint::from(value));

    [
        value.to_string(),
        format!("0x{value:x}"),
        format!("0X{value:X}"),
        format!("hex{value:x}"),
        checksummed,
    ]
    .iter()
    .all(|token| decode_integer(token).ok() == Some(expected.clone()))
}

/// Checksummed tokens carry arbitrarily wide values
#[quickcheck]
fn prop_checksummed_wide_values(bytes: Vec<u8>) -> bool {
    let value = BigUint::from_bytes_be(&bytes);
    let token = encode_checksummed(&value);

    decode_integer(&token).ok() == Some(BigInt::from_biguint(Sign::Plus, value))
}

/// Flipping the value part of a checksummed token is always caught
#[quickcheck]
fn prop_checksum_detects_altered_value(value: u32) -> bool {
    let token = encode_checksummed(&BigUint::from(value));
    let altered = encode_checksummed(&BigUint::from(value ^ 1));

    // Splice the altered value groups onto the original checksum
    let (altered_groups, _) = altered.rsplit_once('-').unwrap();
    let (_, checksum) = token.rsplit_once('-').unwrap();
    let forged = format!("{altered_groups}-{checksum}");

    decode_integer(&forged).is_err()
}

/// Decimal sign is honoured
#[quickcheck]
fn prop_signed_decimal(value: i64) -> bool {
    decode_integer(&value.to_string()).ok() == Some(BigInt::from(value))
}

/// Tokenizing returns share tokens verbatim, indexed by arrival order
#[quickcheck]
fn prop_tokenize_preserves_tokens(values: ShareValues) -> bool {
    let ShareValues(values) = values;
    let tokens: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, v)| match i % 3 {
            0 => v.to_string(),
            1 => format!("0x{v:x}"),
            _ => encode_checksummed(&BigUint::from(*v)),
        })
        .collect();

    let request = format!("{}|1||{}|", values.len(), tokens.join("|"));
    let Ok(parsed) = tokenize(&request) else {
        return false;
    };

    parsed.tokens.len() == tokens.len()
        && parsed
            .tokens
            .iter()
            .zip(&tokens)
            .enumerate()
            .all(|(i, (token, raw))| token.as_str() == raw.as_str() && token.index() as usize == i + 1)
}

/// A request with more shares than it declares is never accepted
#[quickcheck]
fn prop_tokenize_rejects_surplus_shares(values: ShareValues) -> bool {
    let ShareValues(values) = values;
    let declared = values.len().saturating_sub(1);
    if declared == 0 {
        return true;
    }

    let body: Vec<String> = values.iter().map(u64::to_string).collect();
    let request = format!("{declared}|1||{}|", body.join("|"));

    tokenize(&request).is_err()
}
