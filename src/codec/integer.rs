//! Integer decoding for share values and moduli
//!
//! A token is tried against three encodings, first match wins:
//!
//! 1. Checksum-tagged: `bigintcs:` followed by dash-separated hex groups, the last
//!    group being a 6-digit checksum of the payload (e.g. `bigintcs:000002-c81e72`)
//! 2. Hexadecimal: `0x`, `0X` or `hex` followed by hex digits (e.g. `0xbeef`, `hexdeadbeef`)
//! 3. Decimal: optional sign followed by ASCII digits (e.g. `12345`, `-7`)
//!
//! # Examples
//!
//! ```rust
//! use num_bigint::BigInt;
//! use secshsrv::codec::{decode_integer, encode_checksummed};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let value = BigInt::from(48879);
//!
//! assert_eq!(decode_integer("48879")?, value);
//! assert_eq!(decode_integer("0xbeef")?, value);
//! assert_eq!(decode_integer("hexBEEF")?, value);
//!
//! let token = encode_checksummed(value.magnitude());
//! assert_eq!(token, "bigintcs:00beef-349029");
//! assert_eq!(decode_integer(&token)?, value);
//! # Ok(())
//! # }
//! ```

use md5::{Digest, Md5};
use num_bigint::{BigInt, BigUint, Sign};

use crate::error::ShareError;

/// Prefix that marks a checksum-tagged token
pub const CHECKSUM_PREFIX: &str = "bigintcs:";

/// Prefixes that mark a hexadecimal token
const HEX_PREFIXES: [&str; 3] = ["0x", "0X", "hex"];

/// Width of each dash-separated hex group, checksum included
const GROUP_WIDTH: usize = 6;

/// Decodes a token into an arbitrary-precision integer
///
/// # Errors
/// Returns [`ShareError::ChecksumMismatch`] if a checksum-tagged token does not match
/// its payload, and [`ShareError::NotANumber`] if the token fits no encoding
pub fn decode_integer(token: &str) -> Result<BigInt, ShareError> {
    if let Some(body) = token.strip_prefix(CHECKSUM_PREFIX) {
        return decode_checksummed(token, body);
    }

    if let Some(digits) = HEX_PREFIXES.iter().find_map(|p| token.strip_prefix(p)) {
        return parse_hex(token, digits).map(|v| BigInt::from_biguint(Sign::Plus, v));
    }

    decode_decimal(token)
}

/// Encodes a non-negative integer as a checksum-tagged token
///
/// The payload is left-padded with zeros to whole groups of six hex digits.
#[must_use]
pub fn encode_checksummed(value: &BigUint) -> String {
    let hex = value.to_str_radix(16);
    let padding = (GROUP_WIDTH - hex.len() % GROUP_WIDTH) % GROUP_WIDTH;
    let padded = format!("{}{hex}", "0".repeat(padding));
    let checksum = checksum_of(value);

    let mut groups: Vec<&str> = padded
        .as_bytes()
        .chunks(GROUP_WIDTH)
        // Safe: chunks of an ASCII hex string are valid UTF-8
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect();
    groups.push(&checksum);

    format!("{CHECKSUM_PREFIX}{}", groups.join("-"))
}

/// First six hex digits of the MD5 over the value's normalized hex form
fn checksum_of(value: &BigUint) -> String {
    let normalized = value.to_str_radix(16);
    Md5::digest(normalized.as_bytes())
        .iter()
        .take(GROUP_WIDTH / 2)
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn decode_checksummed(token: &str, body: &str) -> Result<BigInt, ShareError> {
    let Some((payload_groups, checksum)) = body.rsplit_once('-') else {
        return Err(ShareError::not_a_number(
            token,
            "checksum-tagged token has no checksum group",
        ));
    };

    if checksum.len() != GROUP_WIDTH || !checksum.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ShareError::not_a_number(
            token,
            format!("checksum group must be {GROUP_WIDTH} hex digits"),
        ));
    }

    let mut payload = String::with_capacity(payload_groups.len());
    for group in payload_groups.split('-') {
        if group.is_empty() {
            return Err(ShareError::not_a_number(token, "empty hex group"));
        }
        payload.push_str(group);
    }

    let value = parse_hex(token, &payload)?;
    let expected = checksum_of(&value);
    let actual = checksum.to_ascii_lowercase();

    if expected != actual {
        return Err(ShareError::ChecksumMismatch {
            token: token.to_string(),
            expected,
            actual,
        });
    }

    Ok(BigInt::from_biguint(Sign::Plus, value))
}

fn parse_hex(token: &str, digits: &str) -> Result<BigUint, ShareError> {
    if digits.is_empty() {
        return Err(ShareError::not_a_number(token, "no hex digits"));
    }
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ShareError::not_a_number(
            token,
            format!("'{bad}' is not a hex digit"),
        ));
    }

    BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| ShareError::not_a_number(token, "invalid hex payload"))
}

fn decode_decimal(token: &str) -> Result<BigInt, ShareError> {
    let (sign, digits) = match token.strip_prefix('-') {
        Some(rest) => (Sign::Minus, rest),
        None => (Sign::Plus, token.strip_prefix('+').unwrap_or(token)),
    };

    if digits.is_empty() {
        return Err(ShareError::not_a_number(token, "no digits"));
    }
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_digit()) {
        return Err(ShareError::not_a_number(
            token,
            format!("'{bad}' is not a decimal digit"),
        ));
    }

    let magnitude = BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| ShareError::not_a_number(token, "invalid decimal payload"))?;

    Ok(BigInt::from_biguint(sign, magnitude))
}
