//! Pipe-delimited wire protocol
//!
//! A request is a single string with a fixed header layout:
//!
//! ```text
//! <n>|<k>|<modulus-or-empty>|<share_1>|<share_2>|...|<share_m>|
//! ```
//!
//! `n` comes first, `k` second, and the trailing `|` marks end-of-stream. Shares
//! take their x-coordinate from arrival order, starting at 1.

use num_bigint::BigInt;

use super::integer::decode_integer;
use crate::domain::{RequestDescriptor, ShareCount, ShareToken, Threshold};
use crate::error::ShareError;

/// Field delimiter of the wire protocol
pub const DELIMITER: char = '|';

/// Number of positional header fields before the first share
const HEADER_FIELDS: usize = 3;

/// A tokenized wire request: descriptor plus raw share tokens in arrival order
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub descriptor: RequestDescriptor,
    pub tokens: Vec<ShareToken>,
}

/// Splits a wire request into its descriptor and share tokens
///
/// Surrounding whitespace of the whole request is ignored; fields are taken verbatim.
///
/// # Errors
/// Returns [`ShareError::MalformedRequest`] if the header is incomplete or non-numeric,
/// the trailing delimiter is missing, a share token is empty, or there are more share
/// tokens than `n`. Modulus decoding errors propagate from the integer decoder.
///
/// # Examples
///
/// ```rust
/// use secshsrv::codec::tokenize;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let request = tokenize("3|2||10|0x14|30|")?;
/// assert_eq!(*request.descriptor.share_count(), 3);
/// assert_eq!(*request.descriptor.threshold(), 2);
/// assert!(request.descriptor.modulus().is_none());
///
/// let tokens: Vec<_> = request.tokens.iter().map(|t| t.as_str()).collect();
/// assert_eq!(tokens, ["10", "0x14", "30"]);
/// # Ok(())
/// # }
/// ```
pub fn tokenize(input: &str) -> Result<WireRequest, ShareError> {
    let input = input.trim();

    let Some(body) = input.strip_suffix(DELIMITER) else {
        return Err(ShareError::malformed(
            "request must end with the '|' end-of-stream delimiter",
        ));
    };

    let fields: Vec<&str> = body.split(DELIMITER).collect();
    if fields.len() < HEADER_FIELDS {
        return Err(ShareError::malformed(format!(
            "expected {HEADER_FIELDS} header fields (n|k|modulus|), found {}",
            fields.len()
        )));
    }

    let share_count = ShareCount::new(parse_header_count("n", fields[0])?)?;
    let threshold = Threshold::new(parse_header_count("k", fields[1])?)?;
    let modulus = parse_modulus(fields[2])?;
    let descriptor = RequestDescriptor::new(share_count, threshold, modulus)?;

    let share_fields = &fields[HEADER_FIELDS..];
    if share_fields.len() > *share_count as usize {
        return Err(ShareError::malformed(format!(
            "request carries {} shares but n={}",
            share_fields.len(),
            *share_count
        )));
    }

    let mut tokens = Vec::with_capacity(share_fields.len());
    for (position, field) in (1..=*share_count).zip(share_fields) {
        if field.is_empty() {
            return Err(ShareError::malformed(format!(
                "share #{position} is empty"
            )));
        }
        tokens.push(ShareToken::new(position, field));
    }

    Ok(WireRequest { descriptor, tokens })
}

/// Parses `n` or `k` as a base-10 count
pub(crate) fn parse_header_count(name: &str, field: &str) -> Result<u32, ShareError> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ShareError::malformed(format!(
            "header field {name} must be a decimal integer (got '{field}')"
        )));
    }
    field
        .parse()
        .map_err(|_| ShareError::malformed(format!("header field {name} is out of range ('{field}')")))
}

fn parse_modulus(field: &str) -> Result<Option<BigInt>, ShareError> {
    if field.is_empty() {
        return Ok(None);
    }
    decode_integer(field).map(Some)
}
