//! Line-oriented `field = value` protocol
//!
//! Four line shapes are recognized, in any order and any number of times:
//!
//! ```text
//! n = <int>
//! k = <int>
//! modulus = <int-token>
//! Share (x:<int>) = <int-token>
//! ```
//!
//! Everything else is ignored. Header lines are last-write-wins. Each share is
//! validated as soon as its line is read and remembers the header values in force
//! at that moment, so a later header change can be detected at combine time.

use std::rc::Rc;

use num_bigint::BigInt;
use tracing::debug;

use super::integer::decode_integer;
use super::wire::parse_header_count;
use crate::domain::{DecodedShare, RequestDescriptor, ShareCount, Threshold};
use crate::error::ShareError;
use crate::validator::ShareSet;

/// Keyword that opens a share line
const SHARE_KEYWORD: &str = "Share";

/// A decoded line-protocol request
#[derive(Debug)]
pub struct LineRequest {
    /// Header values after the last line
    pub descriptor: RequestDescriptor,
    /// Shares accepted so far, not yet finalized
    pub shares: ShareSet,
}

/// Recognized line shapes
#[derive(Debug, PartialEq)]
enum Line<'a> {
    ShareCount(u32),
    Threshold(u32),
    Modulus(Option<&'a str>),
    Share { x: u32, token: &'a str },
    Other,
}

/// Header values as last written
#[derive(Debug, Default)]
struct Header {
    share_count: Option<u32>,
    threshold: Option<u32>,
    modulus: Option<BigInt>,
    /// Descriptor built from the fields above, dropped whenever one changes
    current: Option<Rc<RequestDescriptor>>,
}

impl Header {
    fn descriptor(&mut self) -> Result<Rc<RequestDescriptor>, ShareError> {
        if let Some(current) = &self.current {
            return Ok(Rc::clone(current));
        }
        let (Some(n), Some(k)) = (self.share_count, self.threshold) else {
            return Err(ShareError::malformed(
                "share appears before both n and k are set",
            ));
        };
        let descriptor = Rc::new(RequestDescriptor::new(
            ShareCount::new(n)?,
            Threshold::new(k)?,
            self.modulus.clone(),
        )?);
        self.current = Some(Rc::clone(&descriptor));
        Ok(descriptor)
    }

    fn set(&mut self, update: impl FnOnce(&mut Self)) {
        update(self);
        self.current = None;
    }
}

/// Decodes a line-protocol request from its full text
///
/// # Errors
/// See [`decode_lines`]
pub fn decode_line_text(text: &str) -> Result<LineRequest, ShareError> {
    decode_lines(text.lines())
}

/// Decodes a line-protocol request, feeding each share into a fresh [`ShareSet`]
///
/// Errors raised for a particular line are wrapped in [`ShareError::AtLine`] with its
/// 1-based position, so match on [`ShareError::root`] to get the underlying kind.
/// Only a missing `n` or `k` after the last line comes back unwrapped.
///
/// # Errors
/// Returns [`ShareError::MalformedRequest`] for unparseable header or share tags, a share
/// before `n` and `k`, or a request that never sets `n` or `k`. Integer decoding and
/// share validation errors propagate.
///
/// # Examples
///
/// ```rust
/// use secshsrv::codec::decode_lines;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let request = decode_lines([
///     "k = 2",
///     "n = 3",
///     "Share (x:1) = 100",
///     "Share (x:1) = 100",
///     "Share (x:2) = 200",
/// ])?;
/// assert_eq!(request.shares.len(), 2);
/// # Ok(())
/// # }
/// ```
pub fn decode_lines<'a, I>(lines: I) -> Result<LineRequest, ShareError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut header = Header::default();
    let mut shares = ShareSet::new();

    for (idx, line) in lines.into_iter().enumerate() {
        let line_no = idx + 1;
        process_line(line, &mut header, &mut shares).map_err(|e| e.at_line(line_no))?;
    }

    let (Some(n), Some(k)) = (header.share_count, header.threshold) else {
        return Err(ShareError::malformed("request never set both n and k"));
    };
    let descriptor = RequestDescriptor::new(ShareCount::new(n)?, Threshold::new(k)?, header.modulus)?;

    Ok(LineRequest { descriptor, shares })
}

fn process_line(line: &str, header: &mut Header, shares: &mut ShareSet) -> Result<(), ShareError> {
    match classify(line)? {
        Line::ShareCount(n) => header.set(|h| h.share_count = Some(n)),
        Line::Threshold(k) => header.set(|h| h.threshold = Some(k)),
        Line::Modulus(token) => {
            let modulus = token.map(decode_integer).transpose()?;
            header.set(|h| h.modulus = modulus);
        }
        Line::Share { x, token } => {
            let descriptor = header.descriptor()?;
            let value = decode_integer(token)?;
            shares.accept(DecodedShare::new(x, value, descriptor)?)?;
        }
        Line::Other => debug!("ignored unrecognized line"),
    }
    Ok(())
}

fn classify(line: &str) -> Result<Line<'_>, ShareError> {
    let Some((key, value)) = line.split_once('=') else {
        return Ok(Line::Other);
    };
    let key = key.trim();
    let value = value.trim();

    match key {
        "n" => Ok(Line::ShareCount(parse_header_count("n", value)?)),
        "k" => Ok(Line::Threshold(parse_header_count("k", value)?)),
        "modulus" => Ok(Line::Modulus((!value.is_empty()).then_some(value))),
        _ => match key.strip_prefix(SHARE_KEYWORD).map(str::trim_start) {
            Some(tag) if tag.starts_with('(') => {
                let x = parse_share_tag(tag)?;
                if value.is_empty() {
                    return Err(ShareError::malformed(format!("share x:{x} has no value")));
                }
                Ok(Line::Share { x, token: value })
            }
            _ => Ok(Line::Other),
        },
    }
}

/// Parses `(x:<int>)` into the x-coordinate
fn parse_share_tag(tag: &str) -> Result<u32, ShareError> {
    let inner = tag
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .and_then(|t| t.trim().strip_prefix("x:"))
        .ok_or_else(|| ShareError::malformed(format!("share tag must look like (x:<int>), got '{tag}'")))?;
    parse_header_count("x", inner.trim())
}
