//! Decoders that turn raw request text into descriptors and shares
//!
//! - [`integer`] - Checksum-tagged, hexadecimal and decimal integer tokens
//! - [`wire`] - Pipe-delimited single-string requests (`n|k|modulus|shares...|`)
//! - [`lines`] - Line-oriented `field = value` requests

pub mod integer;
pub mod lines;
pub mod wire;

pub use integer::{CHECKSUM_PREFIX, decode_integer, encode_checksummed};
pub use lines::{LineRequest, decode_line_text, decode_lines};
pub use wire::{DELIMITER, WireRequest, tokenize};
