use std::rc::Rc;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::codec::{LineRequest, WireRequest, decode_integer, decode_line_text, tokenize};
use crate::combine::{RecoveredSecret, combine};
use crate::domain::{DecodedShare, RequestDescriptor};
use crate::engine::{EngineKind, SecretRecovery};
use crate::error::ShareError;
use crate::render::{SecretFormat, render};
use crate::validator::ShareSet;

/// Which inbound protocol a request body uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    /// `n|k|modulus|share|...|`
    #[default]
    Wire,
    /// `field = value` lines
    Lines,
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wire" => Ok(Self::Wire),
            "lines" => Ok(Self::Lines),
            other => Err(format!(
                "'{other}' is not a protocol (expected wire or lines)"
            )),
        }
    }
}

/// Outcome of one request/response cycle
#[derive(Debug, Clone)]
pub struct Recovery {
    pub secret: RecoveredSecret,
    pub descriptor: RequestDescriptor,
    pub shares_used: usize,
}

/// Recovers the secret from a wire-protocol request
///
/// Shares take their x-coordinate from arrival order.
///
/// # Errors
/// Returns the first decoding, validation or combine error; nothing partial is returned
pub fn recover_wire(request: &str, engine: &dyn SecretRecovery) -> Result<Recovery, ShareError> {
    let WireRequest { descriptor, tokens } = tokenize(request)?;
    debug!(tokens = tokens.len(), %descriptor, "tokenized wire request");

    let descriptor = Rc::new(descriptor);
    let mut shares = ShareSet::new();
    for token in &tokens {
        let value = decode_integer(token.as_str())?;
        shares.accept(DecodedShare::new(token.index(), value, Rc::clone(&descriptor))?)?;
    }

    finish(&descriptor, shares, engine)
}

/// Recovers the secret from a line-protocol request
///
/// # Errors
/// Returns the first decoding, validation or combine error; nothing partial is returned.
/// Errors tied to a line arrive as [`ShareError::AtLine`]; use [`ShareError::root`] for
/// the underlying kind.
pub fn recover_lines(text: &str, engine: &dyn SecretRecovery) -> Result<Recovery, ShareError> {
    let LineRequest { descriptor, shares } = decode_line_text(text)?;
    debug!(shares = shares.len(), %descriptor, "decoded line request");

    finish(&descriptor, shares, engine)
}

fn finish(
    descriptor: &RequestDescriptor,
    shares: ShareSet,
    engine: &dyn SecretRecovery,
) -> Result<Recovery, ShareError> {
    let validated = shares.finalize(descriptor)?;
    let secret = combine(descriptor, &validated, engine)?;

    Ok(Recovery {
        secret,
        descriptor: descriptor.clone(),
        shares_used: validated.len(),
    })
}

/// Decodes, validates and combines one request body, then renders the secret
///
/// Returns the secret rendered as a human-readable string.
///
/// # Errors
/// Returns an error if the request is rejected at any stage or the secret cannot be
/// rendered in `format`
pub fn combine_request(
    body: &str,
    protocol: Protocol,
    engine: EngineKind,
    format: SecretFormat,
) -> Result<Zeroizing<String>> {
    let recovery = run(body, protocol, engine)?;
    render(&recovery.secret, format).context("Failed to render recovered secret")
}

/// Result of a combine operation (for JSON serialization)
#[derive(Serialize, Deserialize)]
pub struct CombineResult {
    /// The recovered secret, rendered
    pub secret: String,
    /// Total share count declared by the request
    pub share_count: u32,
    /// Threshold declared by the request
    pub threshold: u32,
    /// Distinct shares handed to the engine
    pub shares_used: usize,
}

/// Like [`combine_request`], returning the secret and request metadata as JSON
///
/// # Errors
/// Returns an error if the request is rejected, rendering fails, or serialization fails
pub fn combine_request_json(
    body: &str,
    protocol: Protocol,
    engine: EngineKind,
    format: SecretFormat,
) -> Result<String> {
    let recovery = run(body, protocol, engine)?;
    let secret = render(&recovery.secret, format).context("Failed to render recovered secret")?;

    let result = CombineResult {
        secret: secret.to_string(),
        share_count: *recovery.descriptor.share_count(),
        threshold: *recovery.descriptor.threshold(),
        shares_used: recovery.shares_used,
    };

    serde_json::to_string(&result).context("Failed to serialize combine result")
}

fn run(body: &str, protocol: Protocol, engine: EngineKind) -> Result<Recovery> {
    let engine = engine.engine();
    match protocol {
        Protocol::Wire => recover_wire(body, engine).context("Failed to combine wire request"),
        Protocol::Lines => recover_lines(body, engine).context("Failed to combine line request"),
    }
}
