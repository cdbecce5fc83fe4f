//! Single-connection TCP transport
//!
//! Accepts one connection, reads until the peer closes it, and hands back the body.

use std::io::Read;
use std::net::{TcpListener, ToSocketAddrs};

use anyhow::{Context, Result};
use tracing::info;
use zeroize::Zeroizing;

use crate::commands::Protocol;

/// Binds a listener on `addr`
///
/// # Errors
/// Returns an error if the address cannot be bound
pub fn bind(addr: impl ToSocketAddrs) -> Result<TcpListener> {
    let listener = TcpListener::bind(addr).context("Failed to bind listener")?;
    if let Ok(local) = listener.local_addr() {
        info!(%local, "waiting for a single request");
    }
    Ok(listener)
}

/// Accepts exactly one connection and returns its full body
///
/// # Errors
/// Returns an error if accepting or reading fails, or the body is not UTF-8
pub fn accept_one(listener: &TcpListener, protocol: Protocol) -> Result<Zeroizing<String>> {
    let (stream, peer) = listener.accept().context("Failed to accept connection")?;
    info!(%peer, "connection accepted");
    read_request(stream, protocol)
}

/// Reads a request body until end-of-stream
///
/// Wire requests may arrive split across lines; the lines are joined into one
/// string. Line-protocol bodies are kept as they are.
///
/// # Errors
/// Returns an error if reading fails or the body is not UTF-8
pub fn read_request<R: Read>(mut reader: R, protocol: Protocol) -> Result<Zeroizing<String>> {
    let mut body = Zeroizing::new(String::new());
    reader
        .read_to_string(&mut body)
        .context("Failed to read request body")?;

    match protocol {
        Protocol::Wire => Ok(Zeroizing::new(body.lines().collect())),
        Protocol::Lines => Ok(body),
    }
}
