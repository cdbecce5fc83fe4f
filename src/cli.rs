use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::Protocol;
use crate::engine::EngineKind;
use crate::render::SecretFormat;

fn parse_engine(s: &str) -> Result<EngineKind, String> {
    s.parse()
}

fn parse_format(s: &str) -> Result<SecretFormat, String> {
    s.parse()
}

fn parse_protocol(s: &str) -> Result<Protocol, String> {
    s.parse()
}

#[derive(Parser)]
#[command(name = "secshsrv")]
#[command(about = "Decode, validate and combine threshold secret shares into the original secret")]
pub struct Cli {
    /// Secret-recovery engine: lagrange or gf256
    #[arg(long, global = true, env = "SECSHSRV_ENGINE", default_value = "lagrange", value_parser = parse_engine)]
    pub engine: EngineKind,

    /// Output format: decimal, hex, text or mnemonic
    #[arg(long, global = true, env = "SECSHSRV_FORMAT", default_value = "text", value_parser = parse_format)]
    pub format: SecretFormat,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Accept a single TCP connection and combine the request it carries
    Listen {
        /// Address to bind
        #[arg(long, env = "SECSHSRV_BIND", default_value = "0.0.0.0")]
        bind: String,

        /// Port to listen on
        #[arg(short, long, env = "SECSHSRV_PORT", default_value_t = 8080)]
        port: u16,

        /// Request protocol: wire or lines
        #[arg(long, default_value = "wire", value_parser = parse_protocol)]
        protocol: Protocol,
    },
    /// Combine a pipe-delimited request (n|k|modulus|shares...|)
    Wire {
        /// Read the request from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Combine a line-protocol request (n = .., k = .., Share (x:..) = ..)
    Lines {
        /// Read the request from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}
