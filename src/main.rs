use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use zeroize::Zeroizing;

use secshsrv::cli::{Cli, Commands};
use secshsrv::commands::{Protocol, combine_request};
use secshsrv::listener;

/// Read a request from stdin (hidden input when TTY available)
/// Interactive input is one line per prompt, with an empty line to finish
fn read_stdin(protocol: Protocol) -> Result<Zeroizing<String>> {
    if atty::is(atty::Stream::Stdin) {
        match protocol {
            Protocol::Wire => eprintln!("Enter request (n|k|modulus|shares...|), empty line to finish:"),
            Protocol::Lines => eprintln!("Enter request lines, empty line to finish:"),
        }

        let mut lines = Vec::new();
        loop {
            let line = Zeroizing::new(
                rpassword::read_password().context("Failed to read request from stdin")?,
            );
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }

        let separator = match protocol {
            Protocol::Wire => "",
            Protocol::Lines => "\n",
        };
        Ok(Zeroizing::new(
            lines.iter().map(|l| l.trim()).collect::<Vec<_>>().join(separator),
        ))
    } else {
        // Non-interactive mode - read everything from stdin
        let stdin = io::stdin();
        listener::read_request(stdin.lock(), protocol)
    }
}

fn read_file(path: &Path, protocol: Protocol) -> Result<Zeroizing<String>> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open request file {}", path.display()))?;
    listener::read_request(io::BufReader::new(file), protocol)
}

fn read_input(input: Option<&Path>, protocol: Protocol) -> Result<Zeroizing<String>> {
    let body = match input {
        Some(path) => read_file(path, protocol)?,
        None => read_stdin(protocol)?,
    };
    if body.trim().is_empty() {
        anyhow::bail!("No request provided");
    }
    Ok(body)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let (body, protocol) = match cli.command {
        Commands::Listen {
            bind,
            port,
            protocol,
        } => {
            let listener = listener::bind((bind.as_str(), port))?;
            (listener::accept_one(&listener, protocol)?, protocol)
        }
        Commands::Wire { input } => (read_input(input.as_deref(), Protocol::Wire)?, Protocol::Wire),
        Commands::Lines { input } => {
            (read_input(input.as_deref(), Protocol::Lines)?, Protocol::Lines)
        }
    };

    let secret = combine_request(&body, protocol, cli.engine, cli.format)?;
    println!("{}", secret.as_str());

    Ok(())
}
