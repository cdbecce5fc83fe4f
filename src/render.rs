//! Human-readable rendering of a recovered secret

use std::str::FromStr;

use anyhow::{Context, Result, bail};
use bip39::{Language, Mnemonic};
use num_bigint::Sign;
use zeroize::Zeroizing;

use crate::combine::RecoveredSecret;

/// Output format for a recovered secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecretFormat {
    /// Base-10 integer
    Decimal,
    /// `0x`-prefixed lowercase hex
    Hex,
    /// UTF-8 text when the secret's bytes are printable, decimal otherwise
    #[default]
    Text,
    /// BIP39 English mnemonic of the secret's bytes
    Mnemonic,
}

impl FromStr for SecretFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "decimal" | "dec" => Ok(Self::Decimal),
            "hex" => Ok(Self::Hex),
            "text" => Ok(Self::Text),
            "mnemonic" | "bip39" => Ok(Self::Mnemonic),
            other => Err(format!(
                "'{other}' is not a format (expected decimal, hex, text or mnemonic)"
            )),
        }
    }
}

/// Renders `secret` in the requested format
///
/// # Errors
/// Returns an error if the secret cannot be expressed as a mnemonic
///
/// # Examples
///
/// ```rust
/// use num_bigint::{BigInt, Sign};
/// use secshsrv::combine::RecoveredSecret;
/// use secshsrv::render::{render, SecretFormat};
///
/// let secret = RecoveredSecret::from(BigInt::from_bytes_be(Sign::Plus, b"hi"));
/// assert_eq!(render(&secret, SecretFormat::Text).unwrap().as_str(), "hi");
/// assert_eq!(render(&secret, SecretFormat::Hex).unwrap().as_str(), "0x6869");
/// assert_eq!(render(&secret, SecretFormat::Decimal).unwrap().as_str(), "26729");
/// ```
pub fn render(secret: &RecoveredSecret, format: SecretFormat) -> Result<Zeroizing<String>> {
    let value = secret.value();

    let rendered = match format {
        SecretFormat::Decimal => value.to_string(),
        SecretFormat::Hex => match value.sign() {
            Sign::Minus => format!("-0x{}", value.magnitude().to_str_radix(16)),
            _ => format!("0x{}", value.magnitude().to_str_radix(16)),
        },
        SecretFormat::Text => {
            if value.sign() == Sign::Minus {
                value.to_string()
            } else {
                let bytes = Zeroizing::new(value.magnitude().to_bytes_be());
                match std::str::from_utf8(&bytes) {
                    Ok(text) if is_printable(text) => text.to_string(),
                    _ => value.to_string(),
                }
            }
        }
        SecretFormat::Mnemonic => {
            if value.sign() == Sign::Minus {
                bail!("A negative secret cannot be rendered as a mnemonic");
            }
            let entropy = Zeroizing::new(value.magnitude().to_bytes_be());
            Mnemonic::from_entropy_in(Language::English, &entropy)
                .with_context(|| {
                    format!(
                        "Secret of {} bytes is not valid BIP39 entropy",
                        entropy.len()
                    )
                })?
                .to_string()
        }
    };

    Ok(Zeroizing::new(rendered))
}

fn is_printable(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| !c.is_control() || c == '\n' || c == '\t' || c == '\r')
}
