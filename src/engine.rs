//! Secret-recovery engines
//!
//! The combine step only knows the [`SecretRecovery`] trait. Two engines ship with
//! the crate:
//! - [`LagrangeEngine`] - exact Lagrange interpolation over the integers or a prime field
//! - [`Gf256Engine`] - byte-wise Shamir over GF(256), compatible with [`blahaj`]

use std::collections::BTreeSet;
use std::str::FromStr;

use blahaj::Sharks;
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use zeroize::Zeroizing;

use crate::domain::{ShareCount, Threshold};
use crate::error::RecoveryError;

/// A share handed to an engine: position and value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePoint {
    pub x: u32,
    pub y: BigInt,
}

/// Capability that recovers a secret from validated shares
pub trait SecretRecovery {
    /// Recovers the secret from `points`, which arrive in acceptance order
    ///
    /// # Errors
    /// Fails when fewer than `threshold` distinct `x` are supplied, or when the points
    /// do not lie on a single polynomial of degree `threshold - 1`
    fn recover(
        &self,
        points: &[SharePoint],
        threshold: Threshold,
        share_count: ShareCount,
        modulus: Option<&BigInt>,
    ) -> Result<BigInt, RecoveryError>;
}

/// Selects one of the built-in engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineKind {
    #[default]
    Lagrange,
    Gf256,
}

impl EngineKind {
    /// The engine instance for this kind
    #[must_use]
    pub fn engine(self) -> &'static dyn SecretRecovery {
        match self {
            Self::Lagrange => &LagrangeEngine,
            Self::Gf256 => &Gf256Engine,
        }
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lagrange" => Ok(Self::Lagrange),
            "gf256" => Ok(Self::Gf256),
            other => Err(format!(
                "'{other}' is not an engine (expected lagrange or gf256)"
            )),
        }
    }
}

/// Checks there are at least `threshold` points, all with distinct `x`
fn require_points(points: &[SharePoint], threshold: Threshold) -> Result<(), RecoveryError> {
    let distinct: BTreeSet<u32> = points.iter().map(|p| p.x).collect();
    if distinct.len() != points.len() {
        return Err(RecoveryError::Engine(
            "points must have distinct x-coordinates".to_string(),
        ));
    }
    if points.len() < *threshold as usize {
        return Err(RecoveryError::TooFewPoints {
            required: *threshold,
            actual: points.len(),
        });
    }
    Ok(())
}

/// Lagrange interpolation at `x = 0`
///
/// The first `k` points define the polynomial; any further points must lie on it.
/// With a modulus all arithmetic happens in Z/p, which requires p to be prime and
/// larger than every `x`. Without one the interpolation is exact over the rationals
/// and the secret must come out integral.
#[derive(Debug, Default, Clone, Copy)]
pub struct LagrangeEngine;

impl SecretRecovery for LagrangeEngine {
    fn recover(
        &self,
        points: &[SharePoint],
        threshold: Threshold,
        _share_count: ShareCount,
        modulus: Option<&BigInt>,
    ) -> Result<BigInt, RecoveryError> {
        require_points(points, threshold)?;
        let (basis, rest) = points.split_at(*threshold as usize);

        match modulus {
            Some(p) => {
                let secret = interpolate_mod(basis, &BigInt::zero(), p)?;
                for point in rest {
                    let expected = interpolate_mod(basis, &BigInt::from(point.x), p)?;
                    if expected != point.y.mod_floor(p) {
                        return Err(RecoveryError::NotCoPolynomial {
                            x: point.x,
                            threshold: *threshold,
                        });
                    }
                }
                Ok(secret)
            }
            None => {
                let (num, den) = interpolate_rational(basis, &BigInt::zero());
                let (secret, remainder) = num.div_rem(&den);
                if !remainder.is_zero() {
                    return Err(RecoveryError::NonIntegralSecret);
                }
                for point in rest {
                    let (num, den) = interpolate_rational(basis, &BigInt::from(point.x));
                    if num != &point.y * &den {
                        return Err(RecoveryError::NotCoPolynomial {
                            x: point.x,
                            threshold: *threshold,
                        });
                    }
                }
                Ok(secret)
            }
        }
    }
}

/// Evaluates the interpolating polynomial through `basis` at `t`, modulo `p`
fn interpolate_mod(basis: &[SharePoint], t: &BigInt, p: &BigInt) -> Result<BigInt, RecoveryError> {
    let mut acc = BigInt::zero();

    for (i, pi) in basis.iter().enumerate() {
        let xi = BigInt::from(pi.x);
        let mut num = BigInt::one();
        let mut den = BigInt::one();

        for (j, pj) in basis.iter().enumerate() {
            if i == j {
                continue;
            }
            let xj = BigInt::from(pj.x);
            num = (num * (t - &xj)).mod_floor(p);
            den = (den * (&xi - &xj)).mod_floor(p);
        }

        let inverse = den.modinv(p).ok_or_else(|| RecoveryError::BadModulus {
            modulus: p.clone(),
            reason: format!(
                "no inverse for the basis of x:{}; the modulus must be prime and larger than every x",
                pi.x
            ),
        })?;

        acc = (acc + &pi.y * num * inverse).mod_floor(p);
    }

    Ok(acc)
}

/// Evaluates the interpolating polynomial through `basis` at `t` as a reduced fraction
///
/// The returned denominator is always positive.
fn interpolate_rational(basis: &[SharePoint], t: &BigInt) -> (BigInt, BigInt) {
    let mut acc_num = BigInt::zero();
    let mut acc_den = BigInt::one();

    for (i, pi) in basis.iter().enumerate() {
        let xi = BigInt::from(pi.x);
        let mut term_num = pi.y.clone();
        let mut term_den = BigInt::one();

        for (j, pj) in basis.iter().enumerate() {
            if i == j {
                continue;
            }
            let xj = BigInt::from(pj.x);
            term_num *= t - &xj;
            term_den *= &xi - &xj;
        }

        acc_num = acc_num * &term_den + term_num * &acc_den;
        acc_den *= term_den;

        let gcd = acc_num.gcd(&acc_den);
        if !gcd.is_zero() && !gcd.is_one() {
            acc_num /= &gcd;
            acc_den /= &gcd;
        }
    }

    if acc_den.sign() == Sign::Minus {
        acc_num = -acc_num;
        acc_den = -acc_den;
    }
    (acc_num, acc_den)
}

/// Byte-wise Shamir over GF(256)
///
/// Each share value's big-endian bytes are the y-bytes of a [`blahaj::Share`]. Values
/// are left-padded to the widest share, since leading zero bytes do not survive the
/// integer encoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct Gf256Engine;

impl SecretRecovery for Gf256Engine {
    fn recover(
        &self,
        points: &[SharePoint],
        threshold: Threshold,
        _share_count: ShareCount,
        modulus: Option<&BigInt>,
    ) -> Result<BigInt, RecoveryError> {
        if let Some(m) = modulus {
            return Err(RecoveryError::BadModulus {
                modulus: m.clone(),
                reason: "GF(256) shares do not take a modulus".to_string(),
            });
        }
        let k = u8::try_from(*threshold).map_err(|_| {
            RecoveryError::Engine(format!(
                "GF(256) threshold must be at most 255 (got {})",
                *threshold
            ))
        })?;
        require_points(points, threshold)?;

        let mut y_bytes = Vec::with_capacity(points.len());
        for point in points {
            let x = u8::try_from(point.x).map_err(|_| RecoveryError::UnsupportedShare {
                x: point.x,
                reason: "x must be at most 255".to_string(),
            })?;
            if point.y.sign() == Sign::Minus {
                return Err(RecoveryError::UnsupportedShare {
                    x: point.x,
                    reason: "value must not be negative".to_string(),
                });
            }
            let (_, bytes) = point.y.to_bytes_be();
            y_bytes.push((x, Zeroizing::new(bytes)));
        }

        let width = y_bytes.iter().map(|(_, b)| b.len()).max().unwrap_or(0);

        let mut shares = Vec::with_capacity(y_bytes.len());
        for (x, bytes) in &y_bytes {
            let mut raw = Zeroizing::new(Vec::with_capacity(width + 1));
            raw.push(*x);
            raw.resize(1 + width - bytes.len(), 0);
            raw.extend_from_slice(bytes);

            let share = blahaj::Share::try_from(raw.as_slice())
                .map_err(|e| RecoveryError::Engine(format!("Failed to create share from data: {e:?}")))?;
            shares.push(share);
        }

        let recovered = Zeroizing::new(
            Sharks(k)
                .recover(&shares)
                .map_err(|e| RecoveryError::Engine(format!("Failed to recover secret: {e:?}")))?,
        );

        Ok(BigInt::from_bytes_be(Sign::Plus, &recovered))
    }
}
