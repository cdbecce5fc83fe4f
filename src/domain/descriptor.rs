//! Request descriptor: the (n, k, modulus) header of a reconstruction request

use num_bigint::BigInt;
use num_traits::One;

use super::{ShareCount, Threshold};
use crate::error::ShareError;

/// Validated header of a reconstruction request
///
/// Enforces `threshold <= share_count` and, when present, `modulus > 1`.
/// Immutable once built; shares hold it behind an `Rc` so every share can be
/// checked against the descriptor that was in force when it was decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    share_count: ShareCount,
    threshold: Threshold,
    modulus: Option<BigInt>,
}

impl RequestDescriptor {
    /// Creates a new request descriptor
    ///
    /// # Errors
    /// Returns [`ShareError::MalformedRequest`] if threshold exceeds share count
    /// or the modulus is not greater than 1
    ///
    /// # Examples
    ///
    /// ```rust
    /// use secshsrv::domain::{RequestDescriptor, ShareCount, Threshold};
    ///
    /// let descriptor = RequestDescriptor::new(
    ///     ShareCount::new(3).unwrap(),
    ///     Threshold::new(2).unwrap(),
    ///     None,
    /// ).unwrap();
    /// assert_eq!(*descriptor.threshold(), 2);
    /// assert_eq!(descriptor.to_string(), "(n=3, k=2, modulus=none)");
    ///
    /// // Threshold cannot exceed share count
    /// assert!(RequestDescriptor::new(
    ///     ShareCount::new(2).unwrap(),
    ///     Threshold::new(3).unwrap(),
    ///     None,
    /// ).is_err());
    /// ```
    pub fn new(
        share_count: ShareCount,
        threshold: Threshold,
        modulus: Option<BigInt>,
    ) -> Result<Self, ShareError> {
        if *threshold > *share_count {
            return Err(ShareError::malformed(format!(
                "threshold k={} cannot exceed share count n={}",
                *threshold, *share_count
            )));
        }
        if let Some(m) = &modulus {
            if *m <= BigInt::one() {
                return Err(ShareError::malformed(format!(
                    "modulus must be greater than 1 (got {m})"
                )));
            }
        }
        Ok(Self {
            share_count,
            threshold,
            modulus,
        })
    }

    /// Total number of shares (n)
    #[must_use]
    pub fn share_count(&self) -> ShareCount {
        self.share_count
    }

    /// Shares needed to recover (k)
    #[must_use]
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Prime modulus, if the shares live in a prime field
    #[must_use]
    pub fn modulus(&self) -> Option<&BigInt> {
        self.modulus.as_ref()
    }
}

impl std::fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(n={}, k={}, modulus=", *self.share_count, *self.threshold)?;
        match &self.modulus {
            Some(m) => write!(f, "{m})"),
            None => write!(f, "none)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(n: u32, k: u32) -> (ShareCount, Threshold) {
        (ShareCount::new(n).unwrap(), Threshold::new(k).unwrap())
    }

    #[test]
    fn test_threshold_equal_to_share_count_is_valid() {
        let (n, k) = counts(4, 4);
        assert!(RequestDescriptor::new(n, k, None).is_ok());
    }

    #[test]
    fn test_modulus_must_exceed_one() {
        let (n, k) = counts(3, 2);
        let err = RequestDescriptor::new(n, k, Some(BigInt::one())).unwrap_err();
        assert!(matches!(err, ShareError::MalformedRequest(_)));
    }

    #[test]
    fn test_display_with_modulus() {
        let (n, k) = counts(5, 3);
        let d = RequestDescriptor::new(n, k, Some(BigInt::from(257))).unwrap();
        assert_eq!(d.to_string(), "(n=5, k=3, modulus=257)");
    }
}
