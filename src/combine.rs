//! Combine orchestration: validated shares in, recovered secret out

use num_bigint::BigInt;
use tracing::info;

use crate::domain::RequestDescriptor;
use crate::engine::{SecretRecovery, SharePoint};
use crate::error::ShareError;
use crate::validator::ValidatedShareSet;

/// Secret returned by a recovery engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredSecret(BigInt);

impl From<BigInt> for RecoveredSecret {
    fn from(value: BigInt) -> Self {
        Self(value)
    }
}

impl RecoveredSecret {
    #[must_use]
    pub fn value(&self) -> &BigInt {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> BigInt {
        self.0
    }
}

/// Hands a validated share set to `engine` and returns the recovered secret
///
/// Every share must have been decoded under exactly `descriptor`; header values that
/// changed after a share was accepted are rejected rather than silently applied.
///
/// # Errors
/// Returns [`ShareError::DescriptorMismatch`] for the first share decoded under different
/// header values, and [`ShareError::CombineFailed`] if the engine rejects the set
pub fn combine(
    descriptor: &RequestDescriptor,
    shares: &ValidatedShareSet,
    engine: &dyn SecretRecovery,
) -> Result<RecoveredSecret, ShareError> {
    if let Some(stale) = shares.shares().iter().find(|s| s.descriptor() != descriptor) {
        return Err(ShareError::DescriptorMismatch {
            x: stale.x(),
            share_descriptor: stale.descriptor().to_string(),
            request_descriptor: descriptor.to_string(),
        });
    }

    let points: Vec<SharePoint> = shares
        .shares()
        .iter()
        .map(|s| SharePoint {
            x: s.x(),
            y: s.value().clone(),
        })
        .collect();

    info!(
        shares = points.len(),
        threshold = *descriptor.threshold(),
        total = *descriptor.share_count(),
        modulus = descriptor.modulus().is_some(),
        "combining shares"
    );

    let secret = engine.recover(
        &points,
        descriptor.threshold(),
        descriptor.share_count(),
        descriptor.modulus(),
    )?;

    info!("secret recovered");
    Ok(RecoveredSecret(secret))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::domain::{DecodedShare, ShareCount, Threshold};
    use crate::error::RecoveryError;
    use crate::validator::ShareSet;

    /// Engine that records its input and returns a fixed answer
    #[derive(Default)]
    struct RecordingEngine {
        calls: RefCell<Vec<(Vec<SharePoint>, u32, u32, Option<BigInt>)>>,
        fail: bool,
    }

    impl SecretRecovery for RecordingEngine {
        fn recover(
            &self,
            points: &[SharePoint],
            threshold: Threshold,
            share_count: ShareCount,
            modulus: Option<&BigInt>,
        ) -> Result<BigInt, RecoveryError> {
            self.calls.borrow_mut().push((
                points.to_vec(),
                *threshold,
                *share_count,
                modulus.cloned(),
            ));
            if self.fail {
                return Err(RecoveryError::NotCoPolynomial { x: 3, threshold: 2 });
            }
            Ok(BigInt::from(42))
        }
    }

    fn descriptor(n: u32, k: u32) -> Rc<RequestDescriptor> {
        Rc::new(
            RequestDescriptor::new(ShareCount::new(n).unwrap(), Threshold::new(k).unwrap(), None)
                .unwrap(),
        )
    }

    fn validated(shares: Vec<DecodedShare>, d: &RequestDescriptor) -> ValidatedShareSet {
        let mut set = ShareSet::new();
        for share in shares {
            set.accept(share).unwrap();
        }
        set.finalize(d).unwrap()
    }

    #[test]
    fn test_engine_receives_shares_in_order() {
        let d = descriptor(3, 2);
        let set = validated(
            vec![
                DecodedShare::new(2, BigInt::from(20), Rc::clone(&d)).unwrap(),
                DecodedShare::new(1, BigInt::from(10), Rc::clone(&d)).unwrap(),
            ],
            &d,
        );
        let engine = RecordingEngine::default();

        let secret = combine(&d, &set, &engine).unwrap();
        assert_eq!(secret.value(), &BigInt::from(42));

        let calls = engine.calls.borrow();
        assert_eq!(calls.len(), 1);
        let (points, k, n, modulus) = &calls[0];
        let xs: Vec<_> = points.iter().map(|p| p.x).collect();
        assert_eq!(xs, [2, 1]);
        assert_eq!((*k, *n), (2, 3));
        assert!(modulus.is_none());
    }

    #[test]
    fn test_descriptor_mismatch_blocks_engine() {
        let early = descriptor(3, 2);
        let late = descriptor(3, 3);
        let set = validated(
            vec![
                DecodedShare::new(1, BigInt::from(10), Rc::clone(&early)).unwrap(),
                DecodedShare::new(2, BigInt::from(20), Rc::clone(&late)).unwrap(),
                DecodedShare::new(3, BigInt::from(30), Rc::clone(&late)).unwrap(),
            ],
            &late,
        );
        let engine = RecordingEngine::default();

        let err = combine(&late, &set, &engine).unwrap_err();
        assert!(matches!(err, ShareError::DescriptorMismatch { x: 1, .. }));
        assert!(engine.calls.borrow().is_empty());
    }

    #[test]
    fn test_engine_failure_is_combine_failed() {
        let d = descriptor(3, 2);
        let set = validated(
            vec![
                DecodedShare::new(1, BigInt::from(10), Rc::clone(&d)).unwrap(),
                DecodedShare::new(2, BigInt::from(20), Rc::clone(&d)).unwrap(),
            ],
            &d,
        );
        let engine = RecordingEngine {
            fail: true,
            ..RecordingEngine::default()
        };

        let err = combine(&d, &set, &engine).unwrap_err();
        assert!(matches!(
            err,
            ShareError::CombineFailed(RecoveryError::NotCoPolynomial { x: 3, .. })
        ));
    }
}
