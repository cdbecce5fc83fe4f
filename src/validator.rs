//! Share accumulation and consistency checks
//!
//! A [`ShareSet`] is built fresh for every request and consumed by
//! [`ShareSet::finalize`]; no accumulation state outlives the request.

use tracing::debug;

use crate::domain::{DecodedShare, RequestDescriptor};
use crate::error::ShareError;

/// Outcome of [`ShareSet::accept`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// The share was new and has been appended
    Added,
    /// The identical `(x, value)` pair was already present
    Resubmitted,
}

/// Per-request accumulator of decoded shares
///
/// Invariants: no two shares share an `x` with different values, and no two
/// shares share a value under different `x`. Insertion order is preserved.
#[derive(Debug, Default)]
pub struct ShareSet {
    shares: Vec<DecodedShare>,
}

impl ShareSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a candidate share
    ///
    /// Re-submitting an identical `(x, value)` pair is absorbed without error. A
    /// matching `x` is resolved before values are compared across positions.
    ///
    /// # Errors
    /// Returns [`ShareError::MalformedRequest`] if `x` exceeds the share count `n` of the
    /// candidate's descriptor, [`ShareError::ConflictingShare`] if `x` is already present
    /// with a different value, or [`ShareError::CrossDuplicateValue`] if the value is
    /// already present under a different `x`
    pub fn accept(&mut self, candidate: DecodedShare) -> Result<Acceptance, ShareError> {
        let share_count = *candidate.descriptor().share_count();
        if candidate.x() > share_count {
            return Err(ShareError::malformed(format!(
                "share x:{} exceeds share count n={share_count}",
                candidate.x()
            )));
        }

        if let Some(existing) = self.shares.iter().find(|s| s.x() == candidate.x()) {
            if existing.value() == candidate.value() {
                debug!(x = candidate.x(), "absorbed re-submitted share");
                return Ok(Acceptance::Resubmitted);
            }
            return Err(ShareError::ConflictingShare {
                x: existing.x(),
                existing: existing.value().clone(),
                candidate: candidate.value().clone(),
            });
        }

        if let Some(existing) = self.shares.iter().find(|s| s.value() == candidate.value()) {
            return Err(ShareError::CrossDuplicateValue {
                existing_x: existing.x(),
                candidate_x: candidate.x(),
            });
        }

        debug!(x = candidate.x(), accepted = self.shares.len() + 1, "accepted share");
        self.shares.push(candidate);
        Ok(Acceptance::Added)
    }

    /// Number of distinct shares accepted so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Closes the set, checking it holds at least `k` distinct shares
    ///
    /// # Errors
    /// Returns [`ShareError::InsufficientShares`] with the required and actual counts
    pub fn finalize(self, descriptor: &RequestDescriptor) -> Result<ValidatedShareSet, ShareError> {
        let required = *descriptor.threshold();
        if self.shares.len() < required as usize {
            return Err(ShareError::InsufficientShares {
                required,
                actual: self.shares.len(),
            });
        }
        Ok(ValidatedShareSet {
            shares: self.shares,
        })
    }
}

/// Accepted shares, in insertion order, with at least `k` entries
#[derive(Debug)]
pub struct ValidatedShareSet {
    shares: Vec<DecodedShare>,
}

impl ValidatedShareSet {
    #[must_use]
    pub fn shares(&self) -> &[DecodedShare] {
        &self.shares
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}
