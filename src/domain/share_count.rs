//! `ShareCount` newtype for share reconstruction

use crate::error::ShareError;

/// Total number of shares the secret was split into (n >= 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShareCount(u32);

impl ShareCount {
    /// Minimum valid share count
    pub const MIN: u32 = 1;

    /// Creates a new share count
    ///
    /// # Errors
    /// Returns [`ShareError::MalformedRequest`] if count is 0
    ///
    /// # Examples
    ///
    /// ```rust
    /// use secshsrv::domain::ShareCount;
    ///
    /// let count = ShareCount::new(5).unwrap();
    /// assert_eq!(*count, 5);
    ///
    /// assert!(ShareCount::new(0).is_err());
    /// ```
    pub fn new(value: u32) -> Result<Self, ShareError> {
        if value < Self::MIN {
            return Err(ShareError::malformed("share count n must be at least 1"));
        }
        Ok(Self(value))
    }
}

impl std::ops::Deref for ShareCount {
    type Target = u32;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
