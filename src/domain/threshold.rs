//! Threshold newtype for share reconstruction

use crate::error::ShareError;

/// Number of distinct shares needed to recover the secret (k >= 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Threshold(u32);

impl Threshold {
    /// Creates a new threshold, returning an error if value is 0
    ///
    /// # Errors
    /// Returns [`ShareError::MalformedRequest`] if the threshold is 0
    ///
    /// # Examples
    ///
    /// ```rust
    /// use secshsrv::domain::Threshold;
    ///
    /// let threshold = Threshold::new(3).unwrap();
    /// assert_eq!(*threshold, 3);
    ///
    /// assert!(Threshold::new(0).is_err());
    /// ```
    pub fn new(value: u32) -> Result<Self, ShareError> {
        if value == 0 {
            return Err(ShareError::malformed("threshold k must be at least 1"));
        }
        Ok(Self(value))
    }
}

impl std::ops::Deref for Threshold {
    type Target = u32;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
