//! Share types shared by both ingestion paths

use std::rc::Rc;

use num_bigint::BigInt;
use zeroize::Zeroizing;

use super::RequestDescriptor;
use crate::error::ShareError;

/// Raw share text paired with its 1-based arrival position
#[derive(Debug, Clone, PartialEq)]
pub struct ShareToken {
    index: u32,
    raw: Zeroizing<String>,
}

impl ShareToken {
    pub(crate) fn new(index: u32, raw: &str) -> Self {
        Self {
            index,
            raw: Zeroizing::new(raw.to_string()),
        }
    }

    /// 1-based arrival position of the token
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Token text as received
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// A share with its x-coordinate always populated
///
/// The wire path fills `x` from arrival order, the line path from the explicit
/// `(x:..)` tag. Validation downstream is identical for both.
#[derive(Debug, Clone)]
pub struct DecodedShare {
    x: u32,
    value: BigInt,
    descriptor: Rc<RequestDescriptor>,
}

impl DecodedShare {
    /// Creates a share at position `x` decoded under `descriptor`
    ///
    /// # Errors
    /// Returns [`ShareError::MalformedRequest`] if `x` is 0, which is where the secret itself sits
    pub fn new(x: u32, value: BigInt, descriptor: Rc<RequestDescriptor>) -> Result<Self, ShareError> {
        if x == 0 {
            return Err(ShareError::malformed(
                "share x-coordinate must be at least 1",
            ));
        }
        Ok(Self {
            x,
            value,
            descriptor,
        })
    }

    /// Share identifier / x-coordinate
    #[must_use]
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Share value / y-coordinate
    #[must_use]
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    /// Descriptor in force when this share was decoded
    #[must_use]
    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }
}
