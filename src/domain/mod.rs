//! Domain types for share reconstruction requests
//!
//! This module contains validated newtypes and the request data model:
//! - [`Threshold`] - Minimum shares required for reconstruction (k >= 1)
//! - [`ShareCount`] - Total number of shares (n >= 1)
//! - [`RequestDescriptor`] - Validated (n, k, modulus) header
//! - [`ShareToken`] - Raw share text with its arrival position
//! - [`DecodedShare`] - Share with explicit x-coordinate and its descriptor

mod descriptor;
mod share;
mod share_count;
mod threshold;

pub use descriptor::RequestDescriptor;
pub use share::{DecodedShare, ShareToken};
pub use share_count::ShareCount;
pub use threshold::Threshold;
