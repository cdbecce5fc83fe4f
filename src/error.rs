//! Error taxonomy for decoding, validating and combining shares
//!
//! Every variant is terminal for the request that produced it. Variants carry the
//! offending token, values or counts so they can be shown to an operator verbatim.

use num_bigint::BigInt;
use thiserror::Error;

/// Failure raised anywhere between the raw request text and the recovered secret
#[derive(Debug, Error)]
pub enum ShareError {
    /// Structural violation of the wire or line protocol
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Token is not a number in any accepted encoding
    #[error("Token '{token}' is not a number: {reason}")]
    NotANumber { token: String, reason: String },

    /// Checksum-tagged token whose checksum does not match its payload
    #[error("Checksum mismatch in token '{token}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        token: String,
        expected: String,
        actual: String,
    },

    /// Same x-coordinate submitted with two different values
    #[error("Share x:{x} was entered with two different values ({existing}) and ({candidate})")]
    ConflictingShare {
        x: u32,
        existing: BigInt,
        candidate: BigInt,
    },

    /// Same value submitted at two different x-coordinates
    #[error("Duplicate share values at x:{existing_x} and x:{candidate_x}")]
    CrossDuplicateValue { existing_x: u32, candidate_x: u32 },

    /// Fewer distinct shares than the threshold requires
    #[error("Insufficient shares: required={required}, actual={actual}")]
    InsufficientShares { required: u32, actual: usize },

    /// A share was decoded under header values that differ from the final ones
    #[error("Share x:{x} was decoded under {share_descriptor} but the request settled on {request_descriptor}")]
    DescriptorMismatch {
        x: u32,
        share_descriptor: String,
        request_descriptor: String,
    },

    /// The secret-recovery engine rejected the share set
    #[error("Combine failed: {0}")]
    CombineFailed(#[from] RecoveryError),

    /// Error raised while processing a specific line of a line-protocol request
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<ShareError>,
    },
}

impl ShareError {
    /// Shorthand for [`ShareError::MalformedRequest`]
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRequest(reason.into())
    }

    /// Shorthand for [`ShareError::NotANumber`]
    pub(crate) fn not_a_number(token: &str, reason: impl Into<String>) -> Self {
        Self::NotANumber {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    /// Attaches a 1-based line number, keeping an existing one
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        match self {
            already @ Self::AtLine { .. } => already,
            other => Self::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }

    /// Returns the underlying error with any line annotation stripped
    #[must_use]
    pub fn root(&self) -> &ShareError {
        match self {
            Self::AtLine { source, .. } => source.root(),
            other => other,
        }
    }

    /// Line number of a line-protocol failure, if known
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Failure reported by a [`crate::engine::SecretRecovery`] implementation
#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("need at least {required} distinct points, got {actual}")]
    TooFewPoints { required: u32, actual: usize },

    #[error("point x:{x} does not lie on the polynomial through the first {threshold} points")]
    NotCoPolynomial { x: u32, threshold: u32 },

    #[error("interpolated secret is not an integer")]
    NonIntegralSecret,

    #[error("modulus {modulus} is not usable: {reason}")]
    BadModulus { modulus: BigInt, reason: String },

    #[error("share x:{x} cannot be used by this engine: {reason}")]
    UnsupportedShare { x: u32, reason: String },

    #[error("{0}")]
    Engine(String),
}
